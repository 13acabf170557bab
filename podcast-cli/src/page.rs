use std::{fmt::Write, rc::Rc};

use podcast_view::{
    app::{root_view, ROOT_ID},
    render::{html_escape, render_to_string, Mode},
    strict, Node, Notifier,
};

use crate::{config::Page, shell::ShellNotifier};

/// The landing view as it is prerendered on the command line.
pub fn landing() -> Node {
    let notifier: Rc<dyn Notifier> = Rc::new(ShellNotifier);
    strict::render(|| root_view(notifier.clone()))
}

pub fn prerender(mode: Mode) -> String {
    render_to_string(mode, &landing())
}

/// Produces the `index.html` hosting the application.
///
/// `bin` is the wasm-bindgen output name; without it no loader script is
/// emitted. `body` is placed verbatim inside the mount element.
pub fn index_html(page: &Page, bin: Option<&str>, body: &str) -> String {
    let mut out = String::new();
    write_index(&mut out, page, bin, body).unwrap();
    out
}

fn write_index<W: Write>(
    w: &mut W,
    page: &Page,
    bin: Option<&str>,
    body: &str,
) -> std::fmt::Result {
    writeln!(w, "<!DOCTYPE html>")?;
    writeln!(w, "<html lang=\"{}\">", html_escape(&page.lang))?;
    writeln!(w, "  <head>")?;
    writeln!(w, "    <meta charset=\"utf-8\" />")?;
    writeln!(
        w,
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\" />"
    )?;
    writeln!(w, "    <title>{}</title>", html_escape(&page.title))?;
    for href in &page.stylesheets {
        writeln!(w, "    <link rel=\"stylesheet\" href=\"{}\" />", html_escape(href))?;
    }
    for src in &page.scripts {
        writeln!(w, "    <script src=\"{}\"></script>", html_escape(src))?;
    }
    if let Some(bin) = bin {
        writeln!(w, "    <script type=\"module\">")?;
        writeln!(w, "      import init from \"./{bin}.js\";")?;
        writeln!(w, "      init();")?;
        writeln!(w, "    </script>")?;
    }
    writeln!(w, "  </head>")?;
    writeln!(w, "  <body>")?;
    writeln!(w, "    <div id=\"{ROOT_ID}\">{}</div>", body.trim_end())?;
    writeln!(w, "  </body>")?;
    writeln!(w, "</html>")
}
