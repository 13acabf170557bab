use std::io::{self, Write};

use anyhow::{anyhow, bail, Result};
use podcast_view::{
    app::upload_button,
    render::{render_to_string, Mode},
};

use crate::{page, shell};

/// Prints the landing view to stdout and optionally clicks its upload button.
///
/// Clicks go through [`ShellNotifier`](crate::shell::ShellNotifier), so the
/// notification shows up as a shell notice.
pub fn run(click: bool) -> Result<()> {
    preview(&mut io::stdout().lock(), click)
}

fn preview(out: &mut impl Write, click: bool) -> Result<()> {
    let node = page::landing();
    out.write_all(render_to_string(Mode::PRETTY, &node).as_bytes())?;
    out.flush()?;

    if click {
        let button = upload_button(&node).ok_or_else(|| anyhow!("view has no upload button"))?;
        shell().status("Clicking", "upload button");
        if button.emit("click") == 0 {
            bail!("upload button has no click listener");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use podcast_view::app;

    use super::*;

    #[test]
    fn prints_the_pretty_view() {
        let mut out = vec![];
        preview(&mut out, false).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, render_to_string(Mode::PRETTY, &page::landing()));
        assert!(text.contains(app::HEADING));
        assert!(text.contains(app::UPLOAD_LABEL));
    }

    #[test]
    fn click_reaches_the_button() {
        let mut out = vec![];
        preview(&mut out, true).unwrap();
        assert!(!out.is_empty());
    }

    #[test]
    fn run_with_click_succeeds() {
        run(true).unwrap();
    }
}
