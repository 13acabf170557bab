use std::fmt::{self, Write};

use bitflags::bitflags;

use crate::node::Node;

const VOID: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

bitflags! {
    #[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
    pub struct Mode: u8 {
        const PRETTY = 0b01;
    }
}

pub fn render_to_string(mode: Mode, node: &Node) -> String {
    let mut out = String::new();
    render(&mut out, mode, node).unwrap();
    out
}

pub fn render<W: Write>(w: &mut W, mode: Mode, node: &Node) -> fmt::Result {
    let nl = |w: &mut W| {
        if mode.contains(Mode::PRETTY) {
            writeln!(w)
        } else {
            Ok(())
        }
    };

    match node {
        Node::Element(elem) => {
            let name = &elem.name;
            let attr_str = elem
                .attrs
                .iter()
                .map(|(key, value)| format!(" {}=\"{}\"", key, html_escape(value)))
                .collect::<Vec<_>>()
                .join("");

            if VOID.contains(&name.as_str()) {
                write!(w, "<{name}{attr_str} />")?;
                nl(w)
            } else {
                write!(w, "<{name}{attr_str}>")?;
                nl(w)?;
                render_children(w, mode, node)?;
                write!(w, "</{name}>")?;
                nl(w)
            }
        }
        Node::Text(content) => {
            w.write_str(&html_escape(content))?;
            nl(w)
        }
        Node::Fragment(children) => {
            for child in children {
                render(w, mode, child)?;
            }
            Ok(())
        }
    }
}

fn render_children<W: Write>(w: &mut W, mode: Mode, node: &Node) -> fmt::Result {
    if mode.contains(Mode::PRETTY) {
        let mut buf = String::new();
        for child in node.children() {
            render(&mut buf, mode, child)?;
        }

        for line in buf.lines() {
            writeln!(w, "  {}", line)?;
        }
    } else {
        for child in node.children() {
            render(w, mode, child)?;
        }
    }
    Ok(())
}

// See https://cheatsheetseries.owasp.org/cheatsheets/Cross_Site_Scripting_Prevention_Cheat_Sheet.html#output-encoding-for-html-contexts
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
