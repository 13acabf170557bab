use std::{
    fmt,
    io::Write,
    sync::{Mutex, OnceLock},
};

use anstream::ColorChoice;
use anstyle::{AnsiColor, Effects, Style};
use podcast_view::Notifier;

static SHELL: OnceLock<Shell> = OnceLock::new();

pub fn shell() -> &'static Shell {
    SHELL.get_or_init(Shell::new)
}

/// The kinds of line the CLI prints.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Kind {
    Error,
    Warning,
    Status,
    /// Overwritten by whatever line comes next.
    Progress,
    Notice,
}

impl Kind {
    fn style(self) -> Style {
        let color = match self {
            Self::Error => AnsiColor::Red,
            Self::Warning => AnsiColor::Yellow,
            Self::Status => AnsiColor::Green,
            Self::Progress => AnsiColor::Cyan,
            Self::Notice => AnsiColor::Magenta,
        };
        color.on_default().effects(Effects::BOLD)
    }

    /// Labelled lines read `error: ...`, the rest right-align their label.
    fn is_labelled(self) -> bool {
        matches!(self, Self::Error | Self::Warning)
    }
}

fn format_line(kind: Kind, label: &dyn fmt::Display, message: &dyn fmt::Display) -> String {
    let style = kind.style();
    if kind.is_labelled() {
        let bold = Style::new().bold();
        format!("{style}{label}{style:#}{bold}:{bold:#} {message}")
    } else {
        format!("{style}{label:>12}{style:#} {message}")
    }
}

struct Output {
    stream: anstream::Stderr,
    /// The last line was a progress line still on screen.
    dirty: bool,
}

/// Cargo-style status output on stderr.
pub struct Shell {
    output: Mutex<Output>,
    colors: bool,
}

impl Shell {
    fn new() -> Self {
        let stream = anstream::stderr();
        let colors = stream.current_choice() != ColorChoice::Never;
        Self {
            output: Mutex::new(Output {
                stream,
                dirty: false,
            }),
            colors,
        }
    }

    /// Whether stderr takes ANSI colours; child processes follow suit.
    pub fn colors(&self) -> bool {
        self.colors
    }

    fn emit(&self, kind: Kind, label: &dyn fmt::Display, message: &dyn fmt::Display) {
        let mut output = self.output.lock().unwrap_or_else(|err| err.into_inner());
        let mut text = String::new();
        if output.dirty {
            text.push_str("\x1b[2K");
        }
        text.push_str(&format_line(kind, label, message));
        output.dirty = kind == Kind::Progress;
        text.push(if output.dirty { '\r' } else { '\n' });
        output
            .stream
            .write_all(text.as_bytes())
            .expect("failed to write to stderr");
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.emit(Kind::Error, &"error", &message);
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.emit(Kind::Warning, &"warning", &message);
    }

    pub fn status(&self, status: impl fmt::Display, message: impl fmt::Display) {
        self.emit(Kind::Status, &status, &message);
    }

    pub fn progress(&self, status: impl fmt::Display, message: impl fmt::Display) {
        self.emit(Kind::Progress, &status, &message);
    }

    pub fn notice(&self, message: impl fmt::Display) {
        self.emit(Kind::Notice, &"Notice", &message);
    }
}

/// Shows view notifications as shell notices instead of browser alerts.
#[derive(Clone, Copy, Default, Debug)]
pub struct ShellNotifier;

impl Notifier for ShellNotifier {
    fn notify(&self, message: &str) {
        shell().notice(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(kind: Kind, label: &str, message: &str) -> String {
        let line = format_line(kind, &label, &message);
        anstream::adapter::strip_str(&line).to_string()
    }

    #[test]
    fn statuses_are_right_aligned() {
        assert_eq!(
            plain(Kind::Status, "Rendered", "dist/index.html"),
            "    Rendered dist/index.html"
        );
        assert_eq!(plain(Kind::Notice, "Notice", "hi"), "      Notice hi");
    }

    #[test]
    fn errors_and_warnings_are_labelled() {
        assert_eq!(
            plain(Kind::Warning, "warning", "unused key"),
            "warning: unused key"
        );
        assert_eq!(plain(Kind::Error, "error", "no root"), "error: no root");
    }

    #[test]
    fn styles_are_bold() {
        let line = format_line(Kind::Status, &"Finished", &"dist");
        assert!(line.starts_with(&Kind::Status.style().render().to_string()));
        assert!(Kind::Progress.style().get_effects().contains(Effects::BOLD));
    }
}
