use std::fmt;
use std::fmt::Display;

use console::{Style, Term};

use crate::prelude::*;

#[derive(clap::Parser, Clone, Default, Debug)]
pub struct StdioOpts {
    #[arg(short, long, global = true, help = "Be more verbose")]
    pub verbose: bool,
    #[arg(short, long, global = true, help = "Suppress output")]
    pub quiet: bool,
    #[arg(
        long,
        global = true,
        help = "Whether to use colored output (auto-detected by default)"
    )]
    pub color: Option<bool>,
}

impl StdioOpts {
    fn verbosity(&self) -> u32 {
        match (self.quiet, self.verbose) {
            (false, false) => 1,
            (false, true) => 2,
            (true, false) => 0,
            (true, true) => 1,
        }
    }
}

/// Runtime config and stdio output fns.
pub struct App {
    term: Term,
    /// There are three levels: `0` = quiet, `1` = normal, `2` = verbose.
    verbosity: u32,
    use_color: bool,
}

impl App {
    pub fn new(opts: &StdioOpts) -> Self {
        let term = Term::stderr();
        let use_color = opts
            .color
            .unwrap_or_else(|| term.is_term() && term.features().colors_supported());

        Self {
            term,
            verbosity: opts.verbosity(),
            use_color,
        }
    }

    /// Verbose and colorless, for tests.
    pub fn with_test_mode() -> Self {
        Self {
            term: Term::stderr(),
            verbosity: 2,
            use_color: false,
        }
    }

    // stdio helpers

    fn styled(&self, style: &Style, text: impl Display) -> String {
        if self.use_color {
            style.apply_to(text).force_styling(true).to_string()
        } else {
            text.to_string()
        }
    }

    fn write_line(&self, line: &str) {
        let _ = self.term.write_line(line);
    }

    fn indent_line(&self, line: &str) {
        self.write_line(&format!("             {}", line));
    }

    fn status_inner(&self, kind: impl Display, style: Style, status: impl Display) {
        if self.verbosity == 0 {
            return;
        }

        let kind = self.styled(&style.bold(), format!("{:>12}", kind));
        let status = format!("{}", status);
        let mut lines = status.lines();
        let first = lines.next().unwrap_or("");
        self.write_line(&format!("{} {}", kind, first));
        lines.for_each(|line| self.indent_line(line));
    }

    pub fn status(&self, verb: &str, status: impl Display) {
        self.status_inner(verb, Style::new().cyan(), status);
    }

    /// Like `status`, but only shown with `--verbose`.
    pub fn detail(&self, verb: &str, status: impl Display) {
        if self.verbosity >= 2 {
            self.status_inner(verb, Style::new().blue(), status);
        }
    }

    pub fn success(&self, verb: impl Display) {
        self.status_inner(verb, Style::new().green(), "");
    }

    pub fn warning(&self, msg: impl Display) {
        self.status_inner("Warning", Style::new().yellow(), msg);
    }

    pub fn error(&self, error: Error) {
        if self.verbosity == 0 {
            return;
        }

        self.status_inner("error", Style::new().red(), &error);

        let gutter = self.styled(&Style::new().red().bold(), "  |");
        for err in error.chain().skip(1) {
            let err_str = format!("{}", err);
            for line in err_str.lines() {
                self.write_line(&format!("{} {}", gutter, line));
            }
        }
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("verbosity", &self.verbosity)
            .field("use_color", &self.use_color)
            .finish()
    }
}
