// SPDX-FileCopyrightText: 2026 Pwnstore Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal output helpers.
//!
//! Colors are used only when stdout is a TTY and `--plain` was not given;
//! otherwise every marker falls back to a bracketed ASCII tag.

use std::io::IsTerminal;

use colored::Colorize;

/// Prints user-facing lines, colored or plain.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    color: bool,
}

impl Printer {
    pub fn new(plain: bool) -> Self {
        Self {
            color: !plain && std::io::stdout().is_terminal(),
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn success(&self, message: &str) {
        if self.color {
            println!("{} {message}", "✓".green());
        } else {
            println!("[OK] {message}");
        }
    }

    pub fn warning(&self, message: &str) {
        if self.color {
            println!("{} {}", "!".yellow(), message.yellow());
        } else {
            println!("[WARN] {message}");
        }
    }

    /// Errors go to stderr.
    pub fn failure(&self, message: &str) {
        if self.color {
            eprintln!("{} {}", "✗".red(), message.red());
        } else {
            eprintln!("[FAIL] {message}");
        }
    }

    pub fn heading(&self, text: &str) -> String {
        if self.color {
            text.bold().yellow().to_string()
        } else {
            text.to_string()
        }
    }

    /// A plugin name, padded to `width` before coloring so columns line up.
    pub fn name(&self, name: &str, width: usize) -> String {
        let padded = format!("{name:<width$}");
        if self.color {
            padded.cyan().bold().to_string()
        } else {
            padded
        }
    }

    pub fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    /// Installed-status column.
    pub fn status(&self, installed: bool, width: usize) -> String {
        let label = if installed { "installed" } else { "available" };
        let padded = format!("{label:<width$}");
        match (self.color, installed) {
            (true, true) => padded.green().to_string(),
            (true, false) => padded.dimmed().to_string(),
            (false, _) => padded,
        }
    }
}
