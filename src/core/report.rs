use crate::core::{Classification, ExpiryOutcome, ExpiryRecord};
use anstyle::{AnsiColor, Color, Style};
use std::io::{IsTerminal, Write};

pub struct Styles {
    pub expiring: Style,
    pub valid: Style,
    pub muted: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            expiring: Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))),
            valid: Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))),
            muted: Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))),
        }
    }
}

/// Writes progress and classification lines for a human reader.
pub struct ConsoleReporter {
    styles: Styles,
    use_colors: bool,
}

impl ConsoleReporter {
    /// Colors only when stdout is a terminal and `NO_COLOR` is unset.
    pub fn new() -> Self {
        Self {
            styles: Styles::default(),
            use_colors: Self::should_use_colors(),
        }
    }

    pub fn without_colors() -> Self {
        Self {
            styles: Styles::default(),
            use_colors: false,
        }
    }

    fn should_use_colors() -> bool {
        std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
    }

    fn styled(&self, text: &str, style: &Style) -> String {
        if self.use_colors {
            format!("{}{}{}", style.render(), text, style.render_reset())
        } else {
            text.to_string()
        }
    }

    pub fn repository<W: Write>(&self, out: &mut W, name: &str) -> std::io::Result<()> {
        writeln!(out, "Processing repository: {}", name)
    }

    pub fn new_email<W: Write>(&self, out: &mut W, email: &str) -> std::io::Result<()> {
        writeln!(out, "{}", self.styled(email, &self.styles.muted))
    }

    pub fn saved<W: Write>(&self, out: &mut W, path: &str) -> std::io::Result<()> {
        writeln!(out, "\nUnique emails saved to {}", path)
    }

    /// Plain text of the classification line; `None` for unclassified records.
    pub fn expiry_line(record: &ExpiryRecord) -> Option<String> {
        let ExpiryOutcome::Classified {
            expires_on,
            days_remaining,
            classification,
        } = &record.outcome
        else {
            return None;
        };

        // `as` truncates toward zero.
        let days = *days_remaining as i64;
        let date = expires_on.format("%Y-%m-%d");
        Some(match classification {
            Classification::ExpiringSoon => format!(
                "Domain {} is nearing expiry (Expires on {}, {} days left)",
                record.domain, date, days
            ),
            Classification::Valid => format!(
                "Domain {} has a valid expiry date (Expires on {}, {} days left)",
                record.domain, date, days
            ),
        })
    }

    pub fn expiry<W: Write>(&self, out: &mut W, record: &ExpiryRecord) -> std::io::Result<()> {
        let Some(line) = Self::expiry_line(record) else {
            return Ok(());
        };
        let style = match record.classification() {
            Some(Classification::ExpiringSoon) => &self.styles.expiring,
            _ => &self.styles.valid,
        };
        writeln!(out, "{}", self.styled(&line, style))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}
