//! Key/value formatting templates.
//!
//! The config file carries printf-style patterns (`key_fmt`, `val_fmt`)
//! with a single integer directive: `%d`, `%Nd`, or `%0Nd`. A pattern is
//! parsed once at startup; rendering is then infallible, so key derivation
//! is identical for the generation pass and for later lookups.

use std::fmt::Write as _;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template {0:?} has no %d directive")]
    MissingDirective(String),

    #[error("template {0:?}: unsupported directive, only %d / %Nd / %0Nd are recognized")]
    UnsupportedDirective(String),

    #[error("template {0:?} has more than one directive")]
    ExtraDirective(String),
}

/// Integer padding carried by a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pad {
    None,
    Space(usize),
    Zero(usize),
}

/// A parsed `prefix%0Nd suffix` pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    prefix: String,
    suffix: String,
    pad: Pad,
}

impl Template {
    /// Parse a pattern containing exactly one `%d`-family directive.
    pub fn parse(pattern: &str) -> Result<Self, TemplateError> {
        let Some(percent) = pattern.find('%') else {
            return Err(TemplateError::MissingDirective(pattern.to_owned()));
        };

        let prefix = pattern[..percent].to_owned();
        let rest = &pattern[percent + 1..];

        let digits_len = rest.chars().take_while(char::is_ascii_digit).count();
        let (digits, after_digits) = rest.split_at(digits_len);
        let Some(suffix) = after_digits.strip_prefix('d') else {
            return Err(TemplateError::UnsupportedDirective(pattern.to_owned()));
        };
        if suffix.contains('%') {
            return Err(TemplateError::ExtraDirective(pattern.to_owned()));
        }

        let pad = if digits.is_empty() {
            Pad::None
        } else {
            // Widths are short; a parse failure here is unreachable.
            let width: usize = digits.parse().unwrap_or(0);
            if digits.starts_with('0') {
                Pad::Zero(width)
            } else {
                Pad::Space(width)
            }
        };

        Ok(Self {
            prefix,
            suffix: suffix.to_owned(),
            pad,
        })
    }

    /// Render the template for one integer.
    pub fn render(&self, n: i64) -> String {
        let mut out = String::with_capacity(self.prefix.len() + self.suffix.len() + 20);
        out.push_str(&self.prefix);
        match self.pad {
            Pad::None => {
                let _ = write!(out, "{n}");
            }
            Pad::Space(width) => {
                let _ = write!(out, "{n:width$}");
            }
            Pad::Zero(width) => {
                let _ = write!(out, "{n:0width$}");
            }
        }
        out.push_str(&self.suffix);
        out
    }
}
