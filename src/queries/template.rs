//! Message templates for query answers.

use crate::processing::AggregateResult;

const VALUE: &str = "{value}";
const TOTAL: &str = "{total}";

/// How the `{total}` placeholder is formatted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalStyle {
    /// Two decimal places (money).
    Currency,
    /// No decimal places (counts).
    Whole,
}

impl TotalStyle {
    fn format(self, total: f64) -> String {
        match self {
            Self::Currency => format!("{total:.2}"),
            Self::Whole => format!("{total:.0}"),
        }
    }
}

/// A sentence with a `{value}` placeholder and, optionally, a `{total}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageTemplate {
    text: &'static str,
    total: Option<TotalStyle>,
}

impl MessageTemplate {
    /// Template rendering only the answer.
    ///
    /// # Panics
    ///
    /// Panics if `text` lacks `{value}` or contains `{total}`.
    pub fn value_only(text: &'static str) -> Self {
        Self::checked(text, None)
    }

    /// Template rendering the answer and its group total.
    ///
    /// # Panics
    ///
    /// Panics if `text` lacks either `{value}` or `{total}`.
    pub fn with_total(text: &'static str, style: TotalStyle) -> Self {
        Self::checked(text, Some(style))
    }

    fn checked(text: &'static str, total: Option<TotalStyle>) -> Self {
        assert!(text.contains(VALUE), "message template {text:?} has no {VALUE} placeholder");
        assert_eq!(
            text.contains(TOTAL),
            total.is_some(),
            "message template {text:?} does not match its declared placeholder count"
        );
        Self { text, total }
    }

    /// Number of placeholders (1 or 2).
    pub fn arity(&self) -> usize {
        if self.total.is_some() { 2 } else { 1 }
    }

    /// `true` if the template renders a `{total}`.
    pub fn needs_total(&self) -> bool {
        self.total.is_some()
    }

    /// Raw template text.
    pub fn text(&self) -> &'static str {
        self.text
    }

    /// Fill the placeholders from `result`.
    ///
    /// Only the template text is scanned, so a value that itself contains `{total}` is copied
    /// through unchanged.
    pub fn render(&self, result: &AggregateResult) -> String {
        let total = match (self.total, result.total) {
            (None, _) => None,
            (Some(style), Some(total)) => Some(style.format(total)),
            (Some(_), None) => unreachable!("two-placeholder template rendered without a group total"),
        };

        let mut out = String::with_capacity(self.text.len() + result.value.len());
        let mut rest = self.text;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open..];
            if let Some(after) = tail.strip_prefix(VALUE) {
                out.push_str(&result.value);
                rest = after;
            } else if let (Some(after), Some(total)) = (tail.strip_prefix(TOTAL), total.as_deref()) {
                out.push_str(total);
                rest = after;
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }
        out.push_str(rest);
        out
    }
}
