//! Turns raw quoted tokens into plain content paths

use super::parser::QuoteStyle;
use thiserror::Error;

/// Reasons a raw token cannot be reduced to a path
///
/// None of these are fatal. [`DequoteError::Empty`] is skipped quietly; the
/// others are recorded against the problem file that holds the token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DequoteError {
    /// The token does not start and end with the delimiters of its style
    #[error("Token {token} is not delimited by {style}")]
    Delimiters { token: String, style: QuoteStyle },

    /// Nothing but whitespace between the delimiters
    #[error("Token {token} has no content")]
    Empty { token: String },

    /// A quote character survived inside the content, e.g. `"a" . "b.png"`
    #[error("Token {token} contains an unbalanced quote")]
    MismatchedQuote { token: String },
}

impl DequoteError {
    /// Whether the reference can be dropped without reporting it
    pub fn is_soft(&self) -> bool {
        matches!(self, DequoteError::Empty { .. })
    }
}

/// Strips the delimiters of `raw` according to `style`
///
/// Plain quotes lose their first and last character. Quote-like operators
/// lose the operator name, optional whitespace, the first `(` and the last
/// `)`; surrounding whitespace inside the brackets is trimmed.
///
/// # Example
///
/// ```
/// use course_export::core::assets::{dequote, QuoteStyle};
///
/// assert_eq!(dequote("'a.png'", QuoteStyle::Single).unwrap(), "a.png");
/// assert_eq!(dequote("qw ( b.png )", QuoteStyle::Qw).unwrap(), "b.png");
/// assert!(dequote("\"a\" . \"b.png\"", QuoteStyle::Double).is_err());
/// ```
pub fn dequote(raw: &str, style: QuoteStyle) -> Result<String, DequoteError> {
    let delimiters = || DequoteError::Delimiters {
        token: raw.to_string(),
        style,
    };

    let inner = if style.is_bracketed() {
        let operator = style.opener().trim_end_matches('(');
        raw.strip_prefix(operator)
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix('('))
            .and_then(|rest| rest.strip_suffix(')'))
            .map(str::trim)
            .ok_or_else(delimiters)?
    } else {
        let quote = style.opener();
        if raw.len() < 2 * quote.len() {
            return Err(delimiters());
        }
        raw.strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
            .ok_or_else(delimiters)?
    };

    if inner.trim().is_empty() {
        return Err(DequoteError::Empty {
            token: raw.to_string(),
        });
    }
    if inner.contains(|c| matches!(c, '"' | '\'' | '`')) {
        return Err(DequoteError::MismatchedQuote {
            token: raw.to_string(),
        });
    }

    Ok(inner.to_string())
}
