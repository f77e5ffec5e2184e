//! Asset reference scanner for problem files
//!
//! Problem files are written in a Perl-flavoured authoring language. Rather
//! than parsing that language, the scanner runs a single text pattern over the
//! file and reports every quoted string that is either the first argument of an
//! `image(...)` call or looks like a media file name. The pattern runs on the
//! linear-time `regex` engine, so file size never makes a scan give up.
//!
//! This is a bounded heuristic with known blind spots:
//! - a `#` anywhere earlier on a line hides the rest of that line, including
//!   `#` inside string literals and Perl's `$#array`, which yields false
//!   negatives;
//! - any quoted string ending in a media extension is reported, even when the
//!   script never uses it as a file name; such copies fail and are logged;
//! - escaped quotes and interpolation are not understood.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Media extensions, case-insensitive: gif, apng, png, jpg, jpeg, svg, webp
const MEDIA_EXTENSIONS: &str =
    r"(?:[gG][iI][fF]|[aA]?[pP][nN][gG]|[jJ][pP][eE]?[gG]|[sS][vV][gG]|[wW][eE][bB][pP])";

/// String literal conventions recognized by the scanner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteStyle {
    /// `"..."`
    Double,
    /// `'...'`
    Single,
    /// `` `...` ``
    Backtick,
    /// `qw(...)`
    Qw,
    /// `qq(...)`
    Qq,
    /// `q(...)`
    Q,
}

impl QuoteStyle {
    /// All styles in match priority order
    pub const ALL: [QuoteStyle; 6] = [
        QuoteStyle::Double,
        QuoteStyle::Single,
        QuoteStyle::Backtick,
        QuoteStyle::Qw,
        QuoteStyle::Qq,
        QuoteStyle::Q,
    ];

    /// Whether the style is a quote-like operator with bracket delimiters
    pub fn is_bracketed(self) -> bool {
        matches!(self, QuoteStyle::Qw | QuoteStyle::Qq | QuoteStyle::Q)
    }

    /// Opening delimiter as written in source, without whitespace
    pub fn opener(self) -> &'static str {
        match self {
            QuoteStyle::Double => "\"",
            QuoteStyle::Single => "'",
            QuoteStyle::Backtick => "`",
            QuoteStyle::Qw => "qw(",
            QuoteStyle::Qq => "qq(",
            QuoteStyle::Q => "q(",
        }
    }

    fn open_pattern(self) -> &'static str {
        match self {
            QuoteStyle::Double => "\"",
            QuoteStyle::Single => "'",
            QuoteStyle::Backtick => "`",
            QuoteStyle::Qw => r"\bqw\s*\(",
            QuoteStyle::Qq => r"\bqq\s*\(",
            QuoteStyle::Q => r"\bq\s*\(",
        }
    }

    fn close_pattern(self) -> &'static str {
        match self {
            QuoteStyle::Double => "\"",
            QuoteStyle::Single => "'",
            QuoteStyle::Backtick => "`",
            QuoteStyle::Qw | QuoteStyle::Qq | QuoteStyle::Q => r"\)",
        }
    }

    // Plain quotes may not contain themselves; the rest run to the closer.
    fn inside_pattern(self) -> &'static str {
        match self {
            QuoteStyle::Double => "[^\"]",
            QuoteStyle::Single => "[^']",
            _ => ".",
        }
    }
}

impl fmt::Display for QuoteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuoteStyle::Double => write!(f, "double quote"),
            QuoteStyle::Single => write!(f, "single quote"),
            QuoteStyle::Backtick => write!(f, "backtick"),
            QuoteStyle::Qw => write!(f, "qw()"),
            QuoteStyle::Qq => write!(f, "qq()"),
            QuoteStyle::Q => write!(f, "q()"),
        }
    }
}

/// Surface form a reference was found in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceForm {
    /// First argument of an `image(...)` call
    ImageCall,
    /// Free-standing string ending in a media extension
    BareAsset,
}

/// A raw reference found in problem text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetReference<'a> {
    /// Matched token, still carrying its delimiters
    pub raw: &'a str,

    /// Quoting convention of `raw`
    pub quote: QuoteStyle,

    /// Construct the token was found in
    pub form: ReferenceForm,

    /// Byte offset of `raw` in the scanned text
    pub offset: usize,
}

impl AssetReference<'_> {
    /// Strips the delimiters, see [`super::dequote`]
    pub fn dequote(&self) -> Result<String, super::DequoteError> {
        super::dequote(self.raw, self.quote)
    }
}

/// Scans problem text for asset references
///
/// The returned iterator is lazy and yields references left to right.
/// Scanning the same text again yields the same sequence.
///
/// # Example
///
/// ```
/// use course_export::core::assets::{scan, QuoteStyle};
///
/// let text = "BEGIN_TEXT\n\\{ image('figs/a.png', width => 200) \\}\nEND_TEXT";
/// let refs: Vec<_> = scan(text).collect();
/// assert_eq!(refs.len(), 1);
/// assert_eq!(refs[0].raw, "'figs/a.png'");
/// assert_eq!(refs[0].quote, QuoteStyle::Single);
/// ```
pub fn scan(text: &str) -> AssetReferences<'_> {
    AssetReferences {
        text,
        pos: Some(0),
    }
}

/// Iterator returned by [`scan`]
#[derive(Debug, Clone)]
pub struct AssetReferences<'a> {
    text: &'a str,
    pos: Option<usize>,
}

impl<'a> Iterator for AssetReferences<'a> {
    type Item = AssetReference<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let pos = self.pos?;
            let Some(captures) = reference_pattern().captures_at(self.text, pos) else {
                self.pos = None;
                return None;
            };

            let whole = captures.get(0)?;
            if is_commented(self.text, whole.start()) {
                self.pos = next_line_start(self.text, whole.start());
                continue;
            }

            // Groups 1-6 belong to the image call, 7-12 to bare strings.
            let found = (1..=QuoteStyle::ALL.len() * 2)
                .find_map(|group| captures.get(group).map(|m| (group, m)));
            let Some((group, token)) = found else {
                self.pos = Some(whole.end());
                continue;
            };

            let index = group - 1;
            let quote = QuoteStyle::ALL[index % QuoteStyle::ALL.len()];
            if is_url(token.as_str(), quote) {
                // Later arguments of the same call are still scanned.
                self.pos = Some(token.end());
                continue;
            }
            self.pos = Some(whole.end());

            return Some(AssetReference {
                raw: token.as_str(),
                quote,
                form: if index < QuoteStyle::ALL.len() {
                    ReferenceForm::ImageCall
                } else {
                    ReferenceForm::BareAsset
                },
                offset: token.start(),
            });
        }
    }
}

fn reference_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(&build_pattern()).expect("asset reference pattern must compile")
    })
}

fn build_pattern() -> String {
    let image_arguments = QuoteStyle::ALL
        .iter()
        .map(|style| {
            format!(
                "({}.+?{})",
                style.open_pattern(),
                style.close_pattern()
            )
        })
        .collect::<Vec<_>>()
        .join("|");

    let bare_assets = QuoteStyle::ALL
        .iter()
        .map(|style| {
            format!(
                r"({}{}*?\.{MEDIA_EXTENSIONS}{})",
                style.open_pattern(),
                style.inside_pattern(),
                style.close_pattern()
            )
        })
        .collect::<Vec<_>>()
        .join("|");

    format!(r"\bimage\s*\(\s*(?:{image_arguments})\s*(?:,[\s\S]*?)?\)|{bare_assets}")
}

/// Quoted content starting with an `http:` or `https:` scheme
fn is_url(raw: &str, style: QuoteStyle) -> bool {
    let content = if style.is_bracketed() {
        raw.split_once('(').map_or(raw, |(_, rest)| rest)
    } else {
        &raw[style.opener().len()..]
    };
    let content = content.trim_start();
    content.starts_with("http:") || content.starts_with("https:")
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn line_start(text: &str, offset: usize) -> usize {
    text[..offset].rfind(is_line_break).map_or(0, |index| index + 1)
}

/// A position is commented out when a `#` precedes it on the same line
fn is_commented(text: &str, offset: usize) -> bool {
    text[line_start(text, offset)..offset].contains('#')
}

fn next_line_start(text: &str, offset: usize) -> Option<usize> {
    text[offset..]
        .find(is_line_break)
        .map(|index| offset + index + 1)
}
