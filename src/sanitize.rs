//! Cleanup of generated itinerary text
//!
//! [`clean_output`] strips the JSON and markdown artifacts left in the
//! provider's reply. Its steps are order dependent. [`render_markup`] then
//! reduces the text to an allow-listed set of HTML tags, so the result can
//! be placed into the page.

use std::sync::LazyLock;

use regex::Regex;

static OUTPUT_KEY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""output":"#).unwrap());
static BRACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[{}]").unwrap());
static LEADING_QUOTE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^\s*""#).unwrap());
// A trailing `\"` is an escaped quote inside the text, not the closing one
static TRAILING_QUOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(^|[^\\])"\s*$"#).unwrap());
static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*|\*").unwrap());
static ESCAPED_NEWLINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\\n").unwrap());

/// Turn a raw generation reply into display text.
#[must_use]
pub fn clean_output(raw: &str) -> String {
    let text = OUTPUT_KEY.replace_all(raw, "");
    let text = BRACES.replace_all(&text, "");
    let text = LEADING_QUOTE.replace(&text, "");
    let text = TRAILING_QUOTE.replace(&text, "${1}");
    let text = EMPHASIS.replace_all(&text, " ");
    let text = ESCAPED_NEWLINE.replace_all(&text, "\n");
    text.trim().to_string()
}

/// Keep only safe formatting markup (headings, paragraphs, lists, emphasis, links).
#[must_use]
pub fn render_markup(cleaned: &str) -> String {
    ammonia::Builder::default()
        .link_rel(Some("noopener noreferrer"))
        .clean(cleaned)
        .to_string()
}

/// Clean a raw reply and render it as safe markup.
#[must_use]
pub fn sanitize(raw: &str) -> String {
    render_markup(&clean_output(raw))
}
