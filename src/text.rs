use regex::Regex;
use std::sync::OnceLock;

/// Icon glyphs the host application renders inline with field text
/// (Unicode private use area).
fn icon_glyphs() -> &'static Regex {
    static ICONS: OnceLock<Regex> = OnceLock::new();
    ICONS.get_or_init(|| Regex::new(r"[\u{E000}-\u{F8FF}]").expect("valid icon pattern"))
}

/// Cleans text read from an element.
///
/// Strips icon glyphs, trims every line, drops empty lines and joins the
/// rest with a single space. Returns `None` when nothing readable is left.
pub fn clean(raw: &str) -> Option<String> {
    let stripped = icon_glyphs().replace_all(raw, "");
    let cleaned = stripped
        .lines()
        .map(normalize_whitespace_in_segment)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.is_empty() { None } else { Some(cleaned) }
}

/// Normalizes whitespace within a single line
pub fn normalize_whitespace_in_segment(segment: &str) -> String {
    segment.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Label used in logs for a row whose name could not be read
pub fn placeholder_label(index: usize) -> String {
    format!("Business #{}", index + 1)
}
