//! Display helpers for raw specification maps.

use crate::product::Specifications;
use lazy_regex::regex_replace_all;

pub const DEFAULT_TOP_SPECS: usize = 5;

/// `""`, `"x"` and `"null"` mark a specification as not applicable.
pub fn is_displayable(value: &str) -> bool {
    !matches!(value, "" | "x" | "null")
}

/// `max_speed(kmh)` becomes `Max Speed (Kmh)`.
pub fn format_key(raw: &str) -> String {
    let spaced = raw.replace(['_', '-'], " ");
    let spaced = regex_replace_all!(r"\(([^)]+)\)", &spaced, |_, unit: &str| format!(" ({unit})"));
    itertools::join(spaced.split_whitespace().map(capitalize), " ")
}

fn capitalize(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut done = false;
    for ch in lower.chars() {
        if !done && ch.is_alphanumeric() {
            out.extend(ch.to_uppercase());
            done = true;
        } else {
            out.push(ch);
        }
    }
    out
}

pub fn top_specs(specs: &Specifications, count: usize) -> Vec<(String, String)> {
    specs
        .iter()
        .filter(|(_, v)| is_displayable(v))
        .take(count)
        .map(|(k, v)| (format_key(k), v.to_string()))
        .collect()
}

pub fn displayable_specs(specs: &Specifications) -> Vec<(String, String)> {
    top_specs(specs, usize::MAX)
}
