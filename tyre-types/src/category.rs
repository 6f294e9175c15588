use lazy_regex::regex_captures;

pub const DEFAULT_CATEGORY: &str = "Tyres";

/// Display category taken from the path segment after `apollotyres.com/en-in/`.
pub fn extract_category(source_url: &str) -> String {
    match regex_captures!(r"apollotyres\.com/en-in/([^/]+)", source_url) {
        Some((_, segment)) => itertools::join(
            segment.replace('-', " ").split(' ').map(capitalize_first),
            " ",
        ),
        None => DEFAULT_CATEGORY.to_string(),
    }
}

fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
