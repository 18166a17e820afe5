use regex::RegexBuilder;

/// Byte ranges of every case-insensitive occurrence of `query` in `text`.
pub fn highlight_ranges(text: &str, query: &str) -> Vec<(usize, usize)> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let Ok(pattern) = RegexBuilder::new(regex::escape(query).as_str())
        .case_insensitive(true)
        .build()
    else {
        return Vec::new();
    };

    pattern
        .find_iter(text)
        .map(|found| (found.start(), found.end()))
        .collect()
}
