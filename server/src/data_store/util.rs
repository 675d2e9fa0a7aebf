/// Build a (I)LIKE pattern for matching the given search term as a substring.
///
/// The LIKE wildcards `%` and `_` in the search term are escaped with a backslash (PostgreSQL's
/// default escape character), so they match literally.
pub fn like_pattern(search_term: &str) -> String {
    let mut result = String::with_capacity(search_term.len() + 2);
    result.push('%');
    for c in search_term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            result.push('\\');
        }
        result.push(c);
    }
    result.push('%');
    result
}

/// Check if `text` contains `search_term`, ignoring case. In-memory counterpart of
/// [like_pattern] with ILIKE.
#[cfg(test)]
pub fn contains_ignore_case(text: &str, search_term: &str) -> bool {
    text.to_lowercase().contains(&search_term.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern() {
        assert_eq!(like_pattern("band"), "%band%");
        assert_eq!(like_pattern(""), "%%");
        assert_eq!(like_pattern("100%_sure\\"), "%100\\%\\_sure\\\\%");
    }
}
