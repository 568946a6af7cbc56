use regex::Regex;
use std::sync::LazyLock;

static SITE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://([^/]+)/").expect("site pattern compiles"));

/// Host part of an `http(s)://host/...` URL. URLs without a scheme or without
/// a slash after the host have no site.
pub fn site_of(url: &str) -> Option<&str> {
    SITE_PATTERN
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|host| host.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_host() {
        assert_eq!(site_of("http://a.com/x"), Some("a.com"));
        assert_eq!(site_of("https://www.example.org/a/b?c=d"), Some("www.example.org"));
        assert_eq!(site_of("http://localhost:8080/"), Some("localhost:8080"));
    }

    #[test]
    fn requires_scheme_and_trailing_slash() {
        assert_eq!(site_of("http://a.com"), None);
        assert_eq!(site_of("a.com/x"), None);
        assert_eq!(site_of("ftp://a.com/x"), None);
        assert_eq!(site_of("chrome://newtab/"), None);
        assert_eq!(site_of(""), None);
    }
}
