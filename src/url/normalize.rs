use url::Url;

/// Identity key for a discovered URL
///
/// Two URL strings that point at the same page map to the same key:
///
/// 1. The URL is parsed, which lowercases the host and turns an empty path
///    into `/`
/// 2. The fragment (everything after `#`) is removed
///
/// Scheme, path and query are otherwise kept as given. Strings that do not
/// parse as absolute URLs are their own key.
///
/// # Examples
///
/// ```
/// use poi_crawl::url::link_key;
///
/// assert_eq!(link_key("https://X.test"), link_key("https://x.test/"));
/// assert_eq!(link_key("https://x.test/a#top"), "https://x.test/a");
/// ```
pub fn link_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(mut parsed) => {
            parsed.set_fragment(None);
            parsed.into()
        }
        Err(_) => url.to_string(),
    }
}
