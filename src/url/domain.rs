use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// Ports are not part of the domain.
///
/// # Arguments
///
/// * `url` - The URL to extract the domain from
///
/// # Returns
///
/// * `Some(String)` - The lowercase domain/host
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use poi_crawl::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Resolves the host a crawl is restricted to
///
/// Accepts either a full URL (`https://www.example.com/en`) or a bare host
/// (`www.example.com`); bare hosts are parsed as if they had an `https`
/// scheme. The `www.` prefix is kept, so `www.example.com` and
/// `example.com` are different hosts.
///
/// # Examples
///
/// ```
/// use poi_crawl::url::base_host;
///
/// assert_eq!(base_host("https://www.example.com/en").unwrap(), "www.example.com");
/// assert_eq!(base_host("www.example.com").unwrap(), "www.example.com");
/// ```
pub fn base_host(base: &str) -> UrlResult<String> {
    let trimmed = base.trim();

    let parsed = match Url::parse(trimmed) {
        Ok(url) if url.has_host() => url,
        _ => Url::parse(&format!("https://{}", trimmed))
            .map_err(|e| UrlError::Parse(format!("{}: {}", base, e)))?,
    };

    extract_domain(&parsed).ok_or_else(|| UrlError::MissingDomain(base.to_string()))
}

/// The URL a fresh crawl starts from
///
/// A full base URL is used as given; a bare host gets an `https://` scheme.
pub fn homepage_url(base: &str) -> UrlResult<String> {
    let trimmed = base.trim();
    match Url::parse(trimmed) {
        Ok(url) if url.has_host() => Ok(trimmed.to_string()),
        _ => {
            let candidate = format!("https://{}", trimmed);
            Url::parse(&candidate).map_err(|e| UrlError::Parse(format!("{}: {}", base, e)))?;
            Ok(candidate)
        }
    }
}
