//! Owned storage domain matching

use url::Url;

/// The storage host this system may delete objects from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedDomain {
    host: String,
}

impl OwnedDomain {
    /// `domain` is a bare host such as `abc.storage.example.com`
    pub fn new(domain: &str) -> Self {
        Self {
            host: domain.trim().trim_end_matches('.').to_ascii_lowercase(),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Whether `url` is hosted on this domain or one of its subdomains
    ///
    /// Unparseable or host-less URLs are never owned, and an empty domain owns
    /// nothing.
    pub fn owns(&self, url: &str) -> bool {
        if self.host.is_empty() {
            return false;
        }
        let Ok(parsed) = Url::parse(url.trim()) else {
            return false;
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            return false;
        }
        let Some(host) = parsed.host_str() else {
            return false;
        };
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        host == self.host
            || host
                .strip_suffix(&self.host)
                .is_some_and(|prefix| prefix.ends_with('.'))
    }
}
