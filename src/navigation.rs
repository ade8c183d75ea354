//! Browsing-context capability
//!
//! The login page never touches the transport directly. It reads the visible
//! query, asks for it to be replaced, and asks for full-page redirects through
//! a [`Navigator`]. `RequestNavigator` adapts one HTTP request.

use std::fmt;

/// Ordered query parameters of the visible URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (without the leading `?`)
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        Self(
            url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        )
    }

    /// First value for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First non-empty value for `key`; empty values count as absent
    #[must_use]
    pub fn get_present(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.0.push((key.to_string(), value.to_string()));
        self
    }

    /// Encoded form, empty string when there are no parameters
    #[must_use]
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.0.iter())
            .finish()
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Capability over the page's browsing context
pub trait Navigator {
    /// Navigate the whole page to `url`
    fn redirect_to(&mut self, url: &str);

    /// Query parameters of the currently visible URL
    fn current_query_params(&self) -> QueryParams;

    /// Replace the visible query without navigating or adding history
    fn replace_query_params(&mut self, params: &QueryParams);
}

/// Navigator for a single server-rendered request
///
/// Records what the page asked for so the handler can answer with a redirect
/// or with a page that rewrites the address bar.
#[derive(Debug, Clone, Default)]
pub struct RequestNavigator {
    query: QueryParams,
    redirect: Option<String>,
    replaced: bool,
}

impl RequestNavigator {
    #[must_use]
    pub fn new(query: QueryParams) -> Self {
        Self {
            query,
            redirect: None,
            replaced: false,
        }
    }

    #[must_use]
    pub fn from_query_string(query: &str) -> Self {
        Self::new(QueryParams::parse(query))
    }

    /// Last redirect target requested by the page
    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    /// Whether the visible query was replaced during this request
    #[must_use]
    pub fn query_replaced(&self) -> bool {
        self.replaced
    }
}

impl Navigator for RequestNavigator {
    fn redirect_to(&mut self, url: &str) {
        self.redirect = Some(url.to_string());
    }

    fn current_query_params(&self) -> QueryParams {
        self.query.clone()
    }

    fn replace_query_params(&mut self, params: &QueryParams) {
        if *params != self.query {
            self.replaced = true;
        }
        self.query = params.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_get() {
        let params = QueryParams::parse("?provider=okta&go=1&code=&x=a%20b");

        assert_eq!(params.get("provider"), Some("okta"));
        assert_eq!(params.get("go"), Some("1"));
        assert_eq!(params.get("code"), Some(""));
        assert_eq!(params.get_present("code"), None);
        assert_eq!(params.get("x"), Some("a b"));
        assert_eq!(params.get("missing"), None);
    }

    #[test]
    fn test_query_string_encoding() {
        let params = QueryParams::new()
            .with("provider", "Corp SSO")
            .with("go", "1");
        assert_eq!(params.to_query_string(), "provider=Corp+SSO&go=1");
        assert_eq!(QueryParams::new().to_query_string(), "");
    }

    #[test]
    fn test_request_navigator_records_actions() {
        let mut nav = RequestNavigator::from_query_string("code=abc123");
        assert!(!nav.query_replaced());
        assert_eq!(nav.current_query_params().get("code"), Some("abc123"));

        nav.replace_query_params(&QueryParams::new());
        assert!(nav.query_replaced());
        assert!(nav.current_query_params().is_empty());

        nav.redirect_to("/");
        assert_eq!(nav.redirect_target(), Some("/"));
    }

    #[test]
    fn test_replacing_empty_query_is_not_recorded() {
        let mut nav = RequestNavigator::from_query_string("");
        nav.replace_query_params(&QueryParams::new());
        assert!(!nav.query_replaced());
    }
}
