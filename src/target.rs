//! Request targets: a URL, or a fully prepared request.

use crate::Result;
use url::Url;

/// Where a call goes.
///
/// A [`Target::Url`] request is shaped by the call's options: content
/// negotiation headers, body serialization, and the method default all
/// apply. A [`Target::Prepared`] request is taken as already fully formed:
/// no header is added, no body is rewritten, and the pass-through request
/// options of the call are ignored in its favor. The behavioral options
/// (retrying, error raising, and the shape of the final value) apply to
/// both kinds.
#[derive(Debug)]
pub enum Target {
    /// A URL to build a request for.
    Url(Url),
    /// A request descriptor the caller has already built.
    Prepared(reqwest::Request),
}

/// Conversion into a [`Target`], accepted by every entry point.
///
/// Implemented for URL strings, [`Url`] values, prepared
/// [`reqwest::Request`] descriptors, and [`Target`] itself.
pub trait IntoTarget {
    /// Performs the conversion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`](crate::Error::InvalidUrl) if a string
    /// target does not parse as a URL.
    fn into_target(self) -> Result<Target>;
}

impl IntoTarget for Target {
    fn into_target(self) -> Result<Target> {
        Ok(self)
    }
}

impl IntoTarget for Url {
    fn into_target(self) -> Result<Target> {
        Ok(Target::Url(self))
    }
}

impl IntoTarget for reqwest::Request {
    fn into_target(self) -> Result<Target> {
        Ok(Target::Prepared(self))
    }
}

impl IntoTarget for &str {
    fn into_target(self) -> Result<Target> {
        Ok(Target::Url(Url::parse(self)?))
    }
}

impl IntoTarget for String {
    fn into_target(self) -> Result<Target> {
        self.as_str().into_target()
    }
}

impl IntoTarget for &String {
    fn into_target(self) -> Result<Target> {
        self.as_str().into_target()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_str_parses_to_url_target() {
        let target = "https://example.com/widgets".into_target().unwrap();
        match target {
            Target::Url(url) => assert_eq!(url.path(), "/widgets"),
            Target::Prepared(_) => panic!("expected a URL target"),
        }
    }

    #[test]
    fn test_bad_str_is_invalid_url() {
        let result = "not a url".into_target();
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_prepared_request_passes_through() {
        let request = reqwest::Request::new(
            http::Method::GET,
            Url::parse("https://example.com/ready").unwrap(),
        );
        let target = request.into_target().unwrap();
        assert!(matches!(target, Target::Prepared(_)));
    }
}
