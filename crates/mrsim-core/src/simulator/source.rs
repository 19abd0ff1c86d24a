use crate::domain::{MrsimError, MrsimResult, json_type_name};
use serde_json::Value;
use std::fmt::{Display, Formatter};
use std::fs;
use std::path::PathBuf;

pub const ISOTOPOMERS_KEY: &str = "isotopomers";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    Local(PathBuf),
    Remote(String),
}

impl SourceLocation {
    /// `file://` URLs and scheme-less strings are local paths.
    pub fn parse(source: &str) -> Self {
        let trimmed = source.trim();
        if let Some(path) = trimmed.strip_prefix("file://") {
            return Self::Local(PathBuf::from(path));
        }
        match trimmed.split_once("://") {
            Some((scheme, _)) if is_url_scheme(scheme) => Self::Remote(trimmed.to_string()),
            _ => Self::Local(PathBuf::from(trimmed)),
        }
    }

    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Local(path) => write!(f, "{}", path.display()),
            Self::Remote(url) => f.write_str(url),
        }
    }
}

fn is_url_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Retrieves the raw bytes behind a source location.
pub trait SourceFetcher {
    fn fetch(&self, location: &SourceLocation) -> MrsimResult<Vec<u8>>;
}

/// Reads local files from disk and, with the `remote` feature, fetches URLs
/// with a single blocking request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFetcher;

impl SourceFetcher for DefaultFetcher {
    fn fetch(&self, location: &SourceLocation) -> MrsimResult<Vec<u8>> {
        match location {
            SourceLocation::Local(path) => fs::read(path)
                .map_err(|source| MrsimError::source_not_found(location.to_string(), source)),
            SourceLocation::Remote(url) => fetch_remote(url),
        }
    }
}

#[cfg(feature = "remote")]
fn fetch_remote(url: &str) -> MrsimResult<Vec<u8>> {
    use std::io::Read;

    let response = ureq::get(url)
        .call()
        .map_err(|source| MrsimError::source_not_found(url, source))?;
    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|source| MrsimError::source_not_found(url, source))?;
    Ok(bytes)
}

#[cfg(not(feature = "remote"))]
fn fetch_remote(url: &str) -> MrsimResult<Vec<u8>> {
    Err(MrsimError::source_not_found(
        url,
        "remote sources are not supported without the `remote` feature",
    ))
}

pub fn import_json(bytes: &[u8], location: &SourceLocation) -> MrsimResult<Value> {
    serde_json::from_slice(bytes).map_err(|source| MrsimError::MalformedJson {
        location: location.to_string(),
        reason: source.to_string(),
    })
}

/// Takes the `isotopomers` entry out of a parsed document.
pub fn extract_isotopomers(document: Value, location: &SourceLocation) -> MrsimResult<Value> {
    match document {
        Value::Object(mut root) => root
            .remove(ISOTOPOMERS_KEY)
            .ok_or_else(|| MrsimError::schema(ISOTOPOMERS_KEY, location.to_string())),
        other => Err(MrsimError::schema(
            ISOTOPOMERS_KEY,
            format!("{location} (document root is {})", json_type_name(&other)),
        )),
    }
}

pub fn read_isotopomers(
    location: &SourceLocation,
    fetcher: &dyn SourceFetcher,
) -> MrsimResult<Value> {
    let bytes = fetcher.fetch(location)?;
    extract_isotopomers(import_json(&bytes, location)?, location)
}

#[cfg(test)]
mod tests {
    use super::{SourceLocation, extract_isotopomers, import_json};
    use crate::domain::MrsimError;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn locations_with_a_scheme_are_remote() {
        assert_eq!(
            SourceLocation::parse("https://example.org/isotopomers.json"),
            SourceLocation::Remote("https://example.org/isotopomers.json".to_string())
        );
        assert_eq!(
            SourceLocation::parse("file:///tmp/sample.json"),
            SourceLocation::Local(PathBuf::from("/tmp/sample.json"))
        );
        assert_eq!(
            SourceLocation::parse("data/sample.json"),
            SourceLocation::Local(PathBuf::from("data/sample.json"))
        );
        assert!(!SourceLocation::parse("1x://odd").is_remote());
    }

    #[test]
    fn parse_failures_are_malformed_json() {
        let location = SourceLocation::parse("inline.json");
        let error = import_json(b"{ \"isotopomers\": [", &location).expect_err("truncated");
        assert!(matches!(
            error,
            MrsimError::MalformedJson { ref location, .. } if location == "inline.json"
        ));
    }

    #[test]
    fn missing_isotopomers_key_is_a_schema_error() {
        let location = SourceLocation::parse("inline.json");
        let error = extract_isotopomers(json!({ "sites": [] }), &location).expect_err("no key");
        assert_eq!(error, MrsimError::schema("isotopomers", "inline.json"));

        let error = extract_isotopomers(json!([1, 2]), &location).expect_err("root is an array");
        assert!(matches!(error, MrsimError::Schema { .. }));

        let value = extract_isotopomers(json!({ "isotopomers": [] }), &location).expect("present");
        assert_eq!(value, json!([]));
    }
}
