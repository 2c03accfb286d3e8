use std::collections::HashMap;
use tracing::warn;
use url::Url;

/// Outcome of reading the query string out of an optional URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParameters {
    /// No URL was given (or it was empty).
    Absent,
    /// The URL parsed; one entry per key, last occurrence wins.
    Parsed(HashMap<String, String>),
    /// The input was not an absolute URL.
    Invalid { input: String, error: url::ParseError },
}

impl QueryParameters {
    /// Flatten to a map, treating absent and invalid input as empty.
    pub fn into_map(self) -> HashMap<String, String> {
        match self {
            QueryParameters::Parsed(params) => params,
            QueryParameters::Absent | QueryParameters::Invalid { .. } => HashMap::new(),
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, QueryParameters::Invalid { .. })
    }
}

pub fn parse_query_parameters(url: Option<&str>) -> QueryParameters {
    let Some(input) = url.filter(|s| !s.is_empty()) else {
        return QueryParameters::Absent;
    };

    match Url::parse(input) {
        Ok(parsed) => QueryParameters::Parsed(parsed.query_pairs().into_owned().collect()),
        Err(error) => QueryParameters::Invalid {
            input: input.to_string(),
            error,
        },
    }
}

/// Map of query parameters in `url`. Never fails: a malformed URL is
/// reported as a warning and yields an empty map.
pub fn extract_query_parameters(url: Option<&str>) -> HashMap<String, String> {
    let parsed = parse_query_parameters(url);

    if let QueryParameters::Invalid { input, error } = &parsed {
        warn!(url = %input, error = %error, "Invalid URL, ignoring query parameters");
    }

    parsed.into_map()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn extracts_simple_pairs() {
        let params = extract_query_parameters(Some("https://example.com/page?a=1&b=2"));
        assert_eq!(params, map(&[("a", "1"), ("b", "2")]));
    }

    #[test]
    fn absent_input_is_empty() {
        assert!(extract_query_parameters(None).is_empty());
        assert!(extract_query_parameters(Some("")).is_empty());
        assert_eq!(parse_query_parameters(None), QueryParameters::Absent);
        assert_eq!(parse_query_parameters(Some("")), QueryParameters::Absent);
    }

    #[test]
    fn malformed_url_is_empty() {
        assert!(extract_query_parameters(Some("::not a url::")).is_empty());
    }

    #[test]
    fn malformed_url_is_distinguishable() {
        let parsed = parse_query_parameters(Some("::not a url::"));
        assert!(parsed.is_invalid());

        // Relative references have no base to resolve against.
        assert!(parse_query_parameters(Some("/path?a=1")).is_invalid());
    }

    #[test]
    fn last_duplicate_wins() {
        let params = extract_query_parameters(Some("https://x/?a=1&a=2"));
        assert_eq!(params, map(&[("a", "2")]));
    }

    #[test]
    fn url_without_query_is_parsed_but_empty() {
        let parsed = parse_query_parameters(Some("https://example.com/"));
        assert_eq!(parsed, QueryParameters::Parsed(HashMap::new()));
    }

    #[test]
    fn decodes_percent_and_plus() {
        let params = extract_query_parameters(Some(
            "https://example.com/search?q=hello+world&tag=%23rust&empty=",
        ));
        assert_eq!(
            params,
            map(&[("q", "hello world"), ("tag", "#rust"), ("empty", "")])
        );
    }

    #[test]
    fn ignores_fragment() {
        let params = extract_query_parameters(Some("https://example.com/?page=3#top"));
        assert_eq!(params, map(&[("page", "3")]));
    }
}
