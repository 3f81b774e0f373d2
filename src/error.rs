//! Error types for the pick'em stats pipeline.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PickemError>;

#[derive(Error, Debug)]
pub enum PickemError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse number: {0}")]
    ParseInt(#[from] std::num::ParseIntError),

    /// Every candidate upstream source failed for the requested period.
    /// Carries each attempted source identifier with its failure reason.
    #[error("no upstream source available for {period}:\n{}", .attempts.join("\n"))]
    SourceUnavailable {
        period: String,
        attempts: Vec<String>,
    },

    /// A fetched payload could not be parsed as the expected format.
    /// At the adapter level this downgrades to a failed candidate; it only
    /// surfaces directly when there is no next candidate to try.
    #[error("malformed {expected} payload from {url}: {message}")]
    MalformedPayload {
        url: String,
        expected: &'static str,
        message: String,
    },

    /// Backward probing exhausted its candidate space without finding a
    /// period with populated data. Distinct from `SourceUnavailable`: the
    /// sources answered, they just had nothing.
    #[error("no populated period found after probing {probed} candidate periods")]
    NoDataFound { probed: usize },

    #[error("invalid period: {0}")]
    InvalidPeriod(String),

    #[error("invalid position: {position}")]
    InvalidPosition { position: String },

    #[error("invalid scoring mode: {mode} (expected std, half, or ppr)")]
    InvalidMode { mode: String },

    #[error("invalid sport: {sport} (expected nfl or nba)")]
    InvalidSport { sport: String },

    #[error("cache error: {message}")]
    Cache { message: String },
}

impl PickemError {
    pub fn malformed(url: impl Into<String>, expected: &'static str, message: impl Into<String>) -> Self {
        PickemError::MalformedPayload {
            url: url.into(),
            expected,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_unavailable_lists_attempts() {
        let err = PickemError::SourceUnavailable {
            period: "2024 week 1".to_string(),
            attempts: vec![
                "- https://a.example/stats.csv.gz: 404 Not Found".to_string(),
                "- https://b.example/stats.csv: connection refused".to_string(),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("2024 week 1"));
        assert!(msg.contains("a.example"));
        assert!(msg.contains("b.example"));
    }

    #[test]
    fn no_data_found_is_distinct_from_source_unavailable() {
        let probe = PickemError::NoDataFound { probed: 54 };
        assert!(probe.to_string().contains("54"));
        assert!(!probe.to_string().contains("upstream"));
    }

    #[test]
    fn malformed_payload_names_url_and_format() {
        let err = PickemError::malformed("https://x.example/sb", "JSON", "expected value at line 1");
        assert!(err.to_string().contains("JSON"));
        assert!(err.to_string().contains("x.example"));
    }
}
