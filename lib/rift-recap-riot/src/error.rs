use thiserror::Error;

/// Longest body snippet carried on a schema error.
const SNIPPET_LEN: usize = 256;

#[derive(Debug, Error)]
pub enum Error {
    /// Upstream answered with a non-success status. The body is kept
    /// verbatim; Riot puts the useful detail there.
    #[error("Riot API error {status}: {body}")]
    Upstream { status: u16, body: String },
    /// Upstream answered 2xx but the body does not have the expected
    /// shape. Carries a bounded snippet of the offending body.
    #[error("Riot API schema error: {reason} (body: {body})")]
    Schema { reason: String, body: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl Error {
    /// Build a schema error, truncating the body to a diagnostic snippet.
    pub fn schema(reason: impl Into<String>, body: &str) -> Self {
        Self::Schema {
            reason: reason.into(),
            body: body.chars().take(SNIPPET_LEN).collect(),
        }
    }
}

#[derive(Debug, Error)]
#[error("regionGroup must be EUROPE, AMERICAS, or ASIA")]
pub struct InvalidRegionGroup;
