//! JSON bodies exchanged with the remote calendar endpoint.

use serde::{Deserialize, Serialize};

/// Body returned by a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    /// Whether the remote could read the calendar.
    pub success: bool,
    /// The calendar document; empty when none exists yet.
    #[serde(default)]
    pub content: String,
    /// Revision token of the returned document.
    #[serde(default)]
    pub sha: Option<String>,
}

/// Body sent with a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    /// The regenerated calendar document.
    pub content: String,
    /// Revision token the document was based on.
    pub sha: String,
    /// Message recorded with the new revision.
    pub message: String,
}

/// Body returned by a save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    /// Whether the new revision was stored.
    pub success: bool,
    /// Revision token of the stored document.
    #[serde(default)]
    pub sha: Option<String>,
}
