//! Core data types for tagging saved posts.
//!
//! These types describe what goes into the orchestrator (a post's URL and
//! caption) and what comes out (tags, collection suggestion, mood, confidence).

use serde::{Deserialize, Serialize};

/// Tag used when a model's output could not be understood.
pub const FALLBACK_TAG: &str = "untagged";

/// Mood used when a model's output could not be understood.
pub const FALLBACK_MOOD: &str = "neutral";

/// Confidence reported for the decode fallback.
pub const FALLBACK_CONFIDENCE: f32 = 0.3;

/// The input for tagging one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Link to the post
    pub url: String,

    /// Caption text, if the post has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl AnalysisRequest {
    pub fn new(url: impl Into<String>, caption: Option<String>) -> Self {
        Self {
            url: url.into(),
            caption,
        }
    }
}

/// Structured tags produced for one post.
///
/// Field names follow the JSON the model is asked to emit, so a model reply
/// that is exactly a serialized `AnalysisResult` decodes back to the same value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// 4-6 lowercase, hyphenated tags
    pub tags: Vec<String>,

    /// Name of a collection the post would fit into
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_collection: Option<String>,

    /// Overall mood of the post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,

    /// Model's confidence in the tags, 0.0 to 1.0
    pub confidence: f32,
}

impl AnalysisResult {
    /// The low-confidence result substituted when model output can't be parsed.
    pub fn fallback() -> Self {
        Self {
            tags: vec![FALLBACK_TAG.to_string()],
            suggested_collection: None,
            mood: Some(FALLBACK_MOOD.to_string()),
            confidence: FALLBACK_CONFIDENCE,
        }
    }

    /// Whether this is the decode fallback rather than a real model answer.
    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}

/// One entry of a batch: a caller-side identifier plus the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchItem {
    /// Caller's identifier for the post (used when applying results)
    pub id: String,

    #[serde(flatten)]
    pub request: AnalysisRequest,
}

impl BatchItem {
    pub fn new(id: impl Into<String>, url: impl Into<String>, caption: Option<String>) -> Self {
        Self {
            id: id.into(),
            request: AnalysisRequest::new(url, caption),
        }
    }
}
