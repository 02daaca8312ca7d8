//! Export option handling.

use serde::{Deserialize, Serialize};

/// Knobs recognized by an export request.
///
/// The wire form uses the camelCase field names the in-page capture shim
/// sends, so a request produced on the page side deserializes directly. Every
/// field has a default so partial option objects are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOptions {
    /// Title heading for the metadata preamble; `None` suppresses it
    #[serde(default)]
    pub include_title: Option<String>,
    /// Emit the source URL / export time / separator preamble
    #[serde(default = "default_true")]
    pub include_meta: bool,
    /// Attach detected timestamps to message headers
    #[serde(default)]
    pub include_timestamps: bool,
    /// Render images as bracketed text links instead of image embeds
    #[serde(default)]
    pub collapse_images: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ConversionOptions {
    fn default() -> Self {
        ConversionOptions {
            include_title: None,
            include_meta: true,
            include_timestamps: false,
            collapse_images: false,
        }
    }
}
