// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Settings shared by every document in a run.

/// Fence tag recognised when no other is configured.
pub const DEFAULT_FENCE_LANGUAGE: &str = "python";

#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Tag after the opening fence, as in ```` ```python ````.
    pub fence_language: String,
    /// Source run on each fresh interpreter before the first block.
    pub prelude: Option<String>,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            fence_language: DEFAULT_FENCE_LANGUAGE.to_string(),
            prelude: None,
        }
    }
}

impl CheckConfig {
    pub fn with_fence_language(mut self, language: impl Into<String>) -> Self {
        self.fence_language = language.into();
        self
    }

    pub fn with_prelude(mut self, prelude: impl Into<String>) -> Self {
        self.prelude = Some(prelude.into());
        self
    }
}
