//! Decoder configuration.

/// Which `Stream_Type` governs the conditional transport-stream settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamTypeScope {
    /// The last `Stream_Type` in the block applies, wherever it appears.
    #[default]
    WholeBlock,
    /// Only a `Stream_Type` written above the conditional key applies.
    ///
    /// This is how DGIndex-era readers behaved.
    Preceding,
}

/// Options accepted by the `*_with` parse entry points.
#[derive(Debug, Clone, Default)]
pub struct DecodeOptions {
    pub stream_type_scope: StreamTypeScope,
    /// Fail when the footer line is missing instead of using an empty `data_type`.
    pub require_footer: bool,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stream_type_scope(mut self, scope: StreamTypeScope) -> Self {
        self.stream_type_scope = scope;
        self
    }

    pub fn with_require_footer(mut self, require: bool) -> Self {
        self.require_footer = require;
        self
    }
}
