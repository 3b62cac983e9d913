//! Rewriting the `sources` field of inline source maps.
//!
//! Compiled output may end with an inline source map comment. The paths the
//! compile service puts into its `sources` field are relative to wherever it
//! thought the output lived; the host replaces them with the source file's
//! path relative to a configured base directory.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Prefix of an inline source map comment, up to the optional parameters.
const INLINE_MAP_PREFIX: &str = "//# sourceMappingURL=data:application/json;";

/// Errors raised while rewriting an inline source map.
#[derive(Debug, thiserror::Error)]
pub enum SourceMapError {
    /// The output carries no inline base64 source map comment.
    #[error("no inline source map comment found")]
    MissingComment,

    /// The comment payload is not valid base64.
    #[error("invalid base64 in inline source map: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The decoded payload is not valid JSON.
    #[error("invalid source map JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The decoded payload is JSON but not an object.
    #[error("source map is not a JSON object")]
    NotAnObject,
}

/// Replaces the `sources` field of the source map embedded in compiled output.
pub trait SourceMapRewriter {
    /// Returns `output` with its source map's `sources` set to `[source]`.
    ///
    /// `source` is relative to the configured base directory.
    fn rewrite_sources(&self, output: &str, source: &Path) -> Result<String, SourceMapError>;
}

/// Rewrites `//# sourceMappingURL=data:application/json;base64,...` comments.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineSourceMapRewriter;

impl SourceMapRewriter for InlineSourceMapRewriter {
    fn rewrite_sources(&self, output: &str, source: &Path) -> Result<String, SourceMapError> {
        let start = output
            .rfind(INLINE_MAP_PREFIX)
            .ok_or(SourceMapError::MissingComment)?;
        let params_start = start + INLINE_MAP_PREFIX.len();
        let params_end = output[params_start..]
            .find(['\r', '\n'])
            .map_or(output.len(), |i| params_start + i);

        let (_, payload) = output[params_start..params_end]
            .split_once("base64,")
            .ok_or(SourceMapError::MissingComment)?;
        let decoded = STANDARD.decode(payload.trim())?;

        let mut map: serde_json::Value = serde_json::from_slice(&decoded)?;
        let fields = map.as_object_mut().ok_or(SourceMapError::NotAnObject)?;
        let source = source.to_string_lossy().replace('\\', "/");
        fields.insert("sources".to_string(), serde_json::json!([source]));

        let encoded = STANDARD.encode(serde_json::to_vec(&map)?);
        Ok(format!(
            "{}{INLINE_MAP_PREFIX}charset=utf-8;base64,{encoded}{}",
            &output[..start],
            &output[params_end..]
        ))
    }
}
