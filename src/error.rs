//! Structured error types for the scrawl renderer.
//!
//! Only unreadable input and unparseable configuration ever reach the
//! caller. Font and image failures are produced here too, but the renderer
//! and page compiler absorb them with a logged fallback.

use std::path::PathBuf;

use thiserror::Error;

/// The unified error type returned by all public scrawl API functions.
#[derive(Debug, Error)]
pub enum ScrawlError {
    /// The input document could not be read. Fatal for the whole run.
    #[error("failed to read input '{}': {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration JSON failed to parse.
    #[error("failed to parse config: {source}{}", format_hint(hint))]
    Config {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// Reading a config file or writing the output failed.
    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A font could not be loaded, parsed, or embedded.
    #[error("font error: {0}")]
    Font(String),

    /// A background image could not be decoded.
    #[error("image error: {0}")]
    Image(String),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for ScrawlError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the config schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => "Unexpected end of input, is the file truncated?".to_string(),
            serde_json::error::Category::Io => String::new(),
        };
        ScrawlError::Config { source: e, hint }
    }
}
