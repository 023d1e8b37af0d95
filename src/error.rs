//! Rich diagnostic error types for flora-graph.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains. Queries themselves are
//! total; only startup loading and the external text-generation call can fail.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for flora-graph.
#[derive(Debug, Error, Diagnostic)]
pub enum FloraError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Generate(#[from] GenerateError),
}

// ---------------------------------------------------------------------------
// Load errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("failed to read {path}")]
    #[diagnostic(
        code(flora::load::io),
        help(
            "A startup data file could not be opened. Check that the path exists \
             and is readable, or point the config at the right file."
        )
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed fact file {path}: {message}")]
    #[diagnostic(
        code(flora::load::parse),
        help("The fact file must be valid Turtle. Check the reported line for syntax errors.")
    )]
    Parse { path: String, message: String },

    #[error("malformed name corpus {path}: {message}")]
    #[diagnostic(
        code(flora::load::corpus),
        help("The name corpus must be a CSV file with a header row.")
    )]
    Corpus { path: String, message: String },

    #[error("name corpus {path} has no \"{column}\" column")]
    #[diagnostic(
        code(flora::load::missing_column),
        help("Add a header row containing a `{column}` column to the CSV file.")
    )]
    MissingColumn { path: String, column: String },

    #[error("malformed taxonomy table {path}: {message}")]
    #[diagnostic(
        code(flora::load::taxonomy),
        help("The taxonomy table must be a JSON document.")
    )]
    Taxonomy { path: String, message: String },

    #[error("invalid configuration {path}: {message}")]
    #[diagnostic(
        code(flora::load::config),
        help("Check the TOML syntax and field names in the config file.")
    )]
    Config { path: String, message: String },

    #[error("failed to serialize configuration: {message}")]
    #[diagnostic(
        code(flora::load::config_serialize),
        help("Every configured path must be valid UTF-8 to be written as TOML.")
    )]
    ConfigSerialize { message: String },
}

// ---------------------------------------------------------------------------
// Text-generation errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GenerateError {
    #[error("text-generation request failed: {message}")]
    #[diagnostic(
        code(flora::generate::request_failed),
        help("Check network connectivity and the configured `generation.api_url`.")
    )]
    RequestFailed { message: String },

    #[error("text-generation service returned status {status}: {body}")]
    #[diagnostic(
        code(flora::generate::status),
        help("The service rejected the request. Verify the API key and model name.")
    )]
    Status { status: u16, body: String },

    #[error("failed to parse text-generation response: {message}")]
    #[diagnostic(
        code(flora::generate::parse_error),
        help("The service returned an unexpected response format.")
    )]
    ParseError { message: String },

    #[error("no API key configured for the text-generation service")]
    #[diagnostic(
        code(flora::generate::missing_api_key),
        help("Set the DEEPSEEK_API_KEY environment variable.")
    )]
    MissingApiKey,
}

/// Convenience alias for functions returning flora-graph results.
pub type FloraResult<T> = std::result::Result<T, FloraError>;

/// Result type for startup loading.
pub type LoadResult<T> = std::result::Result<T, LoadError>;
