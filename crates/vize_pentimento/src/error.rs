//! Error types for vize_pentimento.

use thiserror::Error;

/// Errors that abort a conversion. No partial output is produced for any of them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// Neither a default-exported options expression nor a class declaration
    /// was found in the script
    #[error("no convert target: expected `export default {{ ... }}` or a class component")]
    NoConvertTarget,

    /// The idiom was recognized but a required structural piece is missing
    #[error("invalid options: {0}")]
    InvalidOptions(String),

    /// The parser gave up on the script before producing a tree
    #[error("unparseable script: parser gave up ({lang})")]
    Unparseable { lang: &'static str },
}

/// Errors raised by the optional formatting pass.
///
/// These never abort a conversion; see [`crate::Diagnostic::FormattingFailed`].
#[derive(Debug, Error)]
pub enum FormatError {
    /// The generated script could not be re-parsed
    #[error("Failed to parse script: {0}")]
    ScriptParseError(String),

    /// The parser gave up on the generated script
    #[error("Failed to format script: parser panicked")]
    ParserPanicked,
}
