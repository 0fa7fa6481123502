//! Error types shared across the crate.

/// Everything that can go wrong while configuring or feeding the engine.
///
/// All variants are fatal: the engine never retries or degrades, a bad
/// configuration or a degenerate encoding request aborts the operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MotifError {
    #[error("symbol '{symbol}' is not valid in the {encoding} encoding")]
    BadSymbol { encoding: &'static str, symbol: char },

    #[error("oligomer length {k} exceeds the dense limit of {limit} bases")]
    KmerTooLong { k: usize, limit: usize },

    #[error("pattern length {found} does not match the established length {expected}")]
    PatternSizeMismatch { expected: usize, found: usize },

    #[error("invalid spacer range {min}..{max}")]
    BadSpacerRange { min: i64, max: i64 },

    #[error("window holds {accumulated} consecutive bases, {requested} requested")]
    NotReady { accumulated: usize, requested: usize },

    #[error("'{symbol}' is degenerate and has no compact encoding")]
    DegenerateEncoding { symbol: char },

    #[error("unknown test alternative \"{0}\" (expected \"less\", \"greater\" or \"two.sided\")")]
    UnknownAlternative(String),
}

pub type Result<T> = std::result::Result<T, MotifError>;
