use thiserror::Error;

/// Errors raised while building domain values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Result type alias for domain value construction
pub type TypeResult<T> = Result<T, TypeError>;
