use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdIndexError {
    /// A read-only lookup found no key comparing equal on every axis.
    ///
    /// Only `find`-style access reports this; `erase` reports a zero count
    /// instead, and upsert-style access inserts instead.
    #[error("Key not found")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, KdIndexError>;
