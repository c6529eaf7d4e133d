use thiserror::Error;

/// Errors raised when an ArchSpec fails its invariants, on load or on any
/// attempt to construct/replace one.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidSpec {
    #[error("component id {0:?} is not IaC-safe (must match ^[A-Za-z_][A-Za-z0-9_-]*$)")]
    BadComponentId(String),

    #[error("duplicate component id {0:?}")]
    DuplicateComponentId(String),

    #[error("connection references unknown component {0:?}")]
    DanglingConnection(String),

    #[error("boundary id {0:?} is not IaC-safe")]
    BadBoundaryId(String),

    #[error("boundary {0:?} has parent {1:?} which does not exist")]
    DanglingBoundaryParent(String, String),

    #[error("component {0:?} has tier {1}, must be 0..=4")]
    BadTier(String, i64),
}

pub type Result<T> = std::result::Result<T, InvalidSpec>;
