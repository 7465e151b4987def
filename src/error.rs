//! Error types for cursor and position handling
//!
//! Looking a value up never fails: a missing value is reported as a cursor at the end.
//! Errors only come from handing the tree a position it cannot use, or from dereferencing a
//! cursor that sits on one of the two boundaries. None of them leave the tree in a different
//! state than before the call.

use thiserror::Error;

/// Errors returned when a cursor or position cannot be used for the requested operation
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The position is the end or the place before the first element, so there is no element to
    /// read or erase
    #[error("position does not refer to an element")]
    OutOfRange,

    /// The caller handed over a position that this tree cannot have produced or that no longer
    /// refers to a live element
    #[error("precondition violated: {0}")]
    PreconditionViolation(#[from] Violation),
}

/// The specific contract a position failed
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Violation {
    /// The position was default-constructed and was never bound to a tree
    #[error("position is not bound to any tree")]
    Detached,

    /// The position was produced by another tree (including a clone of this one)
    #[error("position belongs to a different tree")]
    ForeignTree,

    /// The element the position referred to has been erased, or the tree was cleared
    #[error("position refers to an element that was erased")]
    Stale,
}

/// A Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;
