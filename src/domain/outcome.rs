//! Results of async sub-operations that may have failed or never run.
//!
//! An outcome is either settled (`fulfilled` / `rejected`) or absent. Absence is modelled
//! with `Option` rather than a third variant, since callers must always tolerate it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rendered in place of any value that is not available.
pub const UNAVAILABLE: &str = "??";

/// A settled async result, in the `{status, value | reason}` wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Settled<T> {
    Fulfilled { value: T },
    Rejected { reason: String },
}

/// A settled result, or `None` when the operation never ran or is still pending.
pub type SettledOutcome<T> = Option<Settled<T>>;

impl<T> Settled<T> {
    pub fn fulfilled(value: T) -> Self {
        Settled::Fulfilled { value }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Settled::Rejected {
            reason: reason.into(),
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Settled::Fulfilled { value } => Some(value),
            Settled::Rejected { .. } => None,
        }
    }
}

/// Value read through a possibly-unavailable outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection<U> {
    Available(U),
    Unavailable,
}

impl<U> Projection<U> {
    pub fn is_available(&self) -> bool {
        matches!(self, Projection::Available(_))
    }

    pub fn into_option(self) -> Option<U> {
        match self {
            Projection::Available(value) => Some(value),
            Projection::Unavailable => None,
        }
    }
}

impl<U> From<Option<U>> for Projection<U> {
    fn from(value: Option<U>) -> Self {
        match value {
            Some(v) => Projection::Available(v),
            None => Projection::Unavailable,
        }
    }
}

impl<U: fmt::Display> fmt::Display for Projection<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Projection::Available(value) => value.fmt(f),
            Projection::Unavailable => f.write_str(UNAVAILABLE),
        }
    }
}

/// Map the fulfilled value, or yield `Unavailable` for rejected and absent outcomes.
///
/// `map` is only invoked for fulfilled outcomes.
pub fn project<T, U>(outcome: Option<&Settled<T>>, map: impl FnOnce(&T) -> U) -> Projection<U> {
    match outcome {
        Some(Settled::Fulfilled { value }) => Projection::Available(map(value)),
        Some(Settled::Rejected { .. }) | None => Projection::Unavailable,
    }
}

/// Like [`project`], for mappings that can fail. The mapping's error is returned as is.
pub fn try_project<T, U, E>(
    outcome: Option<&Settled<T>>,
    map: impl FnOnce(&T) -> Result<U, E>,
) -> Result<Projection<U>, E> {
    match outcome {
        Some(Settled::Fulfilled { value }) => map(value).map(Projection::Available),
        Some(Settled::Rejected { .. }) | None => Ok(Projection::Unavailable),
    }
}
