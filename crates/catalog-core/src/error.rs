//! Error types for `catalog-core`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::id::ObjectId;

/// Which tier of the hierarchy an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
  Faculty,
  Major,
  Subject,
}

impl fmt::Display for EntityKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Faculty => "faculty",
      Self::Major => "major",
      Self::Subject => "subject",
    })
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// A caller-supplied identifier is not 24 hex characters.
  #[error("invalid identifier: {0:?}")]
  InvalidIdentifier(String),

  /// A primary-key lookup or update matched no document.
  #[error("{kind} not found: {id}")]
  NotFound { kind: EntityKind, id: ObjectId },

  /// A membership-filtered update or search matched no parent document.
  /// `kind` is the parent collection that was searched.
  #[error("no {kind} lists {member}")]
  NoMatch { kind: EntityKind, member: ObjectId },

  /// Transport, timeout or decoding failure reported by the backend.
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
