//! Core types, store traits and the relationship coordinator for the course
//! catalog.
//!
//! The catalog is a three-level hierarchy (faculty → major → subject) stored
//! as independent documents that reference their children only through
//! embedded identifier lists. This crate is deliberately free of HTTP and
//! database dependencies; backends implement the traits in [`store`] and the
//! [`Coordinator`] keeps the parent lists in step with the children.

pub mod consistency;
pub mod coordinator;
pub mod error;
pub mod faculty;
pub mod id;
pub mod major;
pub mod patch;
pub mod store;
pub mod subject;

pub use coordinator::Coordinator;
pub use error::{EntityKind, Error, Result};
pub use id::ObjectId;
