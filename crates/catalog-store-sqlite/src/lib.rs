//! SQLite backend for the course catalog.
//!
//! Each faculty, major and subject is one row holding a whole document;
//! child lists and string sets are JSON arrays, and membership updates are
//! single statements built on SQLite's JSON functions. Wraps
//! [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod encode;
mod faculties;
mod majors;
mod schema;
mod store;
mod subjects;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
