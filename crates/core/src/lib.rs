//! Bookshelf core domain library.
//!
//! Shared identifier and timestamp types, the domain error type, and the
//! pure catalog rules (status vocabulary, field validation, upload filename
//! sanitization) used by the database and API crates. Nothing in here
//! performs I/O.

pub mod error;
pub mod filename;
pub mod status;
pub mod types;
pub mod validation;
