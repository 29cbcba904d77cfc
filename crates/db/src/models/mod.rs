//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` + `Serialize` structs matching the rows the repositories return
//! - plain input structs carrying already-validated fields for writes
//!
//! Serialized field names follow the browser client's vocabulary
//! (`book_name`, `author_name`, `book_category`).

pub mod author;
pub mod book;
pub mod category;
