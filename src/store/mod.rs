//! Account store implementations
//!
//! # Components
//!
//! - `memory` - Thread-safe in-memory store with optimistic versioning
//! - `csv_file` - CSV file persistence layered over the in-memory store

pub mod csv_file;
pub mod memory;

pub use csv_file::{AccountRow, CsvFileStore};
pub use memory::InMemoryStore;
