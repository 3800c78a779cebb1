//! ripple-store — Durable exam storage.
//!
//! Implements the `ExamStore` trait on a single-file SQLite database. All
//! database work runs on the blocking thread pool.

pub mod sqlite;

pub use sqlite::SqliteExamStore;
