//! ripple-core — Exam assembly engine, data model, and summary statistics.
//!
//! This crate defines the item bank and exam document model, the seeded
//! random stream every draw is derived from, and the pure operations that
//! build, repair, shuffle, and summarize an exam. Storage and catalog
//! transport are reached only through the traits in [`traits`].

pub mod assembler;
pub mod error;
pub mod export;
pub mod filter;
pub mod model;
pub mod prng;
pub mod restore;
pub mod session;
pub mod shuffle;
pub mod summary;
pub mod traits;
pub mod validate;
