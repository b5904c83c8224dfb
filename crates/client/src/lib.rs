//! `netenergy-client` library crate.
//!
//! Fetches dashboard records from the analytics API and turns them into
//! view models with `netenergy_core`. The binary entrypoint lives in
//! `main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod snapshot;
pub mod token;
