//! Rasoi POS API — library crate for the assistant REST server.
//!
//! Re-exports all modules so the binary (`main.rs`) and external crates
//! (e.g. `rasoi-e2e-tests`) can access internal types like `AppState` and
//! `build_router`.

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod state;
