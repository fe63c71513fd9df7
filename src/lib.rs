//! Core library surface for the records terminal front-end.
//!
//! The binary wires these pieces together; tests drive the [`Controller`]
//! directly against a [`MemoryStore`] without touching a terminal.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod store;
pub mod ui;

pub use config::{Config, Timing};
pub use logging::init_logging;
pub use models::{Customer, Entity, FieldValue, FormData, Product, Record};
pub use store::{MemoryStore, SqliteStore, Store, StoreError};
pub use ui::{run_app, Controller, LogicalKey, Outcome, SessionState, View};
