//! GeoDash Store - credential and facility persistence.
//!
//! Ports plus two backends: an in-memory store for development and tests,
//! and the SQLite store both portals run against.

pub mod auth;
pub mod memory;
pub mod ports;
pub mod sqlite;

pub use memory::{MemoryFacilityStore, MemoryUserStore};
pub use ports::{FacilityStore, UserStore};
pub use sqlite::SqliteStore;
