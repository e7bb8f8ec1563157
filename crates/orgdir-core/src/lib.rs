//! ORGDIR Core — domain models, error taxonomy, and repository ports.
//!
//! This crate holds the types shared across the workspace. It performs
//! no I/O of its own: the engine crate consumes these models through
//! the repository traits, and the database crate implements them.

pub mod error;
pub mod models;
pub mod repository;

pub use error::{OrgdirError, OrgdirResult};
