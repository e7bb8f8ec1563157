//! Domain models for ORGDIR.
//!
//! These are read-model snapshots of what the directory store holds.
//! The engine validates and derives over them; the store owns
//! persistence.

pub mod department;
pub mod membership;
pub mod position;
pub mod role;
pub mod team;
pub mod user;
