//! ORGDIR Engine — assignment & membership consistency rules.
//!
//! The engine binds people to organizational units and derives
//! effective access rights. It owns the cross-entity invariants a
//! plain CRUD layer does not enforce: department/position scope
//! agreement, team capacity and eligibility, lead protection, cycle
//! rejection in the department tree, and per-item bulk outcomes.
//!
//! Everything here is generic over the `orgdir-core` repository
//! traits; the engine never talks to a store directly.

pub mod assignment;
pub mod config;
pub mod error;
pub mod membership;
pub mod permissions;
pub mod validator;

pub use assignment::{AssignmentService, BulkAssignInput, BulkAssignReport, BulkOutcome};
pub use config::EngineConfig;
pub use error::EngineError;
pub use membership::MembershipService;
pub use permissions::{
    Action, ActionFlags, DocumentAccess, ModuleAccess, PermissionService, effective_permissions,
    parse_permission,
};
