//! SurrealDB repository implementations.

mod department;
mod position;
mod role;
mod team;
mod user;

pub use department::SurrealDepartmentRepository;
pub use position::SurrealPositionRepository;
pub use role::SurrealRoleRepository;
pub use team::SurrealTeamRepository;
pub use user::SurrealUserRepository;
