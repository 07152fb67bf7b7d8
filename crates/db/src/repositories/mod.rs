//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async operations that
//! accept `&PgPool` as the first argument. Operations that must run inside a
//! caller-owned transaction take `&mut sqlx::Transaction<'_, Postgres>`
//! instead.

pub mod points_repo;
pub mod resource_history_repo;
pub mod resource_repo;

pub use points_repo::PointsRepo;
pub use resource_history_repo::ResourceHistoryRepo;
pub use resource_repo::ResourceRepo;
