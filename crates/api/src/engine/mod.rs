//! Transactional resource operations.
//!
//! Handlers translate HTTP into calls on [`resource_update::ResourceUpdateTransaction`];
//! everything that must commit or roll back as a unit lives here.

pub mod resource_update;
