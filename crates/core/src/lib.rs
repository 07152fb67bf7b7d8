//! Domain logic for the tally inventory service.
//!
//! Everything in this crate is pure: no database, no HTTP, no clocks. The
//! `db` and `api` crates feed it values and persist what it returns.

pub mod error;
pub mod pagination;
pub mod permissions;
pub mod quantity_change;
pub mod resource_status;
pub mod resource_update;
pub mod roles;
pub mod scoring;
pub mod types;
