//! Access-token primitives.
//!
//! Tokens are issued by the external identity provider; this service only
//! needs to validate them and read the actor id and role.

pub mod jwt;
