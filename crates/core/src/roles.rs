//! Well-known role name constants.
//!
//! These are the values carried in the `role` claim of access tokens issued
//! by the identity provider.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_CONTRIBUTOR: &str = "contributor";
pub const ROLE_VIEWER: &str = "viewer";
