//! Actor identity and permission predicates.
//!
//! Every mutating operation receives an explicit [`Actor`]; nothing in the
//! update path looks up session state on its own.

use serde::Serialize;

use crate::error::CoreError;
use crate::resource_update::UpdatePath;
use crate::roles::{ROLE_ADMIN, ROLE_CONTRIBUTOR, ROLE_EDITOR};
use crate::types::DbId;

/// A single capability checked before an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    EditQuantity,
    EditTarget,
    Administer,
}

impl Permission {
    fn label(self) -> &'static str {
        match self {
            Self::EditQuantity => "edit quantities",
            Self::EditTarget => "edit targets",
            Self::Administer => "administer resources",
        }
    }
}

/// The permission set granted to an actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub can_edit_quantity: bool,
    pub can_edit_target: bool,
    pub can_administer: bool,
}

impl Permissions {
    /// Map a role name to its permission set. Unknown roles get nothing.
    pub fn for_role(role: &str) -> Self {
        match role {
            ROLE_ADMIN => Self {
                can_edit_quantity: true,
                can_edit_target: true,
                can_administer: true,
            },
            ROLE_EDITOR => Self {
                can_edit_quantity: true,
                can_edit_target: true,
                can_administer: false,
            },
            ROLE_CONTRIBUTOR => Self {
                can_edit_quantity: true,
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    pub fn allows(&self, permission: Permission) -> bool {
        match permission {
            Permission::EditQuantity => self.can_edit_quantity,
            Permission::EditTarget => self.can_edit_target,
            Permission::Administer => self.can_administer,
        }
    }

    /// Return `CoreError::Forbidden` unless `permission` is granted.
    pub fn require(&self, permission: Permission) -> Result<(), CoreError> {
        if self.allows(permission) {
            Ok(())
        } else {
            Err(CoreError::Forbidden(format!(
                "Not permitted to {}",
                permission.label()
            )))
        }
    }
}

/// The caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub permissions: Permissions,
}

impl Actor {
    pub fn new(user_id: DbId, role: &str) -> Self {
        Self {
            user_id,
            permissions: Permissions::for_role(role),
        }
    }
}

/// The permission an update needs.
///
/// Quantity changes need `EditQuantity`. Metadata patches need `Administer`
/// when they touch catalog fields and `EditTarget` when they only change
/// the target or multiplier.
pub fn required_for_update(path: &UpdatePath) -> Permission {
    match path {
        UpdatePath::Quantity(_) => Permission::EditQuantity,
        UpdatePath::Metadata(patch) if patch.touches_catalog() => Permission::Administer,
        UpdatePath::Metadata(_) => Permission::EditTarget,
    }
}
