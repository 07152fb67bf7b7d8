//! Quantity change computation for absolute and relative updates.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Update type
// ---------------------------------------------------------------------------

/// How the caller expressed a quantity change.
///
/// Matches the `change_type` CHECK constraint on `resource_history`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    /// The caller supplies the resulting quantity (`quantity` field).
    #[default]
    Absolute,
    /// The caller supplies a signed delta (`value` field).
    Relative,
}

impl UpdateType {
    /// The value stored in `resource_history.change_type`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Relative => "relative",
        }
    }
}

// ---------------------------------------------------------------------------
// Computed change
// ---------------------------------------------------------------------------

/// Result of applying an update request to a resource's current quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantityChange {
    pub previous_quantity: i64,
    pub new_quantity: i64,
    pub change_amount: i64,
    pub update_type: UpdateType,
}

impl QuantityChange {
    /// `true` when the update leaves the quantity unchanged.
    pub fn is_noop(&self) -> bool {
        self.change_amount == 0
    }

    /// Absolute size of the change.
    pub fn magnitude(&self) -> u64 {
        self.change_amount.unsigned_abs()
    }
}

/// Compute the new quantity and signed change for an update.
///
/// - Absolute (the default): `new = requested_quantity`, `change = new - previous`.
/// - Relative: `change = relative_value`, `new = previous + change`.
///
/// Absolute mode ignores `relative_value` and relative mode ignores
/// `requested_quantity`. Fails with [`CoreError::InvalidUpdate`] when the
/// field for the chosen mode is missing, when the arithmetic overflows, or
/// when the result would be negative.
pub fn compute_change(
    previous_quantity: i64,
    requested_quantity: Option<i64>,
    update_type: Option<UpdateType>,
    relative_value: Option<i64>,
) -> Result<QuantityChange, CoreError> {
    let update_type = update_type.unwrap_or_default();

    let (new_quantity, change_amount) = match update_type {
        UpdateType::Absolute => {
            let new_quantity = requested_quantity.ok_or_else(|| {
                CoreError::InvalidUpdate("absolute update requires 'quantity'".into())
            })?;
            let change = new_quantity.checked_sub(previous_quantity).ok_or_else(|| {
                CoreError::InvalidUpdate("quantity change is out of range".into())
            })?;
            (new_quantity, change)
        }
        UpdateType::Relative => {
            let delta = relative_value.ok_or_else(|| {
                CoreError::InvalidUpdate("relative update requires 'value'".into())
            })?;
            let new_quantity = previous_quantity.checked_add(delta).ok_or_else(|| {
                CoreError::InvalidUpdate("resulting quantity is out of range".into())
            })?;
            (new_quantity, delta)
        }
    };

    if new_quantity < 0 {
        return Err(CoreError::InvalidUpdate(format!(
            "resulting quantity must not be negative, got {new_quantity}"
        )));
    }

    Ok(QuantityChange {
        previous_quantity,
        new_quantity,
        change_amount,
        update_type,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
