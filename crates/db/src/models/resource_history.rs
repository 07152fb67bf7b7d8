//! Resource history models and DTOs.
//!
//! History rows are immutable once created (no `updated_at`). They are only
//! ever removed together with their resource.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::quantity_change::QuantityChange;
use tally_core::types::{DbId, Timestamp};

/// A row from the `resource_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceHistory {
    pub id: DbId,
    pub resource_id: DbId,
    pub previous_quantity: i64,
    pub new_quantity: i64,
    pub change_amount: i64,
    pub change_type: String,
    pub updated_by: DbId,
    pub reason: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for appending a history record.
#[derive(Debug, Clone)]
pub struct CreateResourceHistory {
    pub resource_id: DbId,
    pub previous_quantity: i64,
    pub new_quantity: i64,
    pub change_amount: i64,
    pub change_type: &'static str,
    pub updated_by: DbId,
    pub reason: Option<String>,
}

impl CreateResourceHistory {
    /// Build the record for a computed quantity change.
    pub fn from_change(
        resource_id: DbId,
        change: &QuantityChange,
        updated_by: DbId,
        reason: Option<String>,
    ) -> Self {
        Self {
            resource_id,
            previous_quantity: change.previous_quantity,
            new_quantity: change.new_quantity,
            change_amount: change.change_amount,
            change_type: change.update_type.as_str(),
            updated_by,
            reason,
        }
    }
}

/// Pagination for history listings (newest first).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
