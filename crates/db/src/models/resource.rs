//! Resource entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tally_core::resource_status::{classify, StatusTier};
use tally_core::types::{DbId, Timestamp};
use validator::Validate;

/// A row from the `resources` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: DbId,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub quantity: i64,
    pub target_quantity: Option<i64>,
    pub multiplier: f64,
    pub last_updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Resource {
    /// Current status tier derived from quantity and target.
    pub fn status(&self) -> StatusTier {
        classify(self.quantity, self.target_quantity)
    }

    /// Attach the derived status for serialization.
    pub fn into_view(self) -> ResourceView {
        let status = self.status();
        ResourceView {
            resource: self,
            status,
        }
    }
}

/// A resource as returned to callers: the stored row plus its derived status.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceView {
    #[serde(flatten)]
    pub resource: Resource,
    pub status: StatusTier,
}

/// DTO for creating a new resource.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateResource {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// Defaults to the empty category if omitted.
    pub category: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Defaults to 0 if omitted.
    #[validate(range(min = 0))]
    pub quantity: Option<i64>,
    #[validate(range(min = 0))]
    pub target_quantity: Option<i64>,
    /// Defaults to 1.0 if omitted.
    #[validate(range(exclusive_min = 0.0))]
    pub multiplier: Option<f64>,
}

/// Query parameters for listing resources.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResourceListQuery {
    pub category: Option<String>,
}
