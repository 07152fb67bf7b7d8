//! Resource update requests and their quantity/metadata dispatch.
//!
//! A single `PUT /resources/{id}` body can either change the quantity (which
//! is audited and scored) or patch descriptive fields (which is neither).
//! Field presence is modelled explicitly: nullable columns use
//! `Option<Option<T>>`, where the outer `Option` records whether the caller
//! sent the key at all and the inner one carries the value or an explicit
//! `null`. Non-nullable metadata fields are read the same way so that an
//! explicit `null` can be rejected instead of silently dropped.

use serde::{Deserialize, Deserializer};

use crate::error::CoreError;
use crate::quantity_change::UpdateType;

// ---------------------------------------------------------------------------
// Request body
// ---------------------------------------------------------------------------

/// Raw update request as received from a caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceUpdate {
    // Quantity path.
    pub quantity: Option<i64>,
    pub update_type: Option<UpdateType>,
    pub value: Option<i64>,
    pub reason: Option<String>,

    // Metadata path.
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub image_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub target_quantity: Option<Option<i64>>,
    #[serde(default, deserialize_with = "present")]
    pub multiplier: Option<Option<f64>>,
}

/// Maps a key that is present (even as `null`) to `Some(..)`.
///
/// Combined with `#[serde(default)]`, an absent key stays `None`.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Quantity-change half of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantityUpdate {
    pub quantity: Option<i64>,
    pub update_type: Option<UpdateType>,
    pub value: Option<i64>,
    pub reason: Option<String>,
}

/// Metadata half of a request. Only fields that were sent are `Some`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<Option<String>>,
    pub image_url: Option<Option<String>>,
    pub target_quantity: Option<Option<i64>>,
    pub multiplier: Option<f64>,
}

/// Which branch of the update transaction a request takes.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePath {
    Quantity(QuantityUpdate),
    Metadata(MetadataPatch),
}

impl ResourceUpdate {
    /// `true` if the body carries any quantity-change field.
    pub fn has_quantity_fields(&self) -> bool {
        self.quantity.is_some() || self.update_type.is_some() || self.value.is_some()
    }

    /// Names of the metadata fields present in the body.
    pub fn metadata_fields(&self) -> Vec<&'static str> {
        [
            ("name", self.name.is_some()),
            ("category", self.category.is_some()),
            ("description", self.description.is_some()),
            ("imageUrl", self.image_url.is_some()),
            ("targetQuantity", self.target_quantity.is_some()),
            ("multiplier", self.multiplier.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, set)| set.then_some(field))
        .collect()
    }

    /// Split the request into the branch it dispatches to.
    ///
    /// Any quantity field selects the quantity path; metadata fields sent
    /// alongside are not applied. Otherwise the metadata patch is validated
    /// and must contain at least one field.
    pub fn into_path(self) -> Result<UpdatePath, CoreError> {
        if self.has_quantity_fields() {
            return Ok(UpdatePath::Quantity(QuantityUpdate {
                quantity: self.quantity,
                update_type: self.update_type,
                value: self.value,
                reason: self.reason,
            }));
        }

        let patch = MetadataPatch {
            name: non_null("name", self.name)?,
            category: non_null("category", self.category)?,
            description: self.description,
            image_url: self.image_url,
            target_quantity: self.target_quantity,
            multiplier: non_null("multiplier", self.multiplier)?,
        };
        if patch.is_empty() {
            return Err(CoreError::InvalidUpdate(
                "request contains neither a quantity change nor any metadata field".into(),
            ));
        }
        patch.validate()?;
        Ok(UpdatePath::Metadata(patch))
    }
}

/// Unwrap a field that may be omitted but never cleared.
fn non_null<T>(field: &str, value: Option<Option<T>>) -> Result<Option<T>, CoreError> {
    match value {
        Some(None) => Err(CoreError::InvalidUpdate(format!(
            "'{field}' cannot be null"
        ))),
        Some(Some(v)) => Ok(Some(v)),
        None => Ok(None),
    }
}

impl MetadataPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
            && self.target_quantity.is_none()
            && self.multiplier.is_none()
    }

    /// `true` if the patch changes catalog fields (as opposed to only the
    /// target and multiplier).
    pub fn touches_catalog(&self) -> bool {
        self.name.is_some()
            || self.category.is_some()
            || self.description.is_some()
            || self.image_url.is_some()
    }

    /// Reject values that cannot be stored.
    ///
    /// Empty strings are legal for every text field except `name`.
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(CoreError::InvalidUpdate("name must not be empty".into()));
            }
        }
        if let Some(m) = self.multiplier {
            if !m.is_finite() || m <= 0.0 {
                return Err(CoreError::InvalidUpdate(format!(
                    "multiplier must be a positive number, got {m}"
                )));
            }
        }
        if let Some(Some(t)) = self.target_quantity {
            if t < 0 {
                return Err(CoreError::InvalidUpdate(format!(
                    "targetQuantity must not be negative, got {t}"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
