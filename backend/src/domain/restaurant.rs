//! Restaurant snapshots taken from the catalogue.
//!
//! A [`RestaurantRef`] is captured each time a rotation is computed and is
//! stored inside the rotation as-is. Later catalogue edits do not rewrite
//! existing snapshots; the next recomputation picks them up.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Catalogue-owned restaurant identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = String, example = "1b4e28ba-2fa1-11d2-883f-0016d3cca427")]
pub struct RestaurantId(Uuid);

impl RestaurantId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RestaurantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RestaurantId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// Validation errors for [`AssetId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetIdValidationError {
    /// The identifier was blank.
    #[error("asset id must not be empty")]
    Empty,
    /// The identifier contained whitespace.
    #[error("asset id must not contain whitespace")]
    ContainsWhitespace,
}

/// Opaque identifier of a blob (logo or barcode image) in the asset store.
///
/// The rotation core never reads asset bytes; it only passes ids through.
///
/// # Examples
/// ```
/// use munch_backend::domain::AssetId;
///
/// let id = AssetId::new("65f1c0ffee").expect("valid asset id");
/// assert_eq!(id.as_str(), "65f1c0ffee");
/// assert!(AssetId::new("with space").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(try_from = "String", into = "String")]
#[schema(value_type = String, example = "65f1c0ffee0ddba11d15ea5e")]
pub struct AssetId(String);

impl AssetId {
    /// Validate and construct an asset id.
    pub fn new(value: impl Into<String>) -> Result<Self, AssetIdValidationError> {
        let raw = value.into();
        if raw.is_empty() {
            return Err(AssetIdValidationError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(AssetIdValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<AssetId> for String {
    fn from(value: AssetId) -> Self {
        value.0
    }
}

impl TryFrom<String> for AssetId {
    type Error = AssetIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Snapshot of a catalogue restaurant at selection time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRef {
    /// Catalogue identity.
    pub id: RestaurantId,
    /// Display name.
    pub name: String,
    /// Cuisine or venue category.
    pub category: String,
    /// Human-readable location.
    pub location: String,
    /// Logo image in the asset store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_asset_id: Option<AssetId>,
    /// Loyalty barcode image in the asset store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode_asset_id: Option<AssetId>,
}

impl RestaurantRef {
    /// Build a snapshot without asset references.
    ///
    /// # Examples
    /// ```
    /// use munch_backend::domain::{RestaurantId, RestaurantRef};
    ///
    /// let restaurant = RestaurantRef::new(RestaurantId::random(), "Pho Real", "Vietnamese", "Level 2");
    /// assert!(restaurant.logo_asset_id.is_none());
    /// ```
    pub fn new(
        id: RestaurantId,
        name: impl Into<String>,
        category: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            category: category.into(),
            location: location.into(),
            logo_asset_id: None,
            barcode_asset_id: None,
        }
    }

    /// Attach logo and barcode asset references.
    pub fn with_assets(mut self, logo: Option<AssetId>, barcode: Option<AssetId>) -> Self {
        self.logo_asset_id = logo;
        self.barcode_asset_id = barcode;
        self
    }
}
