//! Rotation aggregate: favourites, the bounded rotation list, and the
//! per-user state persisted by the rotation store.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{RestaurantId, RestaurantRef, UserId};

/// Maximum number of restaurants shown to a user at once.
pub const ROTATION_SIZE: usize = 10;

/// One slot in a user's rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RotationEntry {
    /// Restaurant snapshot captured when the rotation was computed.
    pub restaurant: RestaurantRef,
    /// Whether the slot was filled from the user's favourites.
    pub from_favourites: bool,
}

impl RotationEntry {
    /// Entry sourced from the user's favourites.
    pub fn favourite(restaurant: RestaurantRef) -> Self {
        Self {
            restaurant,
            from_favourites: true,
        }
    }

    /// Entry drawn at random from the rest of the catalogue.
    pub fn drawn(restaurant: RestaurantRef) -> Self {
        Self {
            restaurant,
            from_favourites: false,
        }
    }

    /// Identifier of the referenced restaurant.
    pub fn restaurant_id(&self) -> RestaurantId {
        self.restaurant.id
    }
}

/// Restaurants a user has pinned, iterated in ascending id order.
///
/// # Examples
/// ```
/// use munch_backend::domain::{Favourites, RestaurantId};
///
/// let a = RestaurantId::random();
/// let favourites = Favourites::from_iter([a, a]);
/// assert_eq!(favourites.len(), 1);
/// assert!(favourites.contains(&a));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Favourites(BTreeSet<RestaurantId>);

impl Favourites {
    /// Empty favourites set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` is pinned.
    pub fn contains(&self, id: &RestaurantId) -> bool {
        self.0.contains(id)
    }

    /// Number of pinned restaurants.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is pinned.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &RestaurantId> + '_ {
        self.0.iter()
    }

    /// Copy the ids into a vector in ascending order.
    pub fn to_vec(&self) -> Vec<RestaurantId> {
        self.0.iter().copied().collect()
    }
}

impl FromIterator<RestaurantId> for Favourites {
    fn from_iter<T: IntoIterator<Item = RestaurantId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Favourites {
    type Item = &'a RestaurantId;
    type IntoIter = std::collections::btree_set::Iter<'a, RestaurantId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Structural violations detected when building a [`Rotation`].
///
/// These indicate a bug in the caller rather than bad user input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RotationInvariantError {
    /// More entries than [`ROTATION_SIZE`].
    #[error("rotation holds {len} entries; capacity is {ROTATION_SIZE}")]
    TooManyEntries { len: usize },
    /// The same restaurant appears twice.
    #[error("restaurant {id} appears more than once in the rotation")]
    DuplicateRestaurant { id: RestaurantId },
}

/// Ordered, bounded list of restaurants shown to a user.
///
/// ## Invariants
/// - At most [`ROTATION_SIZE`] entries.
/// - No restaurant id appears twice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct Rotation(Vec<RotationEntry>);

impl Rotation {
    /// Empty rotation.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate arbitrary entries and wrap them.
    ///
    /// # Examples
    /// ```
    /// use munch_backend::domain::{Rotation, RotationEntry, RestaurantId, RestaurantRef};
    ///
    /// let restaurant = RestaurantRef::new(RestaurantId::random(), "Dosa Hut", "Indian", "Atrium");
    /// let entries = vec![
    ///     RotationEntry::drawn(restaurant.clone()),
    ///     RotationEntry::favourite(restaurant),
    /// ];
    /// assert!(Rotation::try_from_entries(entries).is_err());
    /// ```
    pub fn try_from_entries(entries: Vec<RotationEntry>) -> Result<Self, RotationInvariantError> {
        if entries.len() > ROTATION_SIZE {
            return Err(RotationInvariantError::TooManyEntries {
                len: entries.len(),
            });
        }
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if !seen.insert(entry.restaurant_id()) {
                return Err(RotationInvariantError::DuplicateRestaurant {
                    id: entry.restaurant_id(),
                });
            }
        }
        Ok(Self(entries))
    }

    /// Borrow the entries in display order.
    pub fn entries(&self) -> &[RotationEntry] {
        &self.0
    }

    /// Consume the rotation, yielding its entries.
    pub fn into_entries(self) -> Vec<RotationEntry> {
        self.0
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the rotation is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `id` is present.
    pub fn contains(&self, id: &RestaurantId) -> bool {
        self.0.iter().any(|entry| &entry.restaurant_id() == id)
    }

    /// Identifiers of entries marked as favourites, in rotation order.
    pub fn favourite_ids(&self) -> Vec<RestaurantId> {
        self.0
            .iter()
            .filter(|entry| entry.from_favourites)
            .map(RotationEntry::restaurant_id)
            .collect()
    }
}

impl<'de> Deserialize<'de> for Rotation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let entries = Vec::<RotationEntry>::deserialize(deserializer)?;
        Self::try_from_entries(entries).map_err(serde::de::Error::custom)
    }
}

/// Everything the rotation store keeps for one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRotationState {
    pub user_id: UserId,
    pub favourites: Favourites,
    pub rotation: Rotation,
    /// When `rotation` was last recomputed.
    pub refreshed_at: DateTime<Utc>,
}

impl UserRotationState {
    /// Assemble a state snapshot.
    pub fn new(
        user_id: UserId,
        favourites: Favourites,
        rotation: Rotation,
        refreshed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            favourites,
            rotation,
            refreshed_at,
        }
    }
}
