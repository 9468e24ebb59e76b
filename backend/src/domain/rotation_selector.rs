//! Pure rotation selection.
//!
//! Favourites present in the catalogue always come first, ordered by
//! restaurant id. The remaining slots are a uniform draw without replacement
//! from the rest of the catalogue.

use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use super::{
    Favourites, ROTATION_SIZE, RestaurantId, RestaurantRef, Rotation, RotationEntry,
    RotationInvariantError,
};

/// Outcome of one selection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationSelection {
    /// The selected rotation.
    pub rotation: Rotation,
    /// Favourites present in the catalogue that did not fit.
    pub dropped_favourites: usize,
}

/// Select a rotation from `catalogue`, pinning `favourites`.
///
/// Favourite ids absent from the catalogue are ignored and duplicate
/// catalogue rows collapse to their first occurrence. When more than
/// [`ROTATION_SIZE`] favourites are present, the lowest ids are kept and the
/// overflow is reported through [`RotationSelection::dropped_favourites`].
///
/// # Examples
/// ```
/// use munch_backend::domain::{select_rotation, Favourites, RestaurantId, RestaurantRef};
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
///
/// let catalogue: Vec<RestaurantRef> = (0..15)
///     .map(|n| RestaurantRef::new(RestaurantId::random(), format!("R{n}"), "Cafe", "Lobby"))
///     .collect();
/// let favourites = Favourites::from_iter(catalogue.iter().take(3).map(|r| r.id));
///
/// let selection = select_rotation(&favourites, &catalogue, &mut StdRng::seed_from_u64(7));
/// assert_eq!(selection.rotation.len(), 10);
/// assert_eq!(selection.rotation.favourite_ids().len(), 3);
/// assert_eq!(selection.dropped_favourites, 0);
/// ```
pub fn select_rotation<R>(
    favourites: &Favourites,
    catalogue: &[RestaurantRef],
    rng: &mut R,
) -> RotationSelection
where
    R: Rng + ?Sized,
{
    let mut seen: HashSet<RestaurantId> = HashSet::with_capacity(catalogue.len());
    let mut favoured: Vec<&RestaurantRef> = Vec::new();
    let mut unfavoured: Vec<&RestaurantRef> = Vec::new();
    for restaurant in catalogue {
        if !seen.insert(restaurant.id) {
            continue;
        }
        if favourites.contains(&restaurant.id) {
            favoured.push(restaurant);
        } else {
            unfavoured.push(restaurant);
        }
    }
    favoured.sort_by_key(|restaurant| restaurant.id);

    let dropped_favourites = favoured.len().saturating_sub(ROTATION_SIZE);
    favoured.truncate(ROTATION_SIZE);

    let open_slots = (ROTATION_SIZE - favoured.len()).min(unfavoured.len());
    let (drawn, _) = unfavoured.partial_shuffle(rng, open_slots);

    let entries = favoured
        .into_iter()
        .map(|restaurant| RotationEntry::favourite(restaurant.clone()))
        .chain(
            drawn
                .iter()
                .map(|restaurant| RotationEntry::drawn((*restaurant).clone())),
        )
        .collect();

    RotationSelection {
        rotation: into_rotation(entries),
        dropped_favourites,
    }
}

fn into_rotation(entries: Vec<RotationEntry>) -> Rotation {
    match Rotation::try_from_entries(entries) {
        Ok(rotation) => rotation,
        // Unreachable: ids are deduplicated and the length is capped above.
        Err(RotationInvariantError::TooManyEntries { len }) => {
            panic!("selector produced {len} entries")
        }
        Err(RotationInvariantError::DuplicateRestaurant { id }) => {
            panic!("selector produced duplicate restaurant {id}")
        }
    }
}
