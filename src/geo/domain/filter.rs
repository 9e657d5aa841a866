//! Radius filtering and distance annotation for discovery listings.
//!
//! "Has coordinates" and "is within radius" are independent filters. The
//! list view keeps candidates without coordinates (unannotated) and drops
//! located candidates outside the radius; the map view keeps only located
//! candidates inside the radius.

use super::{Coordinates, Kilometres, Radius};
use serde::Serialize;

/// Anything that may carry a stored location.
pub trait Located {
    /// Returns the stored coordinates, if any.
    fn location(&self) -> Option<Coordinates>;
}

/// A discovery result annotated with its display distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranked<T> {
    /// The candidate itself.
    #[serde(flatten)]
    pub item: T,
    /// Distance from the reference point rounded to one decimal place.
    ///
    /// `None` when the candidate has no stored coordinates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<Kilometres>,
}

impl<T> Ranked<T> {
    /// Wraps a candidate without a distance annotation.
    #[must_use]
    pub const fn unranked(item: T) -> Self {
        Self {
            item,
            distance: None,
        }
    }
}

/// Reference point plus radius applied to candidate sets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusFilter {
    center: Coordinates,
    radius: Radius,
}

impl RadiusFilter {
    /// Creates a filter around `center`.
    #[must_use]
    pub const fn new(center: Coordinates, radius: Radius) -> Self {
        Self { center, radius }
    }

    /// Returns the reference point.
    #[must_use]
    pub const fn center(&self) -> Coordinates {
        self.center
    }

    /// Returns the radius.
    #[must_use]
    pub const fn radius(&self) -> Radius {
        self.radius
    }

    /// List-view filtering.
    ///
    /// Located candidates within the radius come first in ascending
    /// distance; candidates without coordinates follow in their original
    /// order.
    pub fn list_view<T, I>(&self, candidates: I) -> Vec<Ranked<T>>
    where
        T: Located,
        I: IntoIterator<Item = T>,
    {
        let mut located = Vec::new();
        let mut unlocated = Vec::new();
        for candidate in candidates {
            match candidate.location() {
                Some(point) => {
                    let distance = self.center.distance_to(point);
                    if self.radius.contains(distance) {
                        located.push((distance, candidate));
                    }
                }
                None => unlocated.push(Ranked::unranked(candidate)),
            }
        }
        let mut ranked = into_ranked(located);
        ranked.extend(unlocated);
        ranked
    }

    /// Map-view filtering: only located candidates within the radius,
    /// ascending by distance.
    pub fn map_view<T, I>(&self, candidates: I) -> Vec<Ranked<T>>
    where
        T: Located,
        I: IntoIterator<Item = T>,
    {
        let located = candidates
            .into_iter()
            .filter_map(|candidate| {
                let distance = self.center.distance_to(candidate.location()?);
                self.radius
                    .contains(distance)
                    .then_some((distance, candidate))
            })
            .collect();
        into_ranked(located)
    }
}

/// Sorts on the exact distance and annotates with the rounded one.
fn into_ranked<T>(mut located: Vec<(Kilometres, T)>) -> Vec<Ranked<T>> {
    located.sort_by(|(left, _), (right, _)| left.total_cmp(right));
    located
        .into_iter()
        .map(|(distance, item)| Ranked {
            item,
            distance: Some(distance.rounded()),
        })
        .collect()
}
