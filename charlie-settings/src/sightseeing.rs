//! Settings for the sightseeing listings.

use serde::{Deserialize, Serialize};

/// The two listings the service exposes. Both share one normalizer and differ
/// only in post-processing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SightseeingSettings {
    /// Listing served by `/v1/get_sight_seeing`.
    pub top: ListingSettings,

    /// Listing served by `/v1/get_all_sight_seeing`.
    pub all: ListingSettings,
}

/// Post-processing applied after normalization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingSettings {
    /// Sort tours by descending rating.
    pub rank: bool,

    /// Keep at most this many tours. `None` keeps all of them.
    pub limit: Option<usize>,
}
