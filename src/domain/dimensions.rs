//! Content dimension coordinates.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One variant coordinate of a node: a tuple of axis values such as
/// `{language: en, region: eu}`.
///
/// Coordinates are kept ordered so the JSON form is canonical: equal
/// coordinates always serialize to the same string, which makes the form
/// usable as a fingerprint input.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionSpacePoint {
    coordinates: BTreeMap<String, String>,
}

impl DimensionSpacePoint {
    /// The coordinate of a dimensionless repository.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new<K, V>(coordinates: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            coordinates: coordinates
                .into_iter()
                .map(|(axis, value)| (axis.into(), value.into()))
                .collect(),
        }
    }

    pub fn coordinates(&self) -> &BTreeMap<String, String> {
        &self.coordinates
    }

    /// Canonical JSON form of the coordinate map.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.coordinates).expect("coordinate map serializes to JSON")
    }
}

impl fmt::Display for DimensionSpacePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_json())
    }
}
