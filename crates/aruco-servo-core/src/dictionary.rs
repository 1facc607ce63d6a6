//! Supported ArUco/AprilTag dictionary variants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Static metadata for one predefined dictionary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DictionaryInfo {
    /// Canonical name, as used in configs and marker file names.
    pub name: &'static str,
    /// Marker side length (number of inner bits per side).
    pub marker_size: usize,
    /// Number of marker ids in the dictionary.
    pub capacity: u32,
    /// Index of the dictionary in OpenCV's `PredefinedDictionaryType`.
    pub predefined_index: i32,
}

/// A closed set of marker dictionaries the detector and generator accept.
///
/// Names are resolved once at startup; anything outside this set is a
/// configuration error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MarkerDictionary {
    Dict4x4_50,
    Dict4x4_100,
    Dict4x4_250,
    Dict4x4_1000,
    Dict5x5_50,
    #[default]
    Dict5x5_100,
    Dict5x5_250,
    Dict5x5_1000,
    Dict6x6_50,
    Dict6x6_100,
    Dict6x6_250,
    Dict6x6_1000,
    Dict7x7_50,
    Dict7x7_100,
    Dict7x7_250,
    Dict7x7_1000,
    ArucoOriginal,
    AprilTag16h5,
    AprilTag25h9,
    AprilTag36h10,
    AprilTag36h11,
}

impl MarkerDictionary {
    /// Every supported variant, in OpenCV enumeration order.
    pub const ALL: [MarkerDictionary; 21] = [
        Self::Dict4x4_50,
        Self::Dict4x4_100,
        Self::Dict4x4_250,
        Self::Dict4x4_1000,
        Self::Dict5x5_50,
        Self::Dict5x5_100,
        Self::Dict5x5_250,
        Self::Dict5x5_1000,
        Self::Dict6x6_50,
        Self::Dict6x6_100,
        Self::Dict6x6_250,
        Self::Dict6x6_1000,
        Self::Dict7x7_50,
        Self::Dict7x7_100,
        Self::Dict7x7_250,
        Self::Dict7x7_1000,
        Self::ArucoOriginal,
        Self::AprilTag16h5,
        Self::AprilTag25h9,
        Self::AprilTag36h10,
        Self::AprilTag36h11,
    ];

    /// Metadata for this variant.
    pub fn info(self) -> DictionaryInfo {
        let (name, marker_size, capacity) = match self {
            Self::Dict4x4_50 => ("DICT_4X4_50", 4, 50),
            Self::Dict4x4_100 => ("DICT_4X4_100", 4, 100),
            Self::Dict4x4_250 => ("DICT_4X4_250", 4, 250),
            Self::Dict4x4_1000 => ("DICT_4X4_1000", 4, 1000),
            Self::Dict5x5_50 => ("DICT_5X5_50", 5, 50),
            Self::Dict5x5_100 => ("DICT_5X5_100", 5, 100),
            Self::Dict5x5_250 => ("DICT_5X5_250", 5, 250),
            Self::Dict5x5_1000 => ("DICT_5X5_1000", 5, 1000),
            Self::Dict6x6_50 => ("DICT_6X6_50", 6, 50),
            Self::Dict6x6_100 => ("DICT_6X6_100", 6, 100),
            Self::Dict6x6_250 => ("DICT_6X6_250", 6, 250),
            Self::Dict6x6_1000 => ("DICT_6X6_1000", 6, 1000),
            Self::Dict7x7_50 => ("DICT_7X7_50", 7, 50),
            Self::Dict7x7_100 => ("DICT_7X7_100", 7, 100),
            Self::Dict7x7_250 => ("DICT_7X7_250", 7, 250),
            Self::Dict7x7_1000 => ("DICT_7X7_1000", 7, 1000),
            Self::ArucoOriginal => ("DICT_ARUCO_ORIGINAL", 5, 1024),
            Self::AprilTag16h5 => ("DICT_APRILTAG_16h5", 4, 30),
            Self::AprilTag25h9 => ("DICT_APRILTAG_25h9", 5, 35),
            Self::AprilTag36h10 => ("DICT_APRILTAG_36h10", 6, 2320),
            Self::AprilTag36h11 => ("DICT_APRILTAG_36h11", 6, 587),
        };
        DictionaryInfo {
            name,
            marker_size,
            capacity,
            predefined_index: self as i32,
        }
    }

    /// Canonical name, e.g. `DICT_5X5_100`.
    #[inline]
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Whether `id` addresses a marker of this dictionary.
    pub fn contains_id(self, id: i32) -> bool {
        id >= 0 && (id as u32) < self.info().capacity
    }
}

impl fmt::Display for MarkerDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a dictionary name is not one of [`MarkerDictionary::ALL`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown marker dictionary `{0}`")]
pub struct UnknownDictionary(pub String);

impl FromStr for MarkerDictionary {
    type Err = UnknownDictionary;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.name() == key)
            .ok_or_else(|| UnknownDictionary(s.to_owned()))
    }
}

impl TryFrom<String> for MarkerDictionary {
    type Error = UnknownDictionary;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MarkerDictionary> for String {
    fn from(value: MarkerDictionary) -> Self {
        value.name().to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for dict in MarkerDictionary::ALL {
            let parsed: MarkerDictionary = dict.name().parse().expect("known name");
            assert_eq!(parsed, dict);
        }
    }

    #[test]
    fn predefined_index_follows_opencv_order() {
        for (i, dict) in MarkerDictionary::ALL.iter().enumerate() {
            assert_eq!(dict.info().predefined_index, i as i32);
        }
        assert_eq!(MarkerDictionary::Dict5x5_100.info().predefined_index, 5);
        assert_eq!(MarkerDictionary::AprilTag36h11.info().predefined_index, 20);
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "DICT_9X9_50".parse::<MarkerDictionary>().unwrap_err();
        assert_eq!(err, UnknownDictionary("DICT_9X9_50".to_owned()));
        assert!("dict_5x5_100".parse::<MarkerDictionary>().is_err());
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&MarkerDictionary::AprilTag16h5).unwrap();
        assert_eq!(json, "\"DICT_APRILTAG_16h5\"");
        let back: MarkerDictionary = serde_json::from_str("\"DICT_4X4_50\"").unwrap();
        assert_eq!(back, MarkerDictionary::Dict4x4_50);
        assert!(serde_json::from_str::<MarkerDictionary>("\"DICT_FOO\"").is_err());
    }

    #[test]
    fn id_range_respects_capacity() {
        let dict = MarkerDictionary::Dict5x5_100;
        assert!(dict.contains_id(0));
        assert!(dict.contains_id(99));
        assert!(!dict.contains_id(100));
        assert!(!dict.contains_id(-1));
    }
}
