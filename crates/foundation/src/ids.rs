use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::number::WholeNumber;

/// Participant identifier as it appears in the metadata document.
///
/// Ids are numeric-like strings ("3", "12"). Ordering is numeric where both
/// sides parse as integers; non-numeric ids sort after numeric ones, lexically.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(id: impl Into<String>) -> Self {
        ParticipantId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn numeric(&self) -> Option<u64> {
        self.0.trim().parse().ok()
    }

    /// Id left-padded with zeros to two characters, as used in tile names.
    pub fn padded(&self) -> String {
        format!("{:0>2}", self.0)
    }

    /// Navigation label, e.g. `TN3`.
    pub fn label(&self) -> String {
        format!("TN{}", self.0)
    }
}

impl Ord for ParticipantId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ParticipantId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        ParticipantId::new(value)
    }
}

/// Slot of a page within a participant's document set.
///
/// Any integer is accepted, including negatives and whole-number floats.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Position(pub i64);

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(WholeNumber).map(Position)
    }
}

impl Position {
    /// Two digits below 10, three digits from 10 upwards (`7` -> `07`, `12` -> `012`).
    /// Negative positions are below 10 and print as-is (`-1`).
    pub fn padded(self) -> String {
        if self.0 < 10 {
            format!("{:02}", self.0)
        } else {
            format!("{:03}", self.0)
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
