//! Bus stop types.

use std::fmt;

use serde::Serialize;

/// Backend stop identifier (`stpid`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StopId(String);

impl StopId {
    /// Create a stop id, trimming surrounding whitespace.
    ///
    /// Returns `None` for an empty id.
    pub fn new(s: impl AsRef<str>) -> Option<Self> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stop served by a (route, direction) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
}

impl Stop {
    pub fn new(id: StopId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
