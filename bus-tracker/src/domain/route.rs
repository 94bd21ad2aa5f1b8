//! Route and direction types.

use std::fmt;

use serde::Serialize;

/// A bus route designator as the backend knows it (e.g. "22", "X9").
///
/// Route designators are opaque strings: some are numeric, some carry
/// letters, so no format is enforced beyond being non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RouteId(String);

impl RouteId {
    /// Create a route id, trimming surrounding whitespace.
    ///
    /// Returns `None` for an empty or all-whitespace designator.
    pub fn new(s: impl AsRef<str>) -> Option<Self> {
        let trimmed = s.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Returns the designator as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A bus route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub id: RouteId,
    pub name: String,
}

impl Route {
    pub fn new(id: RouteId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Label shown in the route picker, e.g. "22 - Clark".
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            self.id.to_string()
        } else {
            format!("{} - {}", self.id, self.name)
        }
    }
}

/// A direction of travel on a route (e.g. "Northbound").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Direction {
    pub value: String,
}

impl Direction {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
