use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::Vector3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugColor {
    #[default]
    Red,
    Green,
    Orange,
    Purple,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DebugShape {
    Cross {
        center: Vector3,
        color: DebugColor,
    },
    Sphere {
        center: Vector3,
        radius: f64,
        color: DebugColor,
    },
    Line {
        start: Vector3,
        end: Vector3,
        color: DebugColor,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum DebugValue {
    Shape(DebugShape),
    Number(f64),
    String(String),
}

/// A map of debug records.
///
/// # Key format
///
/// Keys are `snake_case` segments joined by `.`, e.g. `p0.midair.intercept`.
pub type DebugMap = HashMap<String, DebugValue>;

/// Collects debug records for one tick. Nothing in here is ever read back by
/// the control logic, so a canvas can be dropped without being inspected.
#[derive(Debug, Default)]
pub struct DebugCanvas {
    prefix: Vec<String>,
    map: DebugMap,
}

impl DebugCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with `part` appended to the key prefix.
    pub fn scoped(&mut self, part: impl Into<String>, f: impl FnOnce(&mut Self)) {
        self.prefix.push(part.into());
        f(self);
        self.prefix.pop();
    }

    pub fn record(&mut self, key: &str, value: DebugValue) {
        let full_key = if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.prefix.join("."), key)
        };
        self.map.insert(full_key, value);
    }

    pub fn cross(&mut self, key: &str, center: Vector3, color: DebugColor) {
        self.record(key, DebugValue::Shape(DebugShape::Cross { center, color }));
    }

    pub fn sphere(&mut self, key: &str, center: Vector3, radius: f64, color: DebugColor) {
        self.record(
            key,
            DebugValue::Shape(DebugShape::Sphere {
                center,
                radius,
                color,
            }),
        );
    }

    pub fn line(&mut self, key: &str, start: Vector3, end: Vector3, color: DebugColor) {
        self.record(key, DebugValue::Shape(DebugShape::Line { start, end, color }));
    }

    pub fn value(&mut self, key: &str, value: f64) {
        self.record(key, DebugValue::Number(value));
    }

    pub fn string(&mut self, key: &str, value: impl Into<String>) {
        self.record(key, DebugValue::String(value.into()));
    }

    pub fn map(&self) -> &DebugMap {
        &self.map
    }

    pub fn into_map(self) -> DebugMap {
        self.map
    }
}
