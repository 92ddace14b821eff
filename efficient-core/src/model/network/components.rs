//! Network components - nodes and edges

use geo::Point;

use crate::model::Mode;

/// Network node: a deduplicated coordinate, optionally named after a stop
#[derive(Debug, Clone)]
pub struct Node {
    /// Display name, a generated placeholder until a route names the stop
    pub name: String,
    /// Node coordinates (x = longitude, y = latitude)
    pub geometry: Point<f64>,
}

impl Node {
    pub fn lat(&self) -> f64 {
        self.geometry.y()
    }

    pub fn lon(&self) -> f64 {
        self.geometry.x()
    }
}

/// Directed network edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub mode: Mode,
    /// Great-circle length in kilometres
    pub distance: f64,
}
