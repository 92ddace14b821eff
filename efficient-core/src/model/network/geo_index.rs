//! Spatial index used for node deduplication and snapping
//!
//! Points are stored as unit vectors on the sphere, so the Euclidean chord
//! between two entries grows monotonically with their great-circle distance.
//! Nearest-neighbour order in the tree is therefore Haversine order.

use geo::{Distance, Haversine, Point};
use petgraph::graph::NodeIndex;
use rstar::{RTree, primitives::GeomWithData};

/// Radius used to turn metre tolerances into chord lengths
const EARTH_RADIUS_M: f64 = 6_371_008.8;
/// Slack for the chord prefilter, exact filtering uses Haversine
const CHORD_SLACK: f64 = 1e-9;
/// Squared-chord window gathering nearest-neighbour tie candidates, well above
/// the rounding error of unit-vector arithmetic
const CHORD_TIE_WINDOW: f64 = 1e-12;
/// Distances closer than this are equal for tie-breaking (one micrometre)
const TIE_EPSILON_KM: f64 = 1e-9;

type IndexedNode = GeomWithData<[f64; 3], NodeIndex>;

/// Great-circle distance in kilometres
pub fn haversine_km(a: Point<f64>, b: Point<f64>) -> f64 {
    Haversine.distance(a, b) / 1000.0
}

fn unit_vector(point: Point<f64>) -> [f64; 3] {
    let (lat, lon) = (point.y().to_radians(), point.x().to_radians());
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

fn chord_for_metres(metres: f64) -> f64 {
    let angle = (metres / EARTH_RADIUS_M).min(std::f64::consts::PI);
    2.0 * (angle / 2.0).sin() + CHORD_SLACK
}

#[derive(Debug, Clone)]
pub struct GeoIndex {
    tree: RTree<IndexedNode>,
    locations: Vec<Point<f64>>,
}

impl Default for GeoIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl GeoIndex {
    pub fn new() -> Self {
        Self {
            tree: RTree::new(),
            locations: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    pub fn insert(&mut self, point: Point<f64>, node: NodeIndex) {
        if self.locations.len() <= node.index() {
            self.locations.resize(node.index() + 1, Point::new(f64::NAN, f64::NAN));
        }
        self.locations[node.index()] = point;
        self.tree.insert(GeomWithData::new(unit_vector(point), node));
    }

    /// Earliest-created node within `tolerance_m` metres of `point`
    pub fn within_tolerance(&self, point: Point<f64>, tolerance_m: f64) -> Option<NodeIndex> {
        let chord = chord_for_metres(tolerance_m);
        let tolerance_km = tolerance_m / 1000.0;

        self.tree
            .locate_within_distance(unit_vector(point), chord * chord)
            .map(|entry| entry.data)
            .filter(|node| haversine_km(self.locations[node.index()], point) <= tolerance_km)
            .min()
    }

    /// Closest node to `point` with its distance in kilometres.
    /// Equidistant candidates resolve to the earliest-created node.
    pub fn nearest(&self, point: Point<f64>) -> Option<(NodeIndex, f64)> {
        let query = unit_vector(point);
        let mut neighbours = self.tree.nearest_neighbor_iter_with_distance_2(&query);
        let (first, best_d2) = neighbours.next()?;

        let candidates: Vec<(NodeIndex, f64)> = std::iter::once(first)
            .chain(
                neighbours
                    .take_while(|(_, d2)| *d2 <= best_d2 + CHORD_TIE_WINDOW)
                    .map(|(entry, _)| entry),
            )
            .map(|entry| {
                let node = entry.data;
                (node, haversine_km(self.locations[node.index()], point))
            })
            .collect();

        let best_km = candidates.iter().map(|(_, km)| *km).min_by(f64::total_cmp)?;
        candidates
            .into_iter()
            .filter(|(_, km)| *km <= best_km + TIE_EPSILON_KM)
            .min_by_key(|(node, _)| *node)
    }
}
