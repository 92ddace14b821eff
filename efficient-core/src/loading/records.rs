use std::path::PathBuf;

use geo::Point;

use crate::model::Mode;

/// One ingested connection sequence
#[derive(Debug, Clone, PartialEq)]
pub enum IngestRecord {
    /// Road polyline, always driven by car
    Road { points: Vec<Point<f64>> },
    /// Transit line whose first and last stops are named
    Route {
        mode: Mode,
        points: Vec<Point<f64>>,
        start_name: String,
        end_name: String,
    },
}

impl IngestRecord {
    pub fn mode(&self) -> Mode {
        match self {
            IngestRecord::Road { .. } => Mode::Car,
            IngestRecord::Route { mode, .. } => *mode,
        }
    }

    pub fn points(&self) -> &[Point<f64>] {
        match self {
            IngestRecord::Road { points } | IngestRecord::Route { points, .. } => points,
        }
    }
}

/// Kind of CSV feed and the mode its rows carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKind {
    Roads,
    Metro,
    BusA,
    BusB,
}

impl FeedKind {
    pub fn mode(self) -> Mode {
        match self {
            FeedKind::Roads => Mode::Car,
            FeedKind::Metro => Mode::Metro,
            FeedKind::BusA => Mode::BusA,
            FeedKind::BusB => Mode::BusB,
        }
    }
}

/// A feed file to ingest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub path: PathBuf,
    pub kind: FeedKind,
}

impl FeedSource {
    pub fn new(path: impl Into<PathBuf>, kind: FeedKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}
