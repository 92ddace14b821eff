//! Itinerary reconstruction from a search trace

mod to_geojson;

use geo::Point;
use petgraph::graph::NodeIndex;

use crate::{
    Time,
    model::{Mode, Network},
    routing::engine::{TraceStep, travel_time},
};

/// A place on the itinerary: either a network node or a raw query point
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub node: Option<NodeIndex>,
    pub name: String,
    pub location: Point<f64>,
}

impl Waypoint {
    fn at_node(network: &Network, node: NodeIndex) -> Self {
        let (name, location) = network.node(node).map_or_else(
            || (String::new(), Point::new(f64::NAN, f64::NAN)),
            |n| (n.name.clone(), n.geometry),
        );
        Self {
            node: Some(node),
            name,
            location,
        }
    }

    fn at_point(name: &str, location: Point<f64>) -> Self {
        Self {
            node: None,
            name: name.to_string(),
            location,
        }
    }
}

/// Departure and arrival clock of a leg, seconds since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub departure: Time,
    pub arrival: Time,
}

impl Timing {
    pub fn duration(&self) -> Time {
        self.arrival.saturating_sub(self.departure)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Leg {
    /// Off-network walk between a query point and its nearest node
    Walk {
        from: Waypoint,
        to: Waypoint,
        distance: f64,
        timing: Option<Timing>,
    },
    /// Ride along one network edge
    Ride {
        mode: Mode,
        from: Waypoint,
        to: Waypoint,
        distance: f64,
        cost: f64,
        timing: Option<Timing>,
    },
    /// Boarding wait before a scheduled ride
    Waiting {
        at: Waypoint,
        mode: Mode,
        timing: Timing,
    },
}

impl Leg {
    pub fn mode(&self) -> Mode {
        match self {
            Leg::Walk { .. } => Mode::Walk,
            Leg::Ride { mode, .. } | Leg::Waiting { mode, .. } => *mode,
        }
    }

    pub fn distance(&self) -> f64 {
        match self {
            Leg::Walk { distance, .. } | Leg::Ride { distance, .. } => *distance,
            Leg::Waiting { .. } => 0.0,
        }
    }

    pub fn cost(&self) -> f64 {
        match self {
            Leg::Ride { cost, .. } => *cost,
            Leg::Walk { .. } | Leg::Waiting { .. } => 0.0,
        }
    }

    pub fn timing(&self) -> Option<Timing> {
        match self {
            Leg::Walk { timing, .. } | Leg::Ride { timing, .. } => *timing,
            Leg::Waiting { timing, .. } => Some(*timing),
        }
    }

    /// Start of the leg on the map
    pub fn origin(&self) -> &Waypoint {
        match self {
            Leg::Walk { from, .. } | Leg::Ride { from, .. } => from,
            Leg::Waiting { at, .. } => at,
        }
    }

    /// End of the leg on the map
    pub fn destination(&self) -> &Waypoint {
        match self {
            Leg::Walk { to, .. } | Leg::Ride { to, .. } => to,
            Leg::Waiting { at, .. } => at,
        }
    }
}

/// Running totals over an itinerary
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// Kilometres
    pub distance: f64,
    pub cost: f64,
    /// Seconds, only for time-aware objectives
    pub elapsed: Option<Time>,
    /// Seconds spent waiting for departures
    pub waiting: Time,
}

impl Totals {
    fn accumulate(self, leg: &Leg) -> Self {
        let duration = leg.timing().map(|t| t.duration());
        Self {
            distance: self.distance + leg.distance(),
            cost: self.cost + leg.cost(),
            elapsed: match (self.elapsed, duration) {
                (Some(elapsed), Some(d)) => Some(elapsed + d),
                (elapsed, _) => elapsed,
            },
            waiting: match leg {
                Leg::Waiting { timing, .. } => self.waiting + timing.duration(),
                _ => self.waiting,
            },
        }
    }
}

/// Ordered legs from the query origin to the query destination
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub legs: Vec<Leg>,
    pub totals: Totals,
    pub departure: Option<Time>,
    pub arrival: Option<Time>,
}

impl Itinerary {
    pub fn rides(&self) -> impl Iterator<Item = &Leg> {
        self.legs.iter().filter(|leg| matches!(leg, Leg::Ride { .. }))
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }
}

/// Off-network walk attached to one end of the search
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct WalkLink {
    pub(crate) point: Point<f64>,
    pub(crate) distance: f64,
}

/// Assembles legs in travel order.
///
/// `departure` is the clock at the query origin, `None` for objectives that
/// do not track time. Wait legs are emitted only for non-zero boarding waits.
pub(crate) fn build_itinerary(
    network: &Network,
    source: NodeIndex,
    target: NodeIndex,
    steps: &[TraceStep],
    access: Option<WalkLink>,
    egress: Option<WalkLink>,
    departure: Option<Time>,
) -> Itinerary {
    let config = network.config();
    let walk_time = |km: f64| travel_time(km, config.walk_speed_kmh);
    let mut legs = Vec::with_capacity(steps.len() * 2 + 2);
    let mut clock = departure;

    if let Some(walk) = access {
        let timing = clock.map(|start| Timing {
            departure: start,
            arrival: start + walk_time(walk.distance),
        });
        legs.push(Leg::Walk {
            from: Waypoint::at_point("Source", walk.point),
            to: Waypoint::at_node(network, source),
            distance: walk.distance,
            timing,
        });
        clock = timing.map(|t| t.arrival);
    }

    for step in steps {
        let from = Waypoint::at_node(network, step.edge.from);
        let board_at = step.ready.map(|ready| ready + step.boarding_wait);

        if step.boarded && step.boarding_wait > 0 {
            if let (Some(ready), Some(board)) = (step.ready, board_at) {
                legs.push(Leg::Waiting {
                    at: from.clone(),
                    mode: step.edge.mode,
                    timing: Timing {
                        departure: ready,
                        arrival: board,
                    },
                });
            }
        }

        let timing = board_at.zip(step.arrival).map(|(departure, arrival)| Timing {
            departure,
            arrival,
        });
        legs.push(Leg::Ride {
            mode: step.edge.mode,
            from,
            to: Waypoint::at_node(network, step.edge.to),
            distance: step.edge.distance,
            cost: step.edge.distance * config.rates.rate(step.edge.mode),
            timing,
        });
        clock = step.arrival.or(clock);
    }

    if let Some(walk) = egress {
        let timing = clock.map(|start| Timing {
            departure: start,
            arrival: start + walk_time(walk.distance),
        });
        legs.push(Leg::Walk {
            from: Waypoint::at_node(network, target),
            to: Waypoint::at_point("Destination", walk.point),
            distance: walk.distance,
            timing,
        });
        clock = timing.map(|t| t.arrival);
    }

    let start = Totals {
        elapsed: departure.map(|_| 0),
        ..Totals::default()
    };
    let totals = legs.iter().fold(start, Totals::accumulate);

    Itinerary {
        legs,
        totals,
        departure,
        arrival: clock,
    }
}
