use std::collections::BinaryHeap;

use fixedbitset::FixedBitSet;
use log::{debug, trace};
use petgraph::graph::{EdgeIndex, NodeIndex};

use super::state::State;
use crate::{
    Error, Time,
    model::{EdgeView, Mode, Network},
    routing::objective::{Criterion, ObjectiveSpec},
};

/// Per-node search record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Label {
    /// Best known objective value, infinite while unreached
    pub value: f64,
    /// Clock on arrival, tracked by time-aware objectives only
    pub arrival: Option<Time>,
    pub predecessor: Option<(NodeIndex, EdgeIndex)>,
    /// Mode of the edge this label was reached through
    pub arrival_mode: Option<Mode>,
    /// Wait charged before riding the predecessor edge
    pub boarding_wait: Time,
    /// Whether the predecessor edge started a new scheduled ride
    pub boarded: bool,
}

impl Label {
    const UNREACHED: Label = Label {
        value: f64::INFINITY,
        arrival: None,
        predecessor: None,
        arrival_mode: None,
        boarding_wait: 0,
        boarded: false,
    };

    pub fn is_reached(&self) -> bool {
        self.value.is_finite()
    }
}

/// One edge of the reconstructed path, in travel order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceStep {
    pub edge: EdgeView,
    pub boarding_wait: Time,
    pub boarded: bool,
    /// Clock when ready to leave `edge.from`, before any wait
    pub ready: Option<Time>,
    pub arrival: Option<Time>,
}

/// Labels left behind by a finished search
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    source: NodeIndex,
    target: NodeIndex,
    labels: Vec<Label>,
    settled: usize,
}

impl SearchOutcome {
    pub fn source(&self) -> NodeIndex {
        self.source
    }

    pub fn target(&self) -> NodeIndex {
        self.target
    }

    pub fn label(&self, node: NodeIndex) -> Option<&Label> {
        self.labels.get(node.index())
    }

    /// Number of nodes permanently labelled before termination
    pub fn settled(&self) -> usize {
        self.settled
    }

    pub fn is_reached(&self) -> bool {
        self.labels[self.target.index()].is_reached()
    }

    /// Final objective value at the target, if reached
    pub fn objective_value(&self) -> Option<f64> {
        let label = &self.labels[self.target.index()];
        label.is_reached().then_some(label.value)
    }

    /// Walks predecessor links back from the target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPathFound`] if the target was never reached
    pub fn trace(&self, network: &Network) -> Result<Vec<TraceStep>, Error> {
        if self.source == self.target {
            return Ok(Vec::new());
        }
        if !self.is_reached() {
            return Err(Error::NoPathFound);
        }

        let mut steps = Vec::new();
        let mut current = self.target;
        while current != self.source {
            let label = &self.labels[current.index()];
            let (previous, edge_id) = label.predecessor.ok_or(Error::NoPathFound)?;
            let edge = network.edge(edge_id).ok_or(Error::InvalidNodeIndex)?;

            steps.push(TraceStep {
                edge,
                boarding_wait: label.boarding_wait,
                boarded: label.boarded,
                ready: self.labels[previous.index()].arrival,
                arrival: label.arrival,
            });

            if steps.len() > self.labels.len() {
                return Err(Error::InvalidData("predecessor chain forms a cycle".to_string()));
            }
            current = previous;
        }

        steps.reverse();
        Ok(steps)
    }
}

/// Riding time in whole seconds
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn travel_time(distance_km: f64, speed_kmh: f64) -> Time {
    let seconds = (distance_km / speed_kmh * 3600.0).round();
    seconds.clamp(0.0, f64::from(Time::MAX)) as Time
}

/// Label-setting search from `source` until `target` is settled or no
/// finite label remains.
///
/// `departure` (seconds since midnight) is required by time-aware objectives
/// and ignored otherwise.
///
/// # Errors
///
/// Returns an error for unknown nodes, an inconsistent objective, or a
/// missing departure on a time-aware objective. An unreachable target is not
/// an error here; see [`SearchOutcome::trace`].
pub fn label_setting_search(
    network: &Network,
    source: NodeIndex,
    target: NodeIndex,
    spec: &ObjectiveSpec,
    departure: Option<Time>,
) -> Result<SearchOutcome, Error> {
    spec.validate()?;

    let count = network.node_count();
    if source.index() >= count || target.index() >= count {
        return Err(Error::InvalidNodeIndex);
    }

    let departure = match spec.clock {
        Some(_) => Some(departure.ok_or_else(|| {
            Error::InvalidDepartureTime("time-aware objective needs a departure".to_string())
        })?),
        None => None,
    };

    let config = network.config();
    let speed = spec.clock.map(|regime| regime.speed_kmh(config));

    let mut labels = vec![Label::UNREACHED; count];
    let mut visited = FixedBitSet::with_capacity(count);
    let mut heap = BinaryHeap::new();
    let mut settled = 0;

    let start_value = match (spec.criterion, departure) {
        (Criterion::Arrival, Some(clock)) => f64::from(clock),
        _ => 0.0,
    };
    labels[source.index()] = Label {
        value: start_value,
        arrival: departure,
        ..Label::UNREACHED
    };
    heap.push(State {
        key: start_value,
        node: source,
    });

    while let Some(State { key, node }) = heap.pop() {
        // Skip stale entries
        if visited.contains(node.index()) || key > labels[node.index()].value {
            continue;
        }
        visited.insert(node.index());
        settled += 1;

        if node == target {
            break;
        }

        let current = labels[node.index()];

        for edge in network.edges_from(node) {
            if !spec.permitted.contains(edge.mode) || visited.contains(edge.to.index()) {
                continue;
            }

            let mut wait = 0;
            let mut boarded = false;
            let mut arrival = None;

            if let (Some(speed), Some(clock)) = (speed, current.arrival) {
                let boarding = node == source || current.arrival_mode != Some(edge.mode);
                if boarding {
                    let Some(w) = network.schedule().waiting_time(clock, edge.mode) else {
                        trace!(
                            "{} not running at {clock}s, skipping {:?}",
                            edge.mode, edge.id
                        );
                        continue;
                    };
                    wait = w;
                    boarded = edge.mode.is_scheduled();
                }
                arrival = Some(
                    clock
                        .saturating_add(wait)
                        .saturating_add(travel_time(edge.distance, speed)),
                );
            }

            let candidate = match spec.criterion {
                Criterion::Distance => current.value + edge.distance,
                Criterion::Cost => current.value + edge.distance * config.rates.rate(edge.mode),
                Criterion::Arrival => match arrival {
                    Some(clock) => f64::from(clock),
                    None => continue,
                },
            };

            let next = &mut labels[edge.to.index()];
            if candidate < next.value {
                *next = Label {
                    value: candidate,
                    arrival,
                    predecessor: Some((node, edge.id)),
                    arrival_mode: Some(edge.mode),
                    boarding_wait: wait,
                    boarded,
                };
                heap.push(State {
                    key: candidate,
                    node: edge.to,
                });
            }
        }
    }

    debug!(
        "Search {source:?} -> {target:?} settled {settled} of {count} nodes, target value {}",
        labels[target.index()].value
    );

    Ok(SearchOutcome {
        source,
        target,
        labels,
        settled,
    })
}
