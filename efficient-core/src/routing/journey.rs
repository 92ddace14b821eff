//! Point-to-point routing: snapping, search and itinerary assembly

use geo::Point;
use geojson::FeatureCollection;
use log::debug;
use petgraph::graph::NodeIndex;

use super::{
    engine::{label_setting_search, travel_time},
    itinerary::{Itinerary, WalkLink, build_itinerary},
    objective::{Objective, ObjectiveSpec},
};
use crate::{
    Error,
    model::{Network, TimeOfDay},
};

/// A routing request between two arbitrary coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Query {
    /// Origin (x = longitude, y = latitude)
    pub from: Point<f64>,
    /// Destination (x = longitude, y = latitude)
    pub to: Point<f64>,
    pub objective: Objective,
    /// Required by time-aware objectives
    pub departure: Option<TimeOfDay>,
}

impl Query {
    pub fn new(from: Point<f64>, to: Point<f64>, objective: Objective) -> Self {
        Self {
            from,
            to,
            objective,
            departure: None,
        }
    }

    #[must_use]
    pub fn departing_at(mut self, departure: TimeOfDay) -> Self {
        self.departure = Some(departure);
        self
    }
}

/// Successful routing result
#[derive(Debug, Clone)]
pub struct Journey {
    pub source: NodeIndex,
    pub target: NodeIndex,
    /// Network nodes visited, source first
    pub path: Vec<NodeIndex>,
    /// Locations along the route: the walked query points and every node of
    /// `path`
    pub coordinates: Vec<Point<f64>>,
    pub itinerary: Itinerary,
    /// Value of the minimised quantity at the target (km, money, or arrival
    /// clock in seconds)
    pub objective_value: f64,
}

impl Journey {
    /// # Errors
    ///
    /// Returns [`Error::GeoJsonError`] if a feature cannot be assembled
    pub fn to_geojson(&self) -> Result<FeatureCollection, Error> {
        self.itinerary.to_geojson()
    }
}

/// Routes `query` over `network` using one of the built-in objectives.
///
/// # Errors
///
/// - [`Error::NetworkNotFound`] if the network has no nodes
/// - [`Error::NoPathFound`] if the destination node cannot be reached
/// - [`Error::InvalidDepartureTime`] if a time-aware objective has no
///   departure
pub fn route(network: &Network, query: &Query) -> Result<Journey, Error> {
    route_with_spec(
        network,
        query.from,
        query.to,
        &query.objective.spec(),
        query.departure,
    )
}

/// Routes between two coordinates with a caller-supplied objective.
///
/// For time-aware objectives the departure is the clock at `from`; the
/// search leaves the nearest node once the access walk is done.
///
/// # Errors
///
/// Same as [`route`]
pub fn route_with_spec(
    network: &Network,
    from: Point<f64>,
    to: Point<f64>,
    spec: &ObjectiveSpec,
    departure: Option<TimeOfDay>,
) -> Result<Journey, Error> {
    let departure = if spec.is_time_aware() {
        Some(
            departure
                .ok_or_else(|| {
                    Error::InvalidDepartureTime(
                        "time-aware objective needs a departure".to_string(),
                    )
                })?
                .as_time(),
        )
    } else {
        None
    };

    let (source, source_gap) = network.find_nearest_node(from)?;
    let (target, target_gap) = network.find_nearest_node(to)?;

    let config = network.config();
    let epsilon_km = config.snap_epsilon_m / 1000.0;
    let access = (source_gap > epsilon_km).then_some(WalkLink {
        point: from,
        distance: source_gap,
    });
    let egress = (target_gap > epsilon_km).then_some(WalkLink {
        point: to,
        distance: target_gap,
    });

    let access_time = access.map_or(0, |walk| travel_time(walk.distance, config.walk_speed_kmh));
    let search_departure = departure.map(|clock| clock + access_time);

    let outcome = label_setting_search(network, source, target, spec, search_departure)?;
    let steps = outcome.trace(network)?;
    let objective_value = outcome.objective_value().ok_or(Error::NoPathFound)?;

    let path: Vec<NodeIndex> = std::iter::once(source)
        .chain(steps.iter().map(|step| step.edge.to))
        .collect();
    let coordinates = access
        .map(|walk| walk.point)
        .into_iter()
        .chain(
            path.iter()
                .filter_map(|node| network.node(*node))
                .map(|node| node.geometry),
        )
        .chain(egress.map(|walk| walk.point))
        .collect();
    let itinerary = build_itinerary(network, source, target, &steps, access, egress, departure);

    debug!(
        "Routed {source:?} -> {target:?}: {} legs, {:.3} km, cost {:.2}",
        itinerary.legs.len(),
        itinerary.totals.distance,
        itinerary.totals.cost
    );

    Ok(Journey {
        source,
        target,
        path,
        coordinates,
        itinerary,
        objective_value,
    })
}
