use geo::Point;
use log::trace;
use petgraph::{
    graph::{DiGraph, EdgeIndex, NodeIndex},
    visit::EdgeRef,
};

use super::{Edge, GeoIndex, Node};
use crate::{
    Error,
    loading::NetworkConfig,
    model::{Mode, ScheduleModel},
};

/// Outgoing edge as seen by the search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeView {
    pub id: EdgeIndex,
    pub from: NodeIndex,
    pub to: NodeIndex,
    pub mode: Mode,
    pub distance: f64,
}

/// Owns nodes, directed edges and the spatial index over nodes.
///
/// Construction happens through [`Network::find_or_add_node`] and
/// [`Network::add_edge`]; queries only need `&Network`.
#[derive(Debug, Clone)]
pub struct Network {
    pub(crate) graph: DiGraph<Node, Edge>,
    index: GeoIndex,
    config: NetworkConfig,
    schedule: ScheduleModel,
}

impl Network {
    pub fn new(config: NetworkConfig) -> Self {
        let schedule = ScheduleModel::new(config.schedules.clone());
        Self {
            graph: DiGraph::new(),
            index: GeoIndex::new(),
            config,
            schedule,
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn schedule(&self) -> &ScheduleModel {
        &self.schedule
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node(&self, node: NodeIndex) -> Option<&Node> {
        self.graph.node_weight(node)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &Node)> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph.node_weight(idx).map(|node| (idx, node)))
    }

    pub fn edge(&self, edge: EdgeIndex) -> Option<EdgeView> {
        let (from, to) = self.graph.edge_endpoints(edge)?;
        let weight = self.graph.edge_weight(edge)?;
        Some(EdgeView {
            id: edge,
            from,
            to,
            mode: weight.mode,
            distance: weight.distance,
        })
    }

    /// Edges leaving `node`; empty for unknown nodes
    pub fn edges_from(&self, node: NodeIndex) -> impl Iterator<Item = EdgeView> + '_ {
        self.graph.edges(node).map(|edge| EdgeView {
            id: edge.id(),
            from: edge.source(),
            to: edge.target(),
            mode: edge.weight().mode,
            distance: edge.weight().distance,
        })
    }

    pub fn edges_by_mode(&self, mode: Mode) -> impl Iterator<Item = EdgeView> + '_ {
        self.graph
            .edge_references()
            .filter(move |edge| edge.weight().mode == mode)
            .map(move |edge| EdgeView {
                id: edge.id(),
                from: edge.source(),
                to: edge.target(),
                mode,
                distance: edge.weight().distance,
            })
    }

    /// Returns the earliest-created node within the merge tolerance of
    /// `point`, or creates a new one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] for non-finite or out-of-range
    /// coordinates
    pub fn find_or_add_node(&mut self, point: Point<f64>) -> Result<NodeIndex, Error> {
        validate_coordinate(point)?;

        if let Some(existing) = self
            .index
            .within_tolerance(point, self.config.merge_tolerance_m)
        {
            return Ok(existing);
        }

        let node = self.graph.add_node(Node {
            name: format!("Node {}", self.graph.node_count()),
            geometry: point,
        });
        self.index.insert(point, node);
        trace!("Created {node:?} at ({}, {})", point.y(), point.x());
        Ok(node)
    }

    /// Nearest node to `point` and its great-circle distance in kilometres
    ///
    /// # Errors
    ///
    /// Returns [`Error::NetworkNotFound`] when the network has no nodes
    pub fn find_nearest_node(&self, point: Point<f64>) -> Result<(NodeIndex, f64), Error> {
        validate_coordinate(point)?;
        self.index.nearest(point).ok_or(Error::NetworkNotFound)
    }

    /// Appends a single directed edge.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown endpoints or a negative / non-finite
    /// distance
    pub fn add_edge(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        mode: Mode,
        distance: f64,
    ) -> Result<EdgeIndex, Error> {
        if !(distance.is_finite() && distance >= 0.0) {
            return Err(Error::InvalidDistance(distance));
        }
        let count = self.graph.node_count();
        if from.index() >= count || to.index() >= count {
            return Err(Error::InvalidNodeIndex);
        }
        Ok(self.graph.add_edge(from, to, Edge { mode, distance }))
    }

    /// Adds the edge pair `from -> to` and `to -> from` with equal mode and
    /// distance.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Network::add_edge`]; nothing is added on error
    pub fn connect(
        &mut self,
        from: NodeIndex,
        to: NodeIndex,
        mode: Mode,
        distance: f64,
    ) -> Result<(EdgeIndex, EdgeIndex), Error> {
        let forward = self.add_edge(from, to, mode, distance)?;
        let backward = self.add_edge(to, from, mode, distance)?;
        Ok((forward, backward))
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidNodeIndex`] for unknown nodes
    pub fn set_node_name(&mut self, node: NodeIndex, name: impl Into<String>) -> Result<(), Error> {
        let weight = self
            .graph
            .node_weight_mut(node)
            .ok_or(Error::InvalidNodeIndex)?;
        weight.name = name.into();
        Ok(())
    }
}

pub(crate) fn validate_coordinate(point: Point<f64>) -> Result<(), Error> {
    let (lat, lon) = (point.y(), point.x());
    if lat.is_finite() && lon.is_finite() && lat.abs() <= 90.0 && lon.abs() <= 180.0 {
        Ok(())
    } else {
        Err(Error::InvalidCoordinate { lat, lon })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn network() -> Network {
        Network::new(NetworkConfig::default())
    }

    #[test]
    fn connect_adds_both_directions() {
        let mut net = network();
        let a = net.find_or_add_node(Point::new(90.4070, 23.7806)).unwrap();
        let b = net.find_or_add_node(Point::new(90.4080, 23.7810)).unwrap();
        net.connect(a, b, Mode::Metro, 0.11).unwrap();

        for edge in net.edges_by_mode(Mode::Metro) {
            let reverse = net
                .edges_from(edge.to)
                .find(|e| e.to == edge.from && e.mode == edge.mode)
                .unwrap();
            assert_eq!(reverse.distance, edge.distance);
        }
        assert_eq!(net.edge_count(), 2);
        assert_eq!(net.edges_by_mode(Mode::Car).count(), 0);
    }

    #[test]
    fn rejects_bad_inputs() {
        let mut net = network();
        assert!(matches!(
            net.find_or_add_node(Point::new(f64::NAN, 23.0)),
            Err(Error::InvalidCoordinate { .. })
        ));
        assert!(net.find_or_add_node(Point::new(90.0, 91.0)).is_err());

        let a = net.find_or_add_node(Point::new(90.0, 23.0)).unwrap();
        assert!(matches!(
            net.add_edge(a, a, Mode::Car, -1.0),
            Err(Error::InvalidDistance(_))
        ));
        assert!(matches!(
            net.add_edge(a, NodeIndex::new(7), Mode::Car, 1.0),
            Err(Error::InvalidNodeIndex)
        ));
        assert_eq!(net.edge_count(), 0);
    }

    #[test]
    fn nearest_on_empty_network_fails() {
        assert!(matches!(
            network().find_nearest_node(Point::new(90.0, 23.0)),
            Err(Error::NetworkNotFound)
        ));
    }

    #[test]
    fn placeholder_names_can_be_replaced() {
        let mut net = network();
        let a = net.find_or_add_node(Point::new(90.0, 23.0)).unwrap();
        assert_eq!(net.node(a).unwrap().name, "Node 0");
        net.set_node_name(a, "Uttara North").unwrap();
        assert_eq!(net.node(a).unwrap().name, "Uttara North");
        assert!(net.set_node_name(NodeIndex::new(3), "x").is_err());
    }

    proptest! {
        #[test]
        fn find_or_add_is_idempotent_within_tolerance(
            lat in 20.0f64..26.0,
            lon in 88.0f64..92.0,
            dlat in -0.00003f64..0.00003,
        ) {
            // |dlat| < 3.4 m, inside the 10 m default tolerance
            let mut net = network();
            let first = net.find_or_add_node(Point::new(lon, lat)).unwrap();
            let again = net.find_or_add_node(Point::new(lon, lat + dlat)).unwrap();
            prop_assert_eq!(first, again);
            prop_assert_eq!(net.node_count(), 1);

            // roughly 1.1 km away
            let far = net.find_or_add_node(Point::new(lon, lat + 0.01)).unwrap();
            prop_assert_ne!(far, first);
            prop_assert_eq!(far.index(), 1);
        }
    }
}
