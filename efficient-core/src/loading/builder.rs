use geo::{ConvexHull, Intersects, MultiPoint};
use itertools::Itertools;
use log::{debug, info, warn};

use super::config::NetworkConfig;
use super::csv_feed::read_feed;
use super::records::{FeedSource, IngestRecord};
use crate::{
    Error,
    model::{Mode, Network, haversine_km, network::graph::validate_coordinate},
};

/// Counters reported after ingestion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub accepted: usize,
    pub skipped: usize,
    pub nodes: usize,
    pub edges: usize,
}

/// Incrementally turns ingest records into a [`Network`]
#[derive(Debug)]
pub struct NetworkBuilder {
    network: Network,
    accepted: usize,
    skipped: usize,
}

impl NetworkBuilder {
    pub fn new(config: NetworkConfig) -> Self {
        Self {
            network: Network::new(config),
            accepted: 0,
            skipped: 0,
        }
    }

    /// Adds one record, returning whether it was accepted.
    ///
    /// A record is rejected as a whole, before any node is created, when it
    /// has fewer than two points or carries an invalid coordinate.
    pub fn add_record(&mut self, record: &IngestRecord) -> bool {
        match self.try_add(record) {
            Ok(()) => {
                self.accepted += 1;
                true
            }
            Err(e) => {
                warn!("Skipping {} record: {e}", record.mode());
                self.skipped += 1;
                false
            }
        }
    }

    pub fn add_records<'a>(&mut self, records: impl IntoIterator<Item = &'a IngestRecord>) {
        for record in records {
            self.add_record(record);
        }
    }

    fn try_add(&mut self, record: &IngestRecord) -> Result<(), Error> {
        let points = record.points();
        if points.len() < 2 {
            return Err(Error::InvalidData(format!(
                "record needs at least 2 points, got {}",
                points.len()
            )));
        }
        for point in points {
            validate_coordinate(*point)?;
        }

        let mode = record.mode();
        let mut first = None;
        let mut last = None;
        for (a, b) in points.iter().tuple_windows() {
            let from = self.network.find_or_add_node(*a)?;
            let to = self.network.find_or_add_node(*b)?;
            first.get_or_insert(from);
            last = Some(to);

            if from == to {
                debug!("Consecutive points merged into {from:?}, no edge added");
                continue;
            }
            self.network.connect(from, to, mode, haversine_km(*a, *b))?;
        }

        if let IngestRecord::Route {
            start_name,
            end_name,
            ..
        } = record
        {
            if let Some(node) = first {
                self.network.set_node_name(node, start_name.as_str())?;
            }
            if let Some(node) = last {
                self.network.set_node_name(node, end_name.as_str())?;
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> LoadSummary {
        LoadSummary {
            accepted: self.accepted,
            skipped: self.skipped,
            nodes: self.network.node_count(),
            edges: self.network.edge_count(),
        }
    }

    pub fn finish(self) -> (Network, LoadSummary) {
        let summary = self.summary();
        (self.network, summary)
    }
}

/// Builds a network from CSV feeds
///
/// # Errors
///
/// Returns an error if the configuration is invalid, no feed is given, or a
/// feed file cannot be read
pub fn load_network(
    config: &NetworkConfig,
    sources: &[FeedSource],
) -> Result<(Network, LoadSummary), Error> {
    config.validate()?;
    validate_sources(sources)?;

    let mut builder = NetworkBuilder::new(config.clone());
    for source in sources {
        info!(
            "Processing {:?} feed: {}",
            source.kind,
            source.path.display()
        );
        let records = read_feed(source)?;
        builder.add_records(&records);
    }

    let (network, summary) = builder.finish();
    check_transit_coverage(&network);
    info!(
        "Network loaded: {} records accepted, {} skipped, {} nodes, {} edges",
        summary.accepted, summary.skipped, summary.nodes, summary.edges
    );
    Ok((network, summary))
}

fn validate_sources(sources: &[FeedSource]) -> Result<(), Error> {
    if sources.is_empty() {
        return Err(Error::InvalidData("No feed files provided".to_string()));
    }

    for source in sources {
        if !source.path.exists() {
            return Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Feed file not found: {}", source.path.display()),
            )));
        }
    }

    Ok(())
}

/// Warns about transit stops lying outside the area covered by roads
#[allow(clippy::cast_precision_loss)]
fn check_transit_coverage(network: &Network) {
    let road_nodes: MultiPoint = network
        .edges_by_mode(Mode::Car)
        .filter_map(|edge| network.node(edge.from))
        .map(|node| node.geometry)
        .collect();
    if road_nodes.0.is_empty() {
        return;
    }
    let road_hull = road_nodes.convex_hull();

    let stops: Vec<_> = [Mode::Metro, Mode::BusA, Mode::BusB]
        .into_iter()
        .flat_map(|mode| network.edges_by_mode(mode))
        .map(|edge| edge.from)
        .unique()
        .collect();
    let outside = stops
        .iter()
        .filter_map(|node| network.node(*node))
        .filter(|node| !node.geometry.intersects(&road_hull))
        .count();

    if outside > 0 {
        let percentage = outside as f64 / stops.len() as f64 * 100.0;
        warn!(
            "{outside} of {} transit stops ({percentage:.1}%) are outside the road network \
            coverage area",
            stops.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use geo::Point;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::loading::FeedKind;

    fn road(points: &[(f64, f64)]) -> IngestRecord {
        IngestRecord::Road {
            points: points.iter().map(|&(lon, lat)| Point::new(lon, lat)).collect(),
        }
    }

    #[test]
    fn polyline_creates_edge_pairs() {
        let mut builder = NetworkBuilder::new(NetworkConfig::default());
        assert!(builder.add_record(&road(&[
            (90.4070, 23.7806),
            (90.4080, 23.7810),
            (90.4090, 23.7830),
        ])));
        let (net, summary) = builder.finish();
        assert_eq!(summary.nodes, 3);
        assert_eq!(summary.edges, 4);
        assert_eq!(net.edges_by_mode(Mode::Car).count(), 4);
    }

    #[test]
    fn shared_endpoints_merge() {
        let mut builder = NetworkBuilder::new(NetworkConfig::default());
        builder.add_record(&road(&[(90.4070, 23.7806), (90.4080, 23.7810)]));
        // Within 10 m of the previous endpoint
        builder.add_record(&road(&[(90.408_01, 23.7810), (90.4090, 23.7830)]));
        assert_eq!(builder.summary().nodes, 3);
    }

    #[test]
    fn short_or_invalid_records_are_skipped_whole() {
        let mut builder = NetworkBuilder::new(NetworkConfig::default());
        assert!(!builder.add_record(&road(&[(90.4070, 23.7806)])));
        assert!(!builder.add_record(&road(&[(90.4070, 23.7806), (200.0, 23.0)])));
        let summary = builder.summary();
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.accepted, 0);
        assert_eq!(summary.nodes, 0);
    }

    #[test]
    fn routes_name_their_terminals() {
        let mut builder = NetworkBuilder::new(NetworkConfig::default());
        builder.add_record(&IngestRecord::Route {
            mode: Mode::Metro,
            points: vec![
                Point::new(90.3654, 23.8759),
                Point::new(90.3680, 23.8730),
                Point::new(90.3700, 23.8700),
            ],
            start_name: "Uttara North".to_string(),
            end_name: "Uttara South".to_string(),
        });
        let (net, _) = builder.finish();
        let names: Vec<&str> = net.nodes().map(|(_, node)| node.name.as_str()).collect();
        assert_eq!(names, vec!["Uttara North", "Node 1", "Uttara South"]);
    }

    #[test]
    fn loads_feeds_from_files() {
        let mut roads = NamedTempFile::new().unwrap();
        writeln!(
            roads,
            "Road, 90.4070, 23.7806, 90.4080, 23.7810, 0, 0.12\nbroken row"
        )
        .unwrap();
        let mut metro = NamedTempFile::new().unwrap();
        writeln!(metro, "Metro, 90.4080, 23.7810, 90.4200, 23.7900, A, B").unwrap();

        let sources = [
            FeedSource::new(roads.path(), FeedKind::Roads),
            FeedSource::new(metro.path(), FeedKind::Metro),
        ];
        let (net, summary) = load_network(&NetworkConfig::default(), &sources).unwrap();
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.nodes, 3);
        assert_eq!(net.edges_by_mode(Mode::Metro).count(), 2);
    }

    #[test]
    fn missing_feed_is_an_error() {
        let sources = [FeedSource::new("/nonexistent/roads.csv", FeedKind::Roads)];
        assert!(matches!(
            load_network(&NetworkConfig::default(), &sources),
            Err(Error::IoError(_))
        ));
        assert!(load_network(&NetworkConfig::default(), &[]).is_err());
    }
}
