//! Multi-modal road and transit network

pub mod components;
pub mod geo_index;
pub mod graph;

pub use components::{Edge, Node};
pub use geo_index::{GeoIndex, haversine_km};
pub use graph::{EdgeView, Network};
