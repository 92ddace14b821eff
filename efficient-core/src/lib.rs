//! Multi-modal route planning over a road and transit network.
//!
//! A [`Network`](model::Network) is built from road and transit polylines,
//! nearby endpoints merged into shared nodes. Queries snap arbitrary
//! coordinates to the network and run a label-setting search under one of
//! several objectives: shortest distance, cheapest fare, cheapest fare within
//! service hours, or earliest arrival with headway waits.

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;

/// Clock time in seconds since midnight
pub type Time = u32;
