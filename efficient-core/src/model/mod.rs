//! Data model for multi-modal routing
//!
//! Contains the travel modes, the node/edge network with its spatial index,
//! and the headway schedule of scheduled services.

pub mod mode;
pub mod network;
pub mod schedule;
pub mod time;

pub use mode::{Mode, ModeSet};
pub use network::{Edge, EdgeView, GeoIndex, Network, Node, haversine_km};
pub use schedule::ScheduleModel;
pub use time::TimeOfDay;
