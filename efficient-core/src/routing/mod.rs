//! Routing: objectives, the label-setting engine and itinerary assembly

pub mod engine;
pub mod itinerary;
pub mod journey;
pub mod objective;

pub use engine::{Label, SearchOutcome, TraceStep, label_setting_search};
pub use itinerary::{Itinerary, Leg, Timing, Totals, Waypoint};
pub use journey::{Journey, Query, route, route_with_spec};
pub use objective::{Criterion, Objective, ObjectiveSpec, SpeedRegime};
