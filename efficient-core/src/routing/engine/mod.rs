//! Label-setting shortest-path search shared by every objective

mod label_setting;
mod state;

pub use label_setting::{Label, SearchOutcome, TraceStep, label_setting_search};
pub(crate) use label_setting::travel_time;
