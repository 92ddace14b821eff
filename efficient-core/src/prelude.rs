pub use crate::Error;
pub use crate::Time;

// Network construction
pub use crate::loading::{
    FeedKind, FeedSource, IngestRecord, LoadSummary, NetworkBuilder, NetworkConfig, load_network,
};
pub use crate::model::{Mode, ModeSet, Network, TimeOfDay};

// Queries
pub use crate::routing::{Itinerary, Journey, Leg, Objective, Query, route};
