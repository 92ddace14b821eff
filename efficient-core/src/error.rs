use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot locate network: no nodes to snap to")]
    NetworkNotFound,
    #[error("No path found between the selected nodes")]
    NoPathFound,
    #[error("Invalid coordinate: ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },
    #[error("Invalid edge distance: {0}")]
    InvalidDistance(f64),
    #[error("Invalid node index")]
    InvalidNodeIndex,
    #[error("Invalid departure time: {0}")]
    InvalidDepartureTime(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Configuration error: {0}")]
    ConfigError(#[from] toml::de::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}
