use std::path::PathBuf;

use chrono::{NaiveTime, Timelike};
use clap::Parser;
use efficient_core::{
    Error,
    loading::{FeedKind, FeedSource},
    model::TimeOfDay,
    routing::Objective,
};
use geo::Point;

/// Multi-modal route planner over road, metro and bus networks
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Road polylines CSV
    #[arg(long)]
    pub roads: PathBuf,

    /// Metro route CSV
    #[arg(long)]
    pub metro: Option<PathBuf>,

    /// Bus-A route CSV
    #[arg(long)]
    pub bus_a: Option<PathBuf>,

    /// Bus-B route CSV
    #[arg(long)]
    pub bus_b: Option<PathBuf>,

    /// TOML file overriding rates, speeds, schedules and tolerances
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Origin as "lat,lon"
    #[arg(long, value_parser = parse_lat_lon, allow_hyphen_values = true)]
    pub from: Point<f64>,

    /// Destination as "lat,lon"
    #[arg(long, value_parser = parse_lat_lon, allow_hyphen_values = true)]
    pub to: Point<f64>,

    /// shortest, cheapest-car-metro, cheapest, cheapest-scheduled or fastest
    #[arg(long, default_value = "cheapest")]
    pub objective: Objective,

    /// Departure time, e.g. "9:30 AM" or "17:45"
    #[arg(long, value_parser = parse_departure)]
    pub depart: Option<TimeOfDay>,

    /// Write the journey as GeoJSON to this path
    #[arg(long)]
    pub geojson: Option<PathBuf>,
}

impl Args {
    pub fn feeds(&self) -> Vec<FeedSource> {
        let optional = [
            (&self.metro, FeedKind::Metro),
            (&self.bus_a, FeedKind::BusA),
            (&self.bus_b, FeedKind::BusB),
        ];
        std::iter::once(FeedSource::new(&self.roads, FeedKind::Roads))
            .chain(
                optional
                    .into_iter()
                    .filter_map(|(path, kind)| path.as_ref().map(|p| FeedSource::new(p, kind))),
            )
            .collect()
    }
}

fn parse_lat_lon(value: &str) -> Result<Point<f64>, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected 'lat,lon', got '{value}'"))?;
    let lat: f64 = lat.trim().parse().map_err(|e| format!("bad latitude: {e}"))?;
    let lon: f64 = lon.trim().parse().map_err(|e| format!("bad longitude: {e}"))?;
    Ok(Point::new(lon, lat))
}

/// Accepts 12-hour ("5:43 PM") and 24-hour ("17:43") clock text
pub fn parse_departure(value: &str) -> Result<TimeOfDay, Error> {
    let text = value.trim().to_uppercase();
    let time = ["%I:%M %p", "%I:%M%p", "%H:%M"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&text, format).ok())
        .ok_or_else(|| Error::InvalidDepartureTime(value.to_string()))?;

    #[allow(clippy::cast_possible_truncation)]
    TimeOfDay::from_hm(time.hour() as u16, time.minute() as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_clock_styles() {
        assert_eq!(parse_departure("9:30 AM").unwrap().minutes(), 9 * 60 + 30);
        assert_eq!(parse_departure("5:43 pm").unwrap().minutes(), 17 * 60 + 43);
        assert_eq!(parse_departure("12:05 AM").unwrap().minutes(), 5);
        assert_eq!(parse_departure("08:15").unwrap().minutes(), 8 * 60 + 15);
        assert!(parse_departure("25:00").is_err());
        assert!(parse_departure("noon").is_err());
    }

    #[test]
    fn coordinates_are_lat_then_lon() {
        let point = parse_lat_lon("23.7806, 90.4070").unwrap();
        assert_eq!(point.x(), 90.4070);
        assert_eq!(point.y(), 23.7806);
        assert!(parse_lat_lon("23.78").is_err());
    }

    #[test]
    fn optional_feeds_follow_roads() {
        let args = Args::parse_from([
            "efficient",
            "--roads",
            "roads.csv",
            "--bus-b",
            "uttara.csv",
            "--from",
            "23.78,90.40",
            "--to",
            "23.79,90.41",
            "--objective",
            "fastest",
            "--depart",
            "9:30 AM",
        ]);
        let kinds: Vec<FeedKind> = args.feeds().iter().map(|f| f.kind).collect();
        assert_eq!(kinds, vec![FeedKind::Roads, FeedKind::BusB]);
        assert_eq!(args.objective, Objective::FastestArrival);
        assert_eq!(args.depart.map(TimeOfDay::minutes), Some(570));
    }
}
