use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Error, model::Mode};

/// Network construction and routing parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Radius in metres within which coordinates collapse into one node
    pub merge_tolerance_m: f64,
    /// Query points farther than this from their nearest node are walked
    pub snap_epsilon_m: f64,
    pub walk_speed_kmh: f64,
    /// Vehicle speed used by the schedule-aware cheapest objective
    pub vehicle_speed_kmh: f64,
    /// Slower vehicle speed used by the fastest-arrival objective
    pub reference_speed_kmh: f64,
    pub rates: ModeRates,
    pub schedules: Schedules,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            merge_tolerance_m: 10.0,
            snap_epsilon_m: 0.1,
            walk_speed_kmh: 5.0,
            vehicle_speed_kmh: 30.0,
            reference_speed_kmh: 10.0,
            rates: ModeRates::default(),
            schedules: Schedules::default(),
        }
    }
}

/// Money per kilometre for each mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeRates {
    pub walk: f64,
    pub car: f64,
    pub metro: f64,
    pub bus_a: f64,
    pub bus_b: f64,
}

impl Default for ModeRates {
    fn default() -> Self {
        Self {
            walk: 0.0,
            car: 20.0,
            metro: 5.0,
            bus_a: 7.0,
            bus_b: 10.0,
        }
    }
}

impl ModeRates {
    pub fn rate(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Walk => self.walk,
            Mode::Car => self.car,
            Mode::Metro => self.metro,
            Mode::BusA => self.bus_a,
            Mode::BusB => self.bus_b,
        }
    }
}

/// Headway and service window of one scheduled mode, in minutes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSchedule {
    pub headway_min: u32,
    pub first_departure_min: u32,
    pub last_departure_min: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schedules {
    pub metro: ServiceSchedule,
    pub bus_a: ServiceSchedule,
    pub bus_b: ServiceSchedule,
}

impl Default for Schedules {
    fn default() -> Self {
        Self {
            metro: ServiceSchedule {
                headway_min: 10,
                first_departure_min: 6 * 60,
                last_departure_min: 23 * 60,
            },
            bus_a: ServiceSchedule {
                headway_min: 20,
                first_departure_min: 7 * 60,
                last_departure_min: 22 * 60,
            },
            bus_b: ServiceSchedule {
                headway_min: 15,
                first_departure_min: 6 * 60,
                last_departure_min: 22 * 60,
            },
        }
    }
}

impl Schedules {
    /// Schedule of `mode`, `None` for modes that run on demand
    pub fn for_mode(&self, mode: Mode) -> Option<&ServiceSchedule> {
        match mode {
            Mode::Metro => Some(&self.metro),
            Mode::BusA => Some(&self.bus_a),
            Mode::BusB => Some(&self.bus_b),
            Mode::Walk | Mode::Car => None,
        }
    }
}

impl NetworkConfig {
    /// Parses and validates a TOML document. Missing keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML or fails validation
    pub fn from_toml_str(source: &str) -> Result<Self, Error> {
        let config: NetworkConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("Failed to open config '{}': {}", path.display(), e),
            )
        })?;
        Self::from_toml_str(&source)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] naming the first offending field
    pub fn validate(&self) -> Result<(), Error> {
        let non_negative = [
            ("merge_tolerance_m", self.merge_tolerance_m),
            ("snap_epsilon_m", self.snap_epsilon_m),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::InvalidData(format!("{field} must be >= 0, got {value}")));
            }
        }

        let speeds = [
            ("walk_speed_kmh", self.walk_speed_kmh),
            ("vehicle_speed_kmh", self.vehicle_speed_kmh),
            ("reference_speed_kmh", self.reference_speed_kmh),
        ];
        for (field, value) in speeds {
            if !(value.is_finite() && value > 0.0) {
                return Err(Error::InvalidData(format!("{field} must be > 0, got {value}")));
            }
        }

        for mode in Mode::ALL {
            let rate = self.rates.rate(mode);
            if !(rate.is_finite() && rate >= 0.0) {
                return Err(Error::InvalidData(format!("rate for {mode} must be >= 0")));
            }
            if let Some(schedule) = self.schedules.for_mode(mode) {
                if schedule.headway_min == 0 {
                    return Err(Error::InvalidData(format!("headway for {mode} must be > 0")));
                }
                if schedule.first_departure_min > schedule.last_departure_min
                    || schedule.last_departure_min >= 24 * 60
                {
                    return Err(Error::InvalidData(format!(
                        "service window for {mode} must satisfy first <= last < 1440"
                    )));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        NetworkConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = NetworkConfig::from_toml_str(
            r#"
            merge_tolerance_m = 25.0

            [rates]
            car = 30.0

            [schedules.metro]
            headway_min = 8
            first_departure_min = 420
            last_departure_min = 1260
            "#,
        )
        .unwrap();

        assert_eq!(config.merge_tolerance_m, 25.0);
        assert_eq!(config.rates.car, 30.0);
        assert_eq!(config.rates.metro, 5.0);
        assert_eq!(config.schedules.metro.headway_min, 8);
        assert_eq!(config.schedules.bus_a, Schedules::default().bus_a);
    }

    #[test]
    fn rejects_zero_headway_and_bad_speed() {
        let err = NetworkConfig::from_toml_str(
            "[schedules.bus_b]\nheadway_min = 0\nfirst_departure_min = 0\nlast_departure_min = 10\n",
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));

        let config = NetworkConfig {
            walk_speed_kmh: 0.0,
            ..NetworkConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn unscheduled_modes_have_no_schedule() {
        let schedules = Schedules::default();
        assert!(schedules.for_mode(Mode::Car).is_none());
        assert!(schedules.for_mode(Mode::Walk).is_none());
        assert!(schedules.for_mode(Mode::BusA).is_some());
    }
}
