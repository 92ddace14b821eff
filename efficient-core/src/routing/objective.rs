//! Objective descriptors driving the label-setting search

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error,
    loading::NetworkConfig,
    model::{Mode, ModeSet},
};

/// Quantity a search minimises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    /// Cumulative edge length
    Distance,
    /// Cumulative distance times mode rate
    Cost,
    /// Clock time on arrival
    Arrival,
}

/// Vehicle speed applied to edges when the clock is tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpeedRegime {
    Baseline,
    Reference,
}

impl SpeedRegime {
    pub fn speed_kmh(self, config: &NetworkConfig) -> f64 {
        match self {
            SpeedRegime::Baseline => config.vehicle_speed_kmh,
            SpeedRegime::Reference => config.reference_speed_kmh,
        }
    }
}

/// Everything the engine needs to know about an objective.
///
/// `clock` switches on arrival-time tracking and schedule gating at the given
/// speed regime; it must be set when the criterion is [`Criterion::Arrival`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectiveSpec {
    pub permitted: ModeSet,
    pub criterion: Criterion,
    pub clock: Option<SpeedRegime>,
}

impl ObjectiveSpec {
    pub fn is_time_aware(&self) -> bool {
        self.clock.is_some()
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.criterion == Criterion::Arrival && self.clock.is_none() {
            return Err(Error::InvalidData(
                "arrival objective requires a speed regime".to_string(),
            ));
        }
        Ok(())
    }
}

/// The built-in query variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Objective {
    /// Shortest car route by distance
    ShortestDistance,
    /// Cheapest route over car and metro
    CheapestCarMetro,
    /// Cheapest route over every motorized mode
    Cheapest,
    /// Cheapest route over every motorized mode, limited by service hours
    CheapestScheduled,
    /// Earliest arrival over every motorized mode
    FastestArrival,
}

impl Objective {
    pub const ALL: [Objective; 5] = [
        Objective::ShortestDistance,
        Objective::CheapestCarMetro,
        Objective::Cheapest,
        Objective::CheapestScheduled,
        Objective::FastestArrival,
    ];

    pub const fn spec(self) -> ObjectiveSpec {
        match self {
            Objective::ShortestDistance => ObjectiveSpec {
                permitted: ModeSet::of(&[Mode::Car]),
                criterion: Criterion::Distance,
                clock: None,
            },
            Objective::CheapestCarMetro => ObjectiveSpec {
                permitted: ModeSet::of(&[Mode::Car, Mode::Metro]),
                criterion: Criterion::Cost,
                clock: None,
            },
            Objective::Cheapest => ObjectiveSpec {
                permitted: ModeSet::motorized(),
                criterion: Criterion::Cost,
                clock: None,
            },
            Objective::CheapestScheduled => ObjectiveSpec {
                permitted: ModeSet::motorized(),
                criterion: Criterion::Cost,
                clock: Some(SpeedRegime::Baseline),
            },
            Objective::FastestArrival => ObjectiveSpec {
                permitted: ModeSet::motorized(),
                criterion: Criterion::Arrival,
                clock: Some(SpeedRegime::Reference),
            },
        }
    }

    pub fn is_time_aware(self) -> bool {
        self.spec().is_time_aware()
    }

    pub const fn name(self) -> &'static str {
        match self {
            Objective::ShortestDistance => "shortest",
            Objective::CheapestCarMetro => "cheapest-car-metro",
            Objective::Cheapest => "cheapest",
            Objective::CheapestScheduled => "cheapest-scheduled",
            Objective::FastestArrival => "fastest",
        }
    }
}

impl fmt::Display for Objective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Objective {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Objective::ALL
            .into_iter()
            .find(|objective| objective.name() == s)
            .ok_or_else(|| Error::InvalidData(format!("unknown objective '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_schedule_objectives_track_time() {
        let time_aware: Vec<_> = Objective::ALL
            .into_iter()
            .filter(|o| o.is_time_aware())
            .collect();
        assert_eq!(
            time_aware,
            vec![Objective::CheapestScheduled, Objective::FastestArrival]
        );
        assert_eq!(
            Objective::FastestArrival.spec().clock,
            Some(SpeedRegime::Reference)
        );
    }

    #[test]
    fn shortest_is_car_only() {
        let spec = Objective::ShortestDistance.spec();
        assert!(spec.permitted.contains(Mode::Car));
        assert!(!spec.permitted.contains(Mode::Metro));
        assert!(!Objective::CheapestCarMetro.spec().permitted.contains(Mode::BusA));
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for objective in Objective::ALL {
            assert_eq!(objective.name().parse::<Objective>().unwrap(), objective);
        }
        assert!("quickest".parse::<Objective>().is_err());
    }

    #[test]
    fn arrival_without_clock_is_rejected() {
        let spec = ObjectiveSpec {
            permitted: ModeSet::motorized(),
            criterion: Criterion::Arrival,
            clock: None,
        };
        assert!(spec.validate().is_err());
    }
}
