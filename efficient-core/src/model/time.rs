//! Clock values exchanged with callers

use std::fmt;

use crate::{Error, Time};

pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// Departure instant given as whole minutes since midnight (0..=1439)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// # Errors
    ///
    /// Returns an error when `minutes` is not within a single day
    pub fn from_minutes(minutes: u16) -> Result<Self, Error> {
        if minutes < MINUTES_PER_DAY {
            Ok(TimeOfDay(minutes))
        } else {
            Err(Error::InvalidDepartureTime(format!(
                "{minutes} is outside 0..{MINUTES_PER_DAY}"
            )))
        }
    }

    /// # Errors
    ///
    /// Returns an error for hours above 23 or minutes above 59
    pub fn from_hm(hours: u16, minutes: u16) -> Result<Self, Error> {
        if hours > 23 || minutes > 59 {
            return Err(Error::InvalidDepartureTime(format!("{hours}:{minutes:02}")));
        }
        Ok(TimeOfDay(hours * 60 + minutes))
    }

    pub fn minutes(self) -> u16 {
        self.0
    }

    /// Seconds since midnight, the engine's clock unit
    pub fn as_time(self) -> Time {
        Time::from(self.0) * 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_minutes_past_midnight() {
        assert!(TimeOfDay::from_minutes(1439).is_ok());
        assert!(matches!(
            TimeOfDay::from_minutes(1440),
            Err(Error::InvalidDepartureTime(_))
        ));
        assert!(TimeOfDay::from_hm(24, 0).is_err());
    }

    #[test]
    fn converts_to_engine_seconds() {
        let t = TimeOfDay::from_hm(8, 5).unwrap();
        assert_eq!(t.minutes(), 485);
        assert_eq!(t.as_time(), 485 * 60);
        assert_eq!(t.to_string(), "08:05");
    }
}
