//! Headway-based boarding model for scheduled modes

use crate::{
    Time,
    loading::{Schedules, ServiceSchedule},
    model::Mode,
};

const SECONDS_PER_MINUTE: Time = 60;

/// Answers how long a traveller ready at a given clock waits for the next
/// departure of a mode. Unscheduled modes never wait.
#[derive(Debug, Clone)]
pub struct ScheduleModel {
    schedules: Schedules,
}

impl ScheduleModel {
    pub fn new(schedules: Schedules) -> Self {
        Self { schedules }
    }

    pub fn schedule(&self, mode: Mode) -> Option<&ServiceSchedule> {
        self.schedules.for_mode(mode)
    }

    /// Seconds until the next departure of `mode` at or after `clock`
    /// (seconds since midnight).
    ///
    /// Returns `None` before the first departure minute or when the next
    /// departure would leave after the last one of the day. There is no
    /// rollover into the next day.
    pub fn waiting_time(&self, clock: Time, mode: Mode) -> Option<Time> {
        let Some(schedule) = self.schedules.for_mode(mode) else {
            return Some(0);
        };

        if clock / SECONDS_PER_MINUTE < schedule.first_departure_min {
            return None;
        }

        let headway = schedule.headway_min * SECONDS_PER_MINUTE;
        let since_first = clock - schedule.first_departure_min * SECONDS_PER_MINUTE;
        let wait = (headway - since_first % headway) % headway;

        let boarding = clock.checked_add(wait)?;
        (boarding <= schedule.last_departure_min * SECONDS_PER_MINUTE).then_some(wait)
    }
}
