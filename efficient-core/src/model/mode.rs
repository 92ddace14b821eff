//! Travel modes and compact mode sets

use std::fmt;

use serde::{Deserialize, Serialize};

/// Travel mode carried by every edge of the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Walk,
    Metro,
    Car,
    BusA,
    BusB,
}

impl Mode {
    pub const ALL: [Mode; 5] = [Mode::Walk, Mode::Metro, Mode::Car, Mode::BusA, Mode::BusB];

    /// Modes that only depart on a fixed headway inside a service window
    pub const fn is_scheduled(self) -> bool {
        matches!(self, Mode::Metro | Mode::BusA | Mode::BusB)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Mode::Walk => "Walk",
            Mode::Metro => "Metro",
            Mode::Car => "Car",
            Mode::BusA => "Bus-A",
            Mode::BusB => "Bus-B",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Set of permitted modes, stored as a bit mask
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModeSet(u8);

impl ModeSet {
    pub const fn empty() -> Self {
        ModeSet(0)
    }

    pub const fn of(modes: &[Mode]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < modes.len() {
            bits |= modes[i].bit();
            i += 1;
        }
        ModeSet(bits)
    }

    /// Car plus every scheduled service
    pub const fn motorized() -> Self {
        ModeSet::of(&[Mode::Car, Mode::Metro, Mode::BusA, Mode::BusB])
    }

    pub const fn contains(self, mode: Mode) -> bool {
        self.0 & mode.bit() != 0
    }

    #[must_use]
    pub const fn with(self, mode: Mode) -> Self {
        ModeSet(self.0 | mode.bit())
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Mode> {
        Mode::ALL.into_iter().filter(move |mode| self.contains(*mode))
    }
}

impl FromIterator<Mode> for ModeSet {
    fn from_iter<I: IntoIterator<Item = Mode>>(iter: I) -> Self {
        iter.into_iter().fold(ModeSet::empty(), ModeSet::with)
    }
}
