use std::fmt;

use serde::{Deserialize, Serialize};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A month on the in-game calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDate {
    /// Calendar year.
    pub year: i32,
    /// 1..=12.
    pub month: u32,
}

impl fmt::Display for GameDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = MONTH_NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or("???");
        write!(f, "{name} {}", self.year)
    }
}

/// Maps the month counter in the game state onto calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    start_year: i32,
    start_month: u32,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(2077, 1)
    }
}

impl Calendar {
    /// A calendar whose month counter 0 falls on `start_month` of `start_year`.
    pub fn new(start_year: i32, start_month: u32) -> Self {
        Self {
            start_year,
            start_month: start_month.clamp(1, 12),
        }
    }

    /// The date for a month counter.
    pub fn date(&self, month: u32) -> GameDate {
        let abs = i64::from(self.start_year) * 12 + i64::from(self.start_month - 1) + i64::from(month);
        GameDate {
            year: abs.div_euclid(12) as i32,
            month: abs.rem_euclid(12) as u32 + 1,
        }
    }
}
