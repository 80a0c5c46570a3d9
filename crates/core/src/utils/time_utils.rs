//! Trading session windows.
//!
//! A refresh outside the session windows fetches prices that cannot have
//! moved, so the scheduler gates market-data ticks on these windows. Alert
//! evaluation is not gated; it runs on its own cadence around the clock.

use chrono::{DateTime, Datelike, Local, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

/// One contiguous in-session time range, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl SessionWindow {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    fn contains(&self, time: NaiveTime) -> bool {
        time >= self.start && time <= self.end
    }
}

/// The set of windows during which market-data refresh is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingSession {
    pub windows: Vec<SessionWindow>,
    /// Skip Saturdays and Sundays entirely.
    pub weekdays_only: bool,
}

impl Default for TradingSession {
    /// Morning and afternoon sessions of the mainland exchanges:
    /// 09:30-11:30 and 13:00-15:00, weekdays.
    fn default() -> Self {
        let window = |sh, sm, eh, em| {
            SessionWindow::new(
                NaiveTime::from_hms_opt(sh, sm, 0).expect("valid session time"),
                NaiveTime::from_hms_opt(eh, em, 0).expect("valid session time"),
            )
        };
        Self {
            windows: vec![window(9, 30, 11, 30), window(13, 0, 15, 0)],
            weekdays_only: true,
        }
    }
}

impl TradingSession {
    /// Is the given instant inside a session window?
    pub fn contains(&self, instant: DateTime<Local>) -> bool {
        if self.weekdays_only
            && matches!(instant.weekday(), Weekday::Sat | Weekday::Sun)
        {
            return false;
        }
        let time = instant.time();
        self.windows.iter().any(|window| window.contains(time))
    }

    /// Is the market open right now?
    pub fn is_open_now(&self) -> bool {
        self.contains(Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(year, month, day, hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn weekday_session_times_are_open() {
        let session = TradingSession::default();
        // 2024-06-03 is a Monday.
        assert!(session.contains(at(2024, 6, 3, 9, 30)));
        assert!(session.contains(at(2024, 6, 3, 10, 45)));
        assert!(session.contains(at(2024, 6, 3, 14, 59)));
    }

    #[test]
    fn lunch_break_and_evening_are_closed() {
        let session = TradingSession::default();
        assert!(!session.contains(at(2024, 6, 3, 12, 0)));
        assert!(!session.contains(at(2024, 6, 3, 20, 0)));
        assert!(!session.contains(at(2024, 6, 3, 9, 0)));
    }

    #[test]
    fn weekends_are_closed_even_at_session_times() {
        let session = TradingSession::default();
        // 2024-06-01 is a Saturday.
        assert!(!session.contains(at(2024, 6, 1, 10, 0)));
    }

    #[test]
    fn weekend_gate_can_be_disabled() {
        let session = TradingSession {
            weekdays_only: false,
            ..TradingSession::default()
        };
        assert!(session.contains(at(2024, 6, 1, 10, 0)));
    }
}
