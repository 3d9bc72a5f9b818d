//! Dashboard window and list-size configuration.

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Sizes and windows used by the dashboard and notification menu.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Trailing window, in days, of the revenue chart.
    #[serde(default = "default_trailing_days")]
    pub trailing_days: u32,
    /// How many varieties the top-varieties chart shows.
    #[serde(default = "default_top_varieties")]
    pub top_varieties: usize,
    /// How many notifications the notification menu fetches.
    #[serde(default = "default_notification_limit")]
    pub notification_limit: usize,
    /// How many notifications the recent-activity panel shows.
    #[serde(default = "default_recent_activity")]
    pub recent_activity: usize,
    /// Offset from UTC, in minutes, of the business's calendar day.
    /// Unset means the host's local offset.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            trailing_days: default_trailing_days(),
            top_varieties: default_top_varieties(),
            notification_limit: default_notification_limit(),
            recent_activity: default_recent_activity(),
            utc_offset_minutes: None,
        }
    }
}

impl DashboardConfig {
    /// Offset that decides which calendar day a timestamp falls on.
    ///
    /// Out-of-range configured offsets fall back to UTC.
    pub fn calendar_offset(&self) -> FixedOffset {
        match self.utc_offset_minutes {
            Some(minutes) => minutes
                .checked_mul(60)
                .and_then(FixedOffset::east_opt)
                .unwrap_or_else(|| Utc.fix()),
            None => Local::now().offset().fix(),
        }
    }

    /// Calendar day of `at` in the business's offset.
    pub fn calendar_day(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.calendar_offset()).date_naive()
    }

    /// Today's calendar day in the business's offset.
    pub fn today(&self) -> NaiveDate {
        self.calendar_day(Utc::now())
    }
}

fn default_trailing_days() -> u32 {
    30
}

fn default_top_varieties() -> usize {
    5
}

fn default_notification_limit() -> usize {
    20
}

fn default_recent_activity() -> usize {
    8
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn litoral() -> DashboardConfig {
        DashboardConfig {
            utc_offset_minutes: Some(-180),
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn test_evening_local_time_stays_on_local_day() {
        // 23:30 on March 15 at UTC-3.
        let at = Utc.with_ymd_and_hms(2025, 3, 16, 2, 30, 0).unwrap();
        assert_eq!(
            litoral().calendar_day(at),
            NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()
        );
        assert_eq!(litoral().calendar_offset().local_minus_utc(), -3 * 3600);
    }

    #[test]
    fn test_out_of_range_offset_falls_back_to_utc() {
        let config = DashboardConfig {
            utc_offset_minutes: Some(25 * 60),
            ..DashboardConfig::default()
        };
        assert_eq!(config.calendar_offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_offset_from_toml() {
        let config = crate::config::AppConfig::from_toml(
            "[dashboard]\nutc_offset_minutes = -180\ntrailing_days = 7\n",
        )
        .unwrap();
        assert_eq!(config.dashboard.utc_offset_minutes, Some(-180));
        assert_eq!(config.dashboard.trailing_days, 7);
        assert_eq!(config.dashboard.top_varieties, 5);
    }
}
