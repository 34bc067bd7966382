//! Refresh phase machine and the pure countdown math the UI ticks against.
//!
//! The monitor loop owns the timers; everything here is side-effect-free
//! so the 1-second countdown tick and the resume-after-restart logic are
//! directly testable.

use chrono::{DateTime, Local, TimeDelta, Utc};

/// Default interval between refresh cycles.
pub const REFRESH_INTERVAL: std::time::Duration = std::time::Duration::from_secs(15 * 60);

/// Countdown display when no refresh is armed.
pub const COUNTDOWN_PLACEHOLDER: &str = "--:--";

/// Refresh lifecycle as observed by consumers.
///
/// `Failed` is sticky: the monitor arms no timer until a manual trigger,
/// and the UI swaps the panel area for a single error card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Counting,
    Fetching,
    Failed,
}

/// Time left until `next_refresh_at`, clamped at zero. `None` when no
/// refresh is armed.
pub fn remaining(
    next_refresh_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Option<TimeDelta> {
    next_refresh_at.map(|at| (at - now).max(TimeDelta::zero()))
}

/// `mm:ss` rendering of a countdown duration.
pub fn format_countdown(remaining: TimeDelta) -> String {
    let total = remaining.num_seconds().max(0);
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Countdown display for the dashboard: `mm:ss`, or the placeholder when
/// no refresh is armed.
pub fn countdown_display(next_refresh_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    remaining(next_refresh_at, now)
        .map_or_else(|| COUNTDOWN_PLACEHOLDER.to_owned(), format_countdown)
}

/// Wall-clock rendering of an absolute instant, in local time.
pub fn wall_clock(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Local timestamp in the backend's `checked_at` format. Stamped onto
/// client-side ERRO records.
pub fn local_timestamp(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Full local date-time rendering for the "last updated" line.
pub fn last_updated_display(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_formats_mm_ss() {
        assert_eq!(format_countdown(TimeDelta::zero()), "00:00");
        assert_eq!(format_countdown(TimeDelta::seconds(61)), "01:01");
        assert_eq!(format_countdown(TimeDelta::minutes(15)), "15:00");
        // negative clamps to zero
        assert_eq!(format_countdown(TimeDelta::seconds(-30)), "00:00");
    }

    #[test]
    fn remaining_resumes_partial_intervals() {
        // Reload 5 minutes into a 15-minute interval: 10 minutes remain.
        let now = Utc::now();
        let armed_at = now - TimeDelta::minutes(5) + TimeDelta::minutes(15);
        let left = remaining(Some(armed_at), now).expect("armed");
        assert_eq!(left.num_minutes(), 10);
        assert_eq!(format_countdown(left), "10:00");
    }

    #[test]
    fn remaining_clamps_past_instants_to_zero() {
        let now = Utc::now();
        let left = remaining(Some(now - TimeDelta::minutes(3)), now).expect("armed");
        assert_eq!(left, TimeDelta::zero());
    }

    #[test]
    fn countdown_display_placeholder_when_unarmed() {
        let now = Utc::now();
        assert_eq!(countdown_display(None, now), COUNTDOWN_PLACEHOLDER);
        assert_eq!(
            countdown_display(Some(now + TimeDelta::seconds(90)), now),
            "01:30"
        );
    }

    #[test]
    fn local_timestamp_matches_backend_format() {
        let stamp = local_timestamp(Local::now());
        // "YYYY-MM-DD HH:MM:SS"
        assert_eq!(stamp.len(), 19);
        assert_eq!(stamp.as_bytes()[4], b'-');
        assert_eq!(stamp.as_bytes()[10], b' ');
        assert_eq!(stamp.as_bytes()[13], b':');
    }
}
