use crate::models::CalendarWeek;
use chrono::{DateTime, Utc};

/// End date of a regular-season week, the cutoff for "stats through week N"
pub fn week_cutoff(calendar: &[CalendarWeek], week: i32) -> Option<DateTime<Utc>> {
    calendar
        .iter()
        .find(|w| w.week == week && w.season_type == "regular")
        .map(|w| w.end_date)
}

/// The week whose window contains `now`
///
/// Clamps to week 1 before the season starts and to the final week after
/// it ends; an empty calendar also yields week 1.
pub fn current_week(calendar: &[CalendarWeek], now: DateTime<Utc>) -> i32 {
    let Some(first) = calendar.first() else {
        return 1;
    };

    if let Some(week) = calendar
        .iter()
        .find(|w| now >= w.start_date && now <= w.end_date)
    {
        return week.week;
    }

    if now < first.start_date {
        return 1;
    }

    match calendar.last() {
        Some(last) if now > last.end_date => last.week,
        _ => 1,
    }
}

/// Whether the week's first kickoff has happened
pub fn is_week_started(calendar: &[CalendarWeek], week: i32, now: DateTime<Utc>) -> bool {
    calendar
        .iter()
        .find(|w| w.week == week && w.season_type == "regular")
        .map(|w| now >= w.first_game_start)
        .unwrap_or(false)
}
