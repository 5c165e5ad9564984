// Overdue calculator - calendar-day due date comparisons
//
// Due dates are textual and denote a calendar day, not an instant. Every
// operation here is a pure function of its inputs: the reference moment is
// always passed in, and unusable input degrades to the negative answer
// (false / None / "") instead of an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

/// Normalizes a due-date string to a calendar day in the zone of `now`.
///
/// A plain `YYYY-MM-DD` string is the calendar day as written. A timestamp
/// carrying an offset (RFC 3339) is resolved to an instant first, and the
/// day is read off in `now`'s zone. An offset-less datetime is already
/// local, so its date part is kept. Anything else, including impossible
/// dates like `2025-02-30`, is `None`.
pub fn due_day<Tz: TimeZone>(raw: &str, now: &DateTime<Tz>) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(day);
    }

    // The offset only resolves the instant; the calendar fields come from
    // the reference zone
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Some(instant.with_timezone(&now.timezone()).date_naive());
    }

    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }

    None
}

/// True when the due day falls strictly before `now`'s calendar day.
///
/// Absent, empty, or unparsable due dates are never overdue; an item due
/// today is not overdue. Completion state is not consulted here, callers
/// gate on it.
pub fn is_overdue<Tz: TimeZone>(due_date: Option<&str>, now: &DateTime<Tz>) -> bool {
    match due_date.and_then(|raw| due_day(raw, now)) {
        Some(due) => due < now.date_naive(),
        None => false,
    }
}

/// Whole days between the due day and `now`'s calendar day, defined only
/// when the item is overdue (`None` otherwise). Always at least 1.
pub fn days_overdue<Tz: TimeZone>(due_date: Option<&str>, now: &DateTime<Tz>) -> Option<i64> {
    let due = due_day(due_date?, now)?;
    let today = now.date_naive();
    if due >= today {
        return None;
    }

    // Both sides are normalized calendar days, so the subtraction is exact
    // whole days; the floor of 1 is kept as documented behavior
    Some((today - due).num_days().max(1))
}

/// Renders a day count as display text: `"1 day overdue"`, `"5 days overdue"`.
/// Absent, zero, and negative counts render as empty text.
pub fn format_days_overdue(days: Option<i64>) -> String {
    match days {
        Some(1) => "1 day overdue".to_string(),
        Some(n) if n >= 2 => format!("{n} days overdue"),
        _ => String::new(),
    }
}
