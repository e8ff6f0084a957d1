//! Comprehensive validation of a candidate window.

use chrono::NaiveDate;
use tracing::trace;

use super::anchors::Anchor;
use super::{DateClassifier, DatePolicy};

/// Gregorian rule: divisible by 4, and by 400 whenever divisible by 100.
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Checks one anchor's window against the group flags and the calendar.
///
/// Requirements, in order: enough groups (two with a month word, three
/// without); no zero group; at most one group over 31; exactly one
/// four-digit group, which becomes the year. Month and day then resolve
/// either from the month word or from the numeric disambiguation rules,
/// and finally pass the 30-day-month, February and leap-year checks.
pub(super) fn validate(cls: &DateClassifier, anchor: &Anchor) -> Option<NaiveDate> {
    let groups = &cls.groups;
    let n = groups.len();
    if n < 2 {
        return None;
    }
    let need = if anchor.month.is_some() { 2 } else { 3 };
    let start = anchor.start;
    let end = start + need;
    if end > n {
        return None;
    }

    if (start..end).any(|i| groups.is_zero_group(i)) {
        return None;
    }
    if (start..end).filter(|&i| groups.is_over31(i)).count() > 1 {
        return None;
    }
    let fours: Vec<usize> = (start..end).filter(|&i| groups.is_four_digit(i)).collect();
    let [yeardex] = fours[..] else {
        return None;
    };
    let year = groups.value(yeardex) as i32;

    let (month, day) = match &anchor.month {
        Some(mw) => {
            let daydex = (start..end).find(|&i| !groups.is_over31(i))?;
            (mw.number, groups.value(daydex))
        }
        None => resolve_numeric(cls, start, yeardex)?,
    };
    let day = u32::try_from(day).ok()?;

    if day > 30 && matches!(month, 4 | 6 | 9 | 11) {
        return None;
    }
    if month == 2 {
        if day > 29 {
            return None;
        }
        if day == 29 && !is_leap_year(year) {
            return None;
        }
    }
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    trace!(%date, "validated window");
    Some(date)
}

/// Month/day assignment for a three-group numeric window.
fn resolve_numeric(cls: &DateClassifier, start: usize, yeardex: usize) -> Option<(u32, i64)> {
    let groups = &cls.groups;
    let window = start..start + 3;
    let month_fits: Vec<usize> = window.clone().filter(|&i| !groups.is_over12(i)).collect();
    if month_fits.is_empty() {
        return None;
    }
    let day_only: Vec<usize> = window
        .filter(|&i| groups.is_over12(i) && !groups.is_over31(i))
        .collect();
    if day_only.len() > 1 {
        return None;
    }
    if let ([m], [d]) = (&month_fits[..], &day_only[..]) {
        return Some((u32::try_from(groups.value(*m)).ok()?, groups.value(*d)));
    }

    // Both non-year groups fit as months; position decides.
    let (month_at, day_at) = if yeardex == start {
        (start + 1, start + 2)
    } else {
        match cls.policy {
            DatePolicy::MonthFirst => (start, start + 1),
            DatePolicy::DayFirst => (start + 1, start),
        }
    };
    Some((u32::try_from(groups.value(month_at)).ok()?, groups.value(day_at)))
}
