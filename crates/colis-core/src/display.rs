// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Display helpers

use crate::range::{RangeSelector, Window};
use chrono::NaiveDate;

const DATE_FORMAT: &str = "%d/%m/%Y";

/// Up to two uppercase initials for an avatar, "K" for an empty name
pub fn initials(full_name: &str) -> String {
    let initials: String = full_name
        .split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .take(2)
        .collect();

    if initials.is_empty() {
        "K".to_string()
    } else {
        initials
    }
}

/// Heading for the range picker.
/// Single days relative to `today` read "Aujourd'hui" or "Hier".
pub fn range_label(start: NaiveDate, end: NaiveDate, is_day: bool, today: NaiveDate) -> String {
    let single_day = is_day || start == end;
    if single_day && start == today {
        return "Aujourd'hui".to_string();
    }
    if single_day && Some(start) == today.pred_opt() {
        return "Hier".to_string();
    }

    if is_day {
        format!("Le: {}", start.format(DATE_FORMAT))
    } else {
        format!(
            "Du: {} au {}",
            start.format(DATE_FORMAT),
            end.format(DATE_FORMAT)
        )
    }
}

/// Heading for a selector resolved around `anchor`
pub fn selector_label(range: RangeSelector, anchor: NaiveDate, today: NaiveDate) -> String {
    match range.window(anchor) {
        Window::Unbounded => "Toutes les dates".to_string(),
        Window::Empty => "Aucune date".to_string(),
        Window::Between { start, end } => range_label(
            start.date(),
            end.date(),
            range == RangeSelector::Day,
            today,
        ),
    }
}
