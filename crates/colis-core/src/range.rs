// SPDX-License-Identifier: AGPL-3.0
// Colis Core - Date-range filtering
//
// All comparisons are on local wall-clock time. Timestamps are converted
// to local time when they enter the crate, so nothing here sees an offset.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Anything with a creation time
pub trait Timestamped {
    fn created_at(&self) -> NaiveDateTime;
}

/// Preset ranges offered by the range picker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeKind {
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

impl RangeKind {
    pub fn selector(self) -> RangeSelector {
        match self {
            Self::Day => RangeSelector::Day,
            Self::Week => RangeSelector::Week,
            Self::Month => RangeSelector::Month,
            Self::Year => RangeSelector::Year,
            Self::All => RangeSelector::AllTime,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Day => "Jour",
            Self::Week => "Semaine",
            Self::Month => "Mois",
            Self::Year => "Année",
            Self::All => "Tout",
        }
    }
}

impl FromStr for RangeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "all" | "all-time" => Ok(Self::All),
            other => Err(format!("unknown range {:?}", other)),
        }
    }
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSelector {
    AllTime,
    Day,
    /// Monday through Sunday
    Week,
    Month,
    Year,
    /// Caller-supplied inclusive bounds
    Custom {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// Resolved bounds of a selector around an anchor date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Unbounded,
    /// Inclusive on both ends
    Between {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Empty,
}

impl Window {
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        match self {
            Window::Unbounded => true,
            Window::Between { start, end } => *start <= at && at <= *end,
            Window::Empty => false,
        }
    }
}

impl RangeSelector {
    pub fn window(&self, anchor: NaiveDate) -> Window {
        match *self {
            RangeSelector::AllTime => Window::Unbounded,
            RangeSelector::Day => days(anchor, anchor),
            RangeSelector::Week => {
                let back = Days::new(u64::from(anchor.weekday().num_days_from_monday()));
                let monday = anchor.checked_sub_days(back).unwrap_or(NaiveDate::MIN);
                let sunday = monday
                    .checked_add_days(Days::new(6))
                    .unwrap_or(NaiveDate::MAX);
                days(monday, sunday)
            }
            RangeSelector::Month => {
                let first = anchor.with_day(1).unwrap_or(anchor);
                let last = first
                    .checked_add_months(Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(NaiveDate::MAX);
                days(first, last)
            }
            RangeSelector::Year => {
                let first = NaiveDate::from_yo_opt(anchor.year(), 1).unwrap_or(NaiveDate::MIN);
                let last =
                    NaiveDate::from_ymd_opt(anchor.year(), 12, 31).unwrap_or(NaiveDate::MAX);
                days(first, last)
            }
            RangeSelector::Custom { start, end } if start > end => Window::Empty,
            RangeSelector::Custom { start, end } => Window::Between { start, end },
        }
    }
}

/// Entities created inside the range, in their original order
pub fn filter_by_range<T: Timestamped + Clone>(
    entities: &[T],
    range: RangeSelector,
    anchor: NaiveDate,
) -> Vec<T> {
    within(entities, range, anchor).cloned().collect()
}

/// Borrowing form of [`filter_by_range`]
pub fn within<T: Timestamped>(
    entities: &[T],
    range: RangeSelector,
    anchor: NaiveDate,
) -> impl Iterator<Item = &T> + '_ {
    let window = range.window(anchor);
    entities
        .iter()
        .filter(move |entity| window.contains(entity.created_at()))
}

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999 of the given date
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_milli_opt(23, 59, 59, 999)
        .unwrap_or(NaiveDateTime::MAX)
}

fn days(first: NaiveDate, last: NaiveDate) -> Window {
    Window::Between {
        start: start_of_day(first),
        end: end_of_day(last),
    }
}
