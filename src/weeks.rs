//! Week arithmetic shared by forms, grids and the assignment builder
//!
//! Weeks are identified by their Monday. The backend labels them
//! `"Mes_YY:Sem n"`, where `n` counts Mondays within the calendar month.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::{Result, ValidationError};

pub const MONTHS: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

const SHORT_MONTHS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"];

/// Default number of weeks loaded into the grids
pub const DEFAULT_WINDOW_WEEKS: u32 = 52;

/// Number of Monday options offered by the week range picker
pub const RANGE_OPTION_COUNT: usize = 52;

/// Weekday index with Sunday = 0 through Saturday = 6
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// The Monday on or before `date`; Sunday belongs to the week that started six days earlier
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// First Monday an assignment submitted on `today` may start on.
///
/// Thursday, Friday and Saturday keep the current week; Sunday through
/// Wednesday move to the following Monday.
pub fn start_week(today: NaiveDate) -> NaiveDate {
    let this_monday = monday_of(today);
    if weekday_index(today) >= 4 {
        this_monday
    } else {
        this_monday + Duration::days(7)
    }
}

/// `YYYY-MM-DD`, as the backend expects
pub fn format_api_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parses `YYYY-MM-DD`, `YYYY.MM.DD` or `YYYY/MM/DD`
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
        .ok_or_else(|| ValidationError::InvalidDateFormat(input.to_string()).into())
}

/// Normalizes any accepted date format to `YYYY-MM-DD`
pub fn normalize_date(input: &str) -> Result<String> {
    parse_date(input).map(format_api_date)
}

/// `"Mes_YY"` for the month containing `date`
pub fn month_label(date: NaiveDate) -> String {
    format!(
        "{}_{:02}",
        MONTHS[date.month0() as usize],
        date.year().rem_euclid(100)
    )
}

/// 1-based ordinal of `monday` among the Mondays of its month
pub fn week_ordinal(monday: NaiveDate) -> u32 {
    (monday.day() - 1) / 7 + 1
}

/// Label of the week starting at `monday`, e.g. `"Agosto_25:Sem 2"`
pub fn week_label(monday: NaiveDate) -> String {
    format!("{}:Sem {}", month_label(monday), week_ordinal(monday))
}

/// Month part of a week label (text before the colon)
pub fn month_key(label: &str) -> &str {
    label.split(':').next().unwrap_or(label)
}

fn first_monday(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, Weekday::Mon, 1)
}

/// Parses a week label back into its Monday
pub fn label_to_monday(label: &str) -> Result<NaiveDate> {
    let invalid = || ValidationError::InvalidWeekLabel(label.to_string());

    let (month_part, week_part) = label.split_once(':').ok_or_else(invalid)?;
    let (month_name, yy) = month_part.trim().split_once('_').ok_or_else(invalid)?;

    let month = MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(month_name.trim()))
        .ok_or_else(invalid)? as u32
        + 1;

    let yy: i32 = yy.trim().parse().map_err(|_| invalid())?;
    if !(0..100).contains(&yy) {
        return Err(invalid().into());
    }

    let digits: String = week_part.chars().filter(|c| c.is_ascii_digit()).collect();
    let n: u32 = digits.parse().map_err(|_| invalid())?;
    if n == 0 {
        return Err(invalid().into());
    }

    let first = first_monday(2000 + yy, month).ok_or_else(invalid)?;
    let monday = first + Duration::days(7 * (n as i64 - 1));
    if monday.month() != month {
        return Err(invalid().into());
    }

    Ok(monday)
}

/// Consecutive Mondays starting at the week containing `start`
pub fn week_window(start: NaiveDate, weeks: u32) -> Vec<NaiveDate> {
    let first = monday_of(start);
    (0..weeks)
        .map(|i| first + Duration::days(7 * i as i64))
        .collect()
}

pub fn week_labels(start: NaiveDate, weeks: u32) -> Vec<String> {
    week_window(start, weeks).into_iter().map(week_label).collect()
}

/// One selectable week in a date range picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekOption {
    pub monday: NaiveDate,
    pub label: String,
}

impl WeekOption {
    pub fn new(monday: NaiveDate) -> Self {
        Self {
            monday,
            label: range_label(monday),
        }
    }

    pub fn value(&self) -> String {
        format_api_date(self.monday)
    }
}

/// Monday to Friday span, e.g. `"Ene 6 - 10, 2025"` or `"Ene 27 - Feb 1, 2025"`
pub fn range_label(monday: NaiveDate) -> String {
    let friday = monday + Duration::days(4);
    let mon_month = SHORT_MONTHS[monday.month0() as usize];

    if monday.month() == friday.month() {
        format!("{} {} - {}, {}", mon_month, monday.day(), friday.day(), monday.year())
    } else {
        format!(
            "{} {} - {} {}, {}",
            mon_month,
            monday.day(),
            SHORT_MONTHS[friday.month0() as usize],
            friday.day(),
            monday.year()
        )
    }
}

/// Weekly options starting at the current week
pub fn week_range_options(today: NaiveDate, count: usize) -> Vec<WeekOption> {
    week_window(today, count as u32)
        .into_iter()
        .map(WeekOption::new)
        .collect()
}

/// Default selection: the first option through the fourth
pub fn default_range(options: &[WeekOption]) -> Option<(NaiveDate, NaiveDate)> {
    let start = options.first()?;
    let end = options.get(3).or_else(|| options.last())?;
    Some((start.monday, end.monday))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_monday_of() {
        // 2025-08-13 is a Wednesday
        assert_eq!(monday_of(d(2025, 8, 13)), d(2025, 8, 11));
        assert_eq!(monday_of(d(2025, 8, 11)), d(2025, 8, 11));
        assert_eq!(monday_of(d(2025, 8, 17)), d(2025, 8, 11));
    }

    #[test]
    fn test_start_week_all_weekdays() {
        // Week of Monday 2025-08-11
        let this_monday = d(2025, 8, 11);
        let next_monday = d(2025, 8, 18);

        assert_eq!(start_week(d(2025, 8, 11)), next_monday); // Mon
        assert_eq!(start_week(d(2025, 8, 12)), next_monday); // Tue
        assert_eq!(start_week(d(2025, 8, 13)), next_monday); // Wed
        assert_eq!(start_week(d(2025, 8, 14)), this_monday); // Thu
        assert_eq!(start_week(d(2025, 8, 15)), this_monday); // Fri
        assert_eq!(start_week(d(2025, 8, 16)), this_monday); // Sat
        assert_eq!(start_week(d(2025, 8, 17)), next_monday); // Sun
    }

    #[test]
    fn test_start_week_is_always_monday() {
        let mut day = d(2024, 12, 25);
        for _ in 0..21 {
            assert_eq!(start_week(day).weekday(), Weekday::Mon);
            assert!(start_week(day) >= monday_of(day));
            day += Duration::days(1);
        }
    }

    #[test]
    fn test_week_label() {
        assert_eq!(week_label(d(2025, 8, 4)), "Agosto_25:Sem 1");
        assert_eq!(week_label(d(2025, 8, 11)), "Agosto_25:Sem 2");
        assert_eq!(week_label(d(2025, 9, 29)), "Septiembre_25:Sem 5");
        assert_eq!(week_label(d(2026, 1, 5)), "Enero_26:Sem 1");
    }

    #[test]
    fn test_label_to_monday() {
        assert_eq!(label_to_monday("Agosto_25:Sem 2").unwrap(), d(2025, 8, 11));
        assert_eq!(label_to_monday("Septiembre_25:Sem 5").unwrap(), d(2025, 9, 29));
        assert_eq!(label_to_monday("agosto_25:Sem1").unwrap(), d(2025, 8, 4));
    }

    #[test]
    fn test_label_to_monday_rejects_bad_labels() {
        assert!(label_to_monday("Agosto_25:Sem 0").is_err());
        assert!(label_to_monday("Agosto_25:Sem 5").is_err());
        assert!(label_to_monday("August_25:Sem 1").is_err());
        assert!(label_to_monday("Agosto25:Sem 1").is_err());
        assert!(label_to_monday("Agosto_25").is_err());
        assert!(label_to_monday("Agosto_xx:Sem 1").is_err());
        assert!(label_to_monday("Agosto_25:Sem").is_err());
    }

    #[test]
    fn test_label_round_trip() {
        for monday in week_window(d(2025, 1, 1), 104) {
            let label = week_label(monday);
            assert_eq!(label_to_monday(&label).unwrap(), monday, "{}", label);
        }
    }

    #[test]
    fn test_month_key() {
        assert_eq!(month_key("Agosto_25:Sem 2"), "Agosto_25");
        assert_eq!(month_key("Agosto_25"), "Agosto_25");
    }

    #[test]
    fn test_week_window_starts_on_monday() {
        let window = week_window(d(2025, 8, 14), 3);
        assert_eq!(window, vec![d(2025, 8, 11), d(2025, 8, 18), d(2025, 8, 25)]);
        assert!(week_window(d(2025, 8, 14), 0).is_empty());
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2025-09-15").unwrap(), d(2025, 9, 15));
        assert_eq!(parse_date("2025.09.15").unwrap(), d(2025, 9, 15));
        assert_eq!(parse_date("2025/09/15").unwrap(), d(2025, 9, 15));
        assert!(parse_date("15/09/2025").is_err());
        assert_eq!(normalize_date("2025/09/15").unwrap(), "2025-09-15");
    }

    #[test]
    fn test_range_labels() {
        assert_eq!(range_label(d(2025, 1, 6)), "Ene 6 - 10, 2025");
        assert_eq!(range_label(d(2025, 3, 31)), "Mar 31 - Abr 4, 2025");
    }

    #[test]
    fn test_week_range_options_and_default() {
        let options = week_range_options(d(2025, 1, 8), RANGE_OPTION_COUNT);
        assert_eq!(options.len(), 52);
        assert_eq!(options[0].monday, d(2025, 1, 6));
        assert_eq!(options[0].value(), "2025-01-06");

        let (start, end) = default_range(&options).unwrap();
        assert_eq!(start, d(2025, 1, 6));
        assert_eq!(end, d(2025, 1, 27));

        let short = week_range_options(d(2025, 1, 8), 2);
        assert_eq!(default_range(&short).unwrap().1, d(2025, 1, 13));
        assert!(default_range(&[]).is_none());
    }
}
