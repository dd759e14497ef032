// Schedule and week arithmetic through the public library API
use chrono::{Datelike, Duration, NaiveDate, Weekday};

use planner::assignment::{build_range, build_scheduled, AssignmentPlan};
use planner::deliverables::{self, ComplexityTier, GENERAL_SUBPROCESS};
use planner::error::{PlannerError, ValidationError};
use planner::weeks;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn test_schedule_lengths() {
    assert_eq!(deliverables::high_complexity_percentages().len(), 48);
    assert_eq!(deliverables::high_complexity_subprocesses().len(), 48);
    assert_eq!(deliverables::medium_complexity_percentages().len(), 36);
    assert_eq!(deliverables::medium_complexity_subprocesses().len(), 36);
    assert!(ComplexityTier::Baja.percentages().is_empty());
}

#[test]
fn test_projections_match_schedule() {
    let tables = [
        (
            deliverables::high_complexity_schedule(),
            deliverables::high_complexity_percentages(),
            deliverables::high_complexity_subprocesses(),
        ),
        (
            deliverables::medium_complexity_schedule(),
            deliverables::medium_complexity_percentages(),
            deliverables::medium_complexity_subprocesses(),
        ),
        (
            ComplexityTier::Alta.schedule(),
            ComplexityTier::Alta.percentages(),
            ComplexityTier::Alta.subprocesses(),
        ),
        (
            ComplexityTier::Media.schedule(),
            ComplexityTier::Media.percentages(),
            ComplexityTier::Media.subprocesses(),
        ),
    ];

    for (schedule, percentages, subprocesses) in tables {
        assert_eq!(schedule.len(), percentages.len());
        assert_eq!(schedule.len(), subprocesses.len());
        for (i, ((week, percentage), subprocess)) in
            schedule.iter().zip(&percentages).zip(&subprocesses).enumerate()
        {
            assert_eq!(week.percentage, *percentage, "week {}", i);
            assert_eq!(&week.subprocess, subprocess, "week {}", i);
        }
    }
}

#[test]
fn test_schedule_totals() {
    let high: u32 = deliverables::high_complexity_percentages().iter().sum();
    let medium: u32 = deliverables::medium_complexity_percentages().iter().sum();
    assert_eq!(high, 510);
    assert_eq!(medium, 382);
}

#[test]
fn test_schedule_totals_match_catalog() {
    for tier in [ComplexityTier::Alta, ComplexityTier::Media] {
        let expected: u32 = tier
            .table()
            .unwrap()
            .iter()
            .flat_map(|month| month.iter())
            .flat_map(|week| week.iter())
            .map(|id| deliverables::lookup(*id).unwrap().percentage)
            .sum();
        let total: u32 = tier.percentages().iter().sum();
        assert_eq!(total, expected, "{}", tier);
    }
}

#[test]
fn test_rest_weeks_are_general() {
    for tier in [ComplexityTier::Alta, ComplexityTier::Media] {
        let schedule = tier.schedule();
        let rest: Vec<_> = schedule.iter().filter(|w| w.percentage == 0).collect();
        assert_eq!(rest.len(), 2, "{}", tier);
        assert!(rest.iter().all(|w| w.subprocess == GENERAL_SUBPROCESS));
        assert_eq!(schedule.last().unwrap().percentage, 0);
    }
}

#[test]
fn test_peak_weeks() {
    let high = deliverables::high_complexity_schedule();
    assert_eq!(high.iter().map(|w| w.percentage).max(), Some(38));

    let medium = deliverables::medium_complexity_schedule();
    assert_eq!(medium[31].percentage, 28);
    assert_eq!(
        medium[31].subprocess,
        "Estabilización, Gestión Procesos, Gestión Cambio"
    );
}

#[test]
fn test_subprocess_labels_come_from_catalog() {
    let labels: Vec<&str> = deliverables::catalog().iter().map(|d| d.subprocess).collect();
    for subprocess in deliverables::high_complexity_subprocesses() {
        if subprocess == GENERAL_SUBPROCESS {
            continue;
        }
        for part in subprocess.split(", ") {
            assert!(labels.contains(&part), "unknown label {}", part);
        }
    }
}

#[test]
fn test_start_week_rule_over_a_month() {
    let mut day = d(2025, 9, 1);
    while day.month() == 9 {
        let start = weeks::start_week(day);
        assert_eq!(start.weekday(), Weekday::Mon);

        let this_monday = weeks::monday_of(day);
        match day.weekday() {
            Weekday::Thu | Weekday::Fri | Weekday::Sat => assert_eq!(start, this_monday, "{}", day),
            _ => assert_eq!(start, this_monday + Duration::days(7), "{}", day),
        }
        day += Duration::days(1);
    }
}

#[test]
fn test_start_week_known_dates() {
    // 2025-08-04 is a Monday
    assert_eq!(weeks::start_week(d(2025, 8, 4)), d(2025, 8, 11));
    assert_eq!(weeks::start_week(d(2025, 8, 6)), d(2025, 8, 11));
    assert_eq!(weeks::start_week(d(2025, 8, 7)), d(2025, 8, 4));
    assert_eq!(weeks::start_week(d(2025, 8, 9)), d(2025, 8, 4));
    assert_eq!(weeks::start_week(d(2025, 8, 10)), d(2025, 8, 11));
}

#[test]
fn test_week_labels_across_months() {
    assert_eq!(weeks::week_label(d(2025, 8, 4)), "Agosto_25:Sem 1");
    assert_eq!(weeks::week_label(d(2025, 9, 29)), "Septiembre_25:Sem 5");
    assert_eq!(weeks::week_label(d(2026, 1, 5)), "Enero_26:Sem 1");

    let labels = weeks::week_labels(d(2025, 12, 24), 3);
    assert_eq!(
        labels,
        vec!["Diciembre_25:Sem 4", "Diciembre_25:Sem 5", "Enero_26:Sem 1"]
    );
}

#[test]
fn test_labels_map_back_to_mondays() {
    for monday in weeks::week_window(d(2025, 1, 1), 60) {
        let label = weeks::week_label(monday);
        assert_eq!(weeks::label_to_monday(&label).unwrap(), monday, "{}", label);
    }
}

#[test]
fn test_label_to_monday_rejects_missing_week() {
    // August 2025 has four Mondays
    assert!(weeks::label_to_monday("Agosto_25:Sem 4").is_ok());
    assert!(weeks::label_to_monday("Agosto_25:Sem 5").is_err());
    assert!(weeks::label_to_monday("Agosto:Sem 1").is_err());
}

#[test]
fn test_bulk_request_for_media() {
    // Wednesday, so the schedule starts next Monday
    let request = build_scheduled(7, 3, ComplexityTier::Media, d(2025, 8, 6)).unwrap();

    assert_eq!(request.project_id, 7);
    assert_eq!(request.resource_id, 3);
    assert_eq!(request.percentages.len(), 36);
    assert_eq!(request.subprocesses.len(), 36);
    assert_eq!(request.complexity_type, "media");
    assert_eq!(request.start_date, "2025-08-11");
    assert_eq!(request.percentages, ComplexityTier::Media.percentages());

    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(body["percentages"].as_array().unwrap().len(), 36);
    assert_eq!(body["complexity_type"], "media");

    assert_eq!(AssignmentPlan::Scheduled(request).week_count(), 36);
}

#[test]
fn test_bulk_request_rejects_low_complexity() {
    let err = build_scheduled(1, 1, ComplexityTier::Baja, d(2025, 8, 6)).unwrap_err();
    assert!(matches!(
        err,
        PlannerError::Validation(ValidationError::InvalidComplexity(_))
    ));
}

#[test]
fn test_range_request_validation() {
    let request = build_range(2, 5, d(2025, 8, 4), d(2025, 8, 25), 40).unwrap();
    assert_eq!(request.start_week_monday, "2025-08-04");
    assert_eq!(request.end_week_monday, "2025-08-25");
    assert_eq!(request.subprocess, GENERAL_SUBPROCESS);
    assert_eq!(request.percentage, 40.0);
    assert_eq!(AssignmentPlan::Range(request).week_count(), 4);

    assert!(matches!(
        build_range(2, 5, d(2025, 8, 25), d(2025, 8, 4), 40),
        Err(PlannerError::Validation(ValidationError::InvalidDateRange { .. }))
    ));
    assert!(matches!(
        build_range(2, 5, d(2025, 8, 4), d(2025, 8, 4), 0),
        Err(PlannerError::Validation(ValidationError::InvalidPercentage(0)))
    ));
    assert!(build_range(2, 5, d(2025, 8, 4), d(2025, 8, 4), 100).is_ok());
    assert!(build_range(2, 5, d(2025, 8, 4), d(2025, 8, 4), 101).is_err());
}

#[test]
fn test_default_range_spans_four_options() {
    let options = weeks::week_range_options(d(2025, 8, 6), weeks::RANGE_OPTION_COUNT);
    assert_eq!(options.len(), weeks::RANGE_OPTION_COUNT);
    assert_eq!(options[0].value(), "2025-08-04");

    let (start, end) = weeks::default_range(&options).unwrap();
    assert_eq!(start, d(2025, 8, 4));
    assert_eq!(end, d(2025, 8, 25));
    assert!(weeks::default_range(&[]).is_none());
}
