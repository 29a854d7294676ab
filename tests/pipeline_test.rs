//! Сквозные сценарии мэтчинга на сырых таблицах

use call_matcher_common::{normalize_region, pipeline, MatchOptions, MatchPolicy, RawTable};
use chrono::NaiveDateTime;
use std::collections::HashSet;

fn dt(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
}

fn visits(rows: &[(&str, &str)]) -> RawTable {
    let mut table = vec![
        vec!["Отчёт по визитам".to_string(), String::new()],
        vec!["Дата и время визита".to_string(), "Город".to_string()],
        vec!["Итого и средние".to_string(), String::new()],
    ];
    table.extend(rows.iter().map(|(t, r)| vec![t.to_string(), r.to_string()]));
    RawTable::from_text_rows(table)
}

fn calls(rows: &[(&str, &str)]) -> RawTable {
    let mut table = vec![vec!["Дата и время".to_string(), "Город".to_string()]];
    table.extend(rows.iter().map(|(t, r)| vec![t.to_string(), r.to_string()]));
    RawTable::from_text_rows(table)
}

fn options(policy: MatchPolicy) -> MatchOptions {
    MatchOptions { policy, ..Default::default() }
}

#[test]
fn test_call_outside_window_is_dropped() {
    let outcome = pipeline::run(
        &visits(&[("2025-06-02 10:00", "Москва")]),
        &calls(&[("2025-06-02 10:30", "москва"), ("2025-06-02 12:00", "москва")]),
        &MatchOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.match_count(), 1);
    assert_eq!(outcome.matches[0].call_time, dt("2025-06-02 10:30:00"));
}

#[test]
fn test_nearest_visit_wins() {
    let outcome = pipeline::run(
        &visits(&[("2025-06-02 09:00", "Москва"), ("2025-06-02 09:10", "Москва")]),
        &calls(&[("2025-06-02 09:45", "Москва")]),
        &options(MatchPolicy::NearestPerVisit),
    )
    .unwrap();

    assert_eq!(outcome.match_count(), 1);
    assert_eq!(outcome.matches[0].visit_time, dt("2025-06-02 09:10:00"));
}

#[test]
fn test_region_mismatch_gives_nothing() {
    for policy in MatchPolicy::ALL {
        let outcome = pipeline::run(
            &visits(&[("2025-06-02 10:00", "Казань")]),
            &calls(&[("2025-06-02 10:00", "Москва")]),
            &options(policy),
        )
        .unwrap();
        assert!(outcome.is_empty(), "политика {}", policy);
    }
}

#[test]
fn test_policy_cardinality_and_containment() {
    let visit_rows = [
        ("2025-06-02 09:00", "Москва"),
        ("2025-06-02 09:10", "г. Москва"),
        ("2025-06-02 09:20", "москва"),
        ("2025-06-02 09:30", "Санкт-Петербург"),
    ];
    let call_rows = [
        ("2025-06-02 09:15", "Москва"),
        ("2025-06-02 09:25", "Москва"),
        ("2025-06-02 09:50", "санкт петербург"),
        ("2025-06-02 09:55", "Москва"),
    ];

    for policy in MatchPolicy::ALL {
        let outcome = pipeline::run(&visits(&visit_rows), &calls(&call_rows), &options(policy)).unwrap();
        assert!(!outcome.is_empty());

        for m in &outcome.matches {
            assert!(m.visit_time <= m.call_time && m.call_time <= m.visit_end);
            assert_eq!(m.region, normalize_region(&m.region));
        }

        match policy {
            MatchPolicy::FirstPerCall => {
                let keys: HashSet<_> = outcome.matches.iter().map(|m| m.call_time).collect();
                assert_eq!(keys.len(), outcome.match_count());
            }
            MatchPolicy::NearestPerVisit => {
                let keys: HashSet<_> = outcome.matches.iter().map(|m| m.visit_time).collect();
                assert_eq!(keys.len(), outcome.match_count());
            }
            MatchPolicy::NoDedup => {
                assert!(outcome.match_count() >= 4);
            }
        }
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let visit_rows = [
        ("2025-06-02 09:00", "Москва"),
        ("2025-06-02 09:05", "Казань"),
        ("2025-06-02 09:10", "Москва"),
    ];
    let call_rows = [
        ("2025-06-02 09:30", "Москва"),
        ("2025-06-02 09:20", "Казань"),
        ("2025-06-02 09:40", "Москва"),
    ];

    for policy in MatchPolicy::ALL {
        let first = pipeline::run(&visits(&visit_rows), &calls(&call_rows), &options(policy)).unwrap();
        for _ in 0..5 {
            let again = pipeline::run(&visits(&visit_rows), &calls(&call_rows), &options(policy)).unwrap();
            assert_eq!(again.table, first.table);
        }
    }
}

#[test]
fn test_window_is_exact() {
    let options = MatchOptions { window_minutes: 45, ..Default::default() };
    let outcome = pipeline::run(
        &visits(&[("2025-06-02 10:00", "Москва"), ("не дата", "Москва"), ("2025-06-02 11:00", "")]),
        &calls(&[]),
        &options,
    )
    .unwrap();

    assert_eq!(outcome.visits.len(), 1);
    assert_eq!(outcome.visit_report.rows_seen, 4);
    assert_eq!(outcome.visit_report.skipped_total, 1);
    assert_eq!(outcome.visit_report.rejected(), 2);
    for visit in &outcome.visits {
        assert_eq!((visit.visit_end - visit.visit_time).num_seconds(), 45 * 60);
    }
}
