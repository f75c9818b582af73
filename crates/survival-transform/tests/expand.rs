//! Tests for monthly person-time expansion.

use chrono::NaiveDate;
use survival_model::{
    Attribute, AttributeValue, EndEventPriority, ExposureAnomaly, MonthLabel, SubjectInterval,
    SubjectRawEvents, SurvivalColumns,
};
use survival_transform::{ExposureTable, build_survival_records, expand_monthly};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn interval(id: &str, start: NaiveDate, end: NaiveDate) -> SubjectInterval {
    SubjectInterval {
        id: id.to_string(),
        attributes: vec![],
        start_date: start,
        end_date: end,
    }
}

fn render(table: &ExposureTable) -> String {
    table
        .records
        .iter()
        .map(|record| format!("{} {} {} {}", record.id, record.month, record.time, record.end_date))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn single_month_interval() {
    let table = expand_monthly(&[interval("1", ymd(2021, 1, 15), ymd(2021, 1, 20))], None);
    assert_eq!(table.records.len(), 1);
    assert_eq!(table.records[0].month.to_string(), "Jan-21");
    assert_eq!(table.records[0].time, 6);
}

#[test]
fn three_month_interval() {
    let table = expand_monthly(&[interval("1", ymd(2021, 1, 15), ymd(2021, 3, 10))], Some(55));
    insta::assert_snapshot!(render(&table), @r"
    1 Jan-21 17 2021-03-10
    1 Feb-21 28 2021-03-10
    1 Mar-21 10 2021-03-10
    ");
    assert_eq!(table.total_time(), 55);
    assert!(!table.has_anomalies());
}

#[test]
fn leap_february_contributes_twenty_nine_days() {
    let table = expand_monthly(&[interval("1", ymd(2020, 1, 31), ymd(2020, 3, 1))], None);
    let days: Vec<u32> = table.records.iter().map(|r| r.time).collect();
    assert_eq!(days, vec![1, 29, 1]);
}

#[test]
fn year_boundary_labels() {
    let table = expand_monthly(&[interval("1", ymd(2020, 12, 30), ymd(2021, 1, 2))], None);
    let labels: Vec<String> = table.records.iter().map(|r| r.month.to_string()).collect();
    assert_eq!(labels, vec!["Dec-20", "Jan-21"]);
    assert_eq!(table.total_time(), 4);
}

#[test]
fn single_day_interval_contributes_one_day() {
    let day = ymd(2021, 7, 4);
    let table = expand_monthly(&[interval("1", day, day)], Some(1));
    assert_eq!(table.records.len(), 1);
    assert_eq!(table.records[0].time, 1);
    assert!(!table.has_anomalies());
}

#[test]
fn inverted_interval_is_reported_and_others_continue() {
    let rows = vec![
        interval("bad", ymd(2021, 5, 1), ymd(2021, 4, 1)),
        interval("ok", ymd(2021, 4, 1), ymd(2021, 4, 30)),
    ];
    let table = expand_monthly(&rows, None);
    assert_eq!(table.records.len(), 1);
    assert_eq!(table.records[0].id, "ok");
    assert_eq!(
        table.anomalies,
        vec![ExposureAnomaly::InvertedInterval {
            subject: "bad".to_string(),
            start_date: ymd(2021, 5, 1),
            end_date: ymd(2021, 4, 1),
        }]
    );
}

#[test]
fn checksum_mismatch_keeps_records() {
    let table = expand_monthly(&[interval("1", ymd(2021, 1, 15), ymd(2021, 3, 10))], Some(54));
    assert_eq!(table.records.len(), 3);
    assert_eq!(
        table.anomalies,
        vec![ExposureAnomaly::ChecksumMismatch {
            expected: 54,
            actual: 55
        }]
    );
}

#[test]
fn passthroughs_repeat_on_every_month() {
    let mut row = interval("1", ymd(2021, 1, 15), ymd(2021, 2, 10));
    row.attributes = vec![Attribute::new("REGION", AttributeValue::Text("N".to_string()))];
    let table = expand_monthly(&[row.clone()], None);
    assert_eq!(table.records.len(), 2);
    assert!(table.records.iter().all(|r| r.attributes == row.attributes));
    assert_eq!(table.records[1].month, MonthLabel::new(2021, 2).unwrap());
}

#[test]
fn expansion_is_deterministic() {
    let rows = vec![
        interval("1", ymd(2021, 1, 15), ymd(2021, 3, 10)),
        interval("2", ymd(2020, 11, 2), ymd(2021, 2, 1)),
    ];
    assert_eq!(expand_monthly(&rows, None), expand_monthly(&rows, None));
}

#[test]
fn survival_records_expand_directly() {
    let raw = SubjectRawEvents {
        id: "1".to_string(),
        attributes: vec![],
        start_event: Some("2021-01-01".to_string()),
        primary_event: Some("2021-05-01".to_string()),
        competing_event: Some("2021-04-20".to_string()),
        censor_date: Some("2021-06-01".to_string()),
    };
    let records =
        build_survival_records(&[raw], &SurvivalColumns::default(), EndEventPriority::First)
            .unwrap();
    let expected = records[0].time_at_risk + 1;
    let table = expand_monthly(&records, Some(expected));
    assert!(!table.has_anomalies());
    assert_eq!(table.records.len(), 4);
    assert_eq!(table.records[3].time, 20);
    assert!(table.records.iter().all(|r| r.end_date == ymd(2021, 4, 20)));
}
