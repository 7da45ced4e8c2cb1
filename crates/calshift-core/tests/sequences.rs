use calshift_core::{daily, iterator, monthly, Delta, RecurrenceRule};
use chrono::{Datelike, NaiveDate, NaiveDateTime};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn datetime(year: i32, month: u32, day: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(1, 2, 3).unwrap()
}

#[test]
fn empty_sequences() {
    let start = date(2020, 1, 1);
    assert_eq!(daily(start, None, Some(0)).count(), 0);
    assert_eq!(daily(start, Some(start), None).count(), 0);
}

#[test]
fn monthly_date_times_keep_their_time() {
    let start = datetime(2020, 1, 30);
    let months: Vec<NaiveDateTime> = monthly(start, None, Some(5), None)
        .expect("rule")
        .collect::<Result<_, _>>()
        .expect("dates");

    assert_eq!(months[0], start);
    assert_eq!(months[1], datetime(2020, 2, 29));
    assert_eq!(months[2], datetime(2020, 3, 30));
    assert!(months.iter().all(|point| point.time() == start.time()));
}

#[test]
fn month_end_starts_do_not_drift() {
    for month in [1, 3, 5, 7, 8, 10, 12] {
        let start = date(2020, month, 31);
        let forward = monthly(start, None, None, None).expect("rule").take(1_200);
        let backward = iterator(Delta::from_months(-1), start, None, None, None)
            .expect("rule")
            .take(1_200);

        for shifted in forward.chain(backward) {
            let shifted = shifted.expect("date");
            match shifted.month() {
                1 | 3 | 5 | 7 | 8 | 10 | 12 => assert_eq!(shifted.day(), 31, "{shifted}"),
                4 | 6 | 9 | 11 => assert_eq!(shifted.day(), 30, "{shifted}"),
                _ => assert!(shifted.day() >= 28, "{shifted}"),
            }
        }
    }
}

#[test]
fn element_matches_direct_shift() {
    let start = date(2020, 1, 31);
    let freq = Delta::from_months(7);
    let rule = RecurrenceRule::new(freq, start).with_count(200);

    for (index, point) in rule.into_iter().enumerate() {
        let index = i32::try_from(index).unwrap();
        assert_eq!(point.unwrap(), start + freq * index);
    }
}

#[test]
fn backward_end_is_exclusive() {
    let start = date(2020, 3, 31);
    let dates: Vec<NaiveDate> = iterator(
        Delta::from_months(-1),
        start,
        Some(date(2020, 1, 31)),
        None,
        None,
    )
    .expect("rule")
    .collect::<Result<_, _>>()
    .expect("dates");
    assert_eq!(dates, vec![date(2020, 3, 31), date(2020, 2, 29)]);
}
