use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::delta::Delta;
use crate::error::CalendarError;
use crate::point::CalendarPoint;
use crate::rules::recurrence::{iterator, Recurrence, RecurrenceRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Cadence {
    Secondly,
    Minutely,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Cadence {
    pub fn as_str(self) -> &'static str {
        match self {
            Cadence::Secondly => "secondly",
            Cadence::Minutely => "minutely",
            Cadence::Hourly => "hourly",
            Cadence::Daily => "daily",
            Cadence::Weekly => "weekly",
            Cadence::Monthly => "monthly",
            Cadence::Yearly => "yearly",
        }
    }

    /// One step of this cadence.
    pub fn unit(self) -> Delta {
        match self {
            Cadence::Secondly => Delta::from_duration(TimeDelta::seconds(1)),
            Cadence::Minutely => Delta::from_duration(TimeDelta::minutes(1)),
            Cadence::Hourly => Delta::from_duration(TimeDelta::hours(1)),
            Cadence::Daily => Delta::from_duration(TimeDelta::days(1)),
            Cadence::Weekly => Delta::from_duration(TimeDelta::weeks(1)),
            Cadence::Monthly => Delta::from_months(1),
            Cadence::Yearly => Delta::from_months(12),
        }
    }

    /// Only month-based cadences keep a rolling day meaningful.
    pub fn supports_rolling_day(self) -> bool {
        matches!(self, Cadence::Monthly | Cadence::Yearly)
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cadence {
    type Err = CalendarError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim().to_ascii_lowercase();
        match value.as_str() {
            "secondly" | "second" => Ok(Cadence::Secondly),
            "minutely" | "minute" => Ok(Cadence::Minutely),
            "hourly" | "hour" => Ok(Cadence::Hourly),
            "daily" | "day" => Ok(Cadence::Daily),
            "weekly" | "week" => Ok(Cadence::Weekly),
            "monthly" | "month" => Ok(Cadence::Monthly),
            "yearly" | "year" | "annually" => Ok(Cadence::Yearly),
            _ => Err(CalendarError::InvalidCadence(raw.to_string())),
        }
    }
}

impl TryFrom<String> for Cadence {
    type Error = CalendarError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

fn fixed<P: CalendarPoint>(
    cadence: Cadence,
    start: P,
    end: Option<P>,
    count: Option<u32>,
) -> Recurrence<P> {
    let mut rule = RecurrenceRule::new(cadence.unit(), start);
    if let Some(end) = end {
        rule = rule.until(end);
    }
    if let Some(count) = count {
        rule = rule.with_count(count);
    }
    rule.iter()
}

pub fn secondly<P: CalendarPoint>(start: P, end: Option<P>, count: Option<u32>) -> Recurrence<P> {
    fixed(Cadence::Secondly, start, end, count)
}

pub fn minutely<P: CalendarPoint>(start: P, end: Option<P>, count: Option<u32>) -> Recurrence<P> {
    fixed(Cadence::Minutely, start, end, count)
}

pub fn hourly<P: CalendarPoint>(start: P, end: Option<P>, count: Option<u32>) -> Recurrence<P> {
    fixed(Cadence::Hourly, start, end, count)
}

pub fn daily<P: CalendarPoint>(start: P, end: Option<P>, count: Option<u32>) -> Recurrence<P> {
    fixed(Cadence::Daily, start, end, count)
}

pub fn weekly<P: CalendarPoint>(start: P, end: Option<P>, count: Option<u32>) -> Recurrence<P> {
    fixed(Cadence::Weekly, start, end, count)
}

pub fn monthly<P: CalendarPoint>(
    start: P,
    end: Option<P>,
    count: Option<u32>,
    rolling_day: Option<u32>,
) -> Result<Recurrence<P>, CalendarError> {
    iterator(Cadence::Monthly.unit(), start, end, count, rolling_day)
}

pub fn yearly<P: CalendarPoint>(
    start: P,
    end: Option<P>,
    count: Option<u32>,
    rolling_day: Option<u32>,
) -> Result<Recurrence<P>, CalendarError> {
    iterator(Cadence::Yearly.unit(), start, end, count, rolling_day)
}

#[cfg(test)]
mod tests {
    use super::{daily, hourly, minutely, monthly, secondly, weekly, yearly, Cadence};
    use crate::error::CalendarError;
    use chrono::{Datelike, NaiveDate, TimeDelta};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn sub_day_cadences_repeat_dates_until_a_day_accrues() {
        let start = date(2020, 1, 1);
        let next = date(2020, 1, 2);

        let seconds: Vec<_> = secondly(start, None, Some(2 * 86_400))
            .map(Result::unwrap)
            .collect();
        assert!(seconds[..86_400].iter().all(|day| *day == start));
        assert!(seconds[86_400..].iter().all(|day| *day == next));

        let minutes: Vec<_> = minutely(start, None, Some(2 * 1_440))
            .map(Result::unwrap)
            .collect();
        assert!(minutes[..1_440].iter().all(|day| *day == start));
        assert!(minutes[1_440..].iter().all(|day| *day == next));

        let hours: Vec<_> = hourly(start, None, Some(48)).map(Result::unwrap).collect();
        assert!(hours[..24].iter().all(|day| *day == start));
        assert!(hours[24..].iter().all(|day| *day == next));
    }

    #[test]
    fn daily_and_weekly() {
        let start = date(2020, 1, 1);
        let days: Vec<_> = daily(start, None, Some(5)).map(Result::unwrap).collect();
        assert_eq!(days.len(), 5);
        assert_eq!(days[0], start);
        assert_eq!(days[1], start + TimeDelta::days(1));

        let weeks: Vec<_> = weekly(start, Some(date(2020, 1, 29)), None)
            .map(Result::unwrap)
            .collect();
        assert_eq!(weeks.len(), 4);
        assert_eq!(weeks[1], start + TimeDelta::days(7));
    }

    #[test]
    fn monthly_does_not_lose_days() {
        let start = date(2020, 1, 30);
        let months: Vec<_> = monthly(start, None, Some(5), None)
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(
            months,
            vec![
                date(2020, 1, 30),
                date(2020, 2, 29),
                date(2020, 3, 30),
                date(2020, 4, 30),
                date(2020, 5, 30),
            ]
        );

        let years: Vec<_> = yearly(start, None, Some(3), None)
            .unwrap()
            .map(Result::unwrap)
            .collect();
        assert_eq!(years, vec![start, date(2021, 1, 30), date(2022, 1, 30)]);
    }

    #[test]
    fn monthly_rolling_day_overrides_start_day() {
        let months: Vec<_> = monthly(date(2020, 1, 15), None, Some(4), Some(31))
            .unwrap()
            .map(Result::unwrap)
            .collect();
        let days: Vec<u32> = months.iter().map(|day| day.day()).collect();
        assert_eq!(days, vec![31, 29, 31, 30]);
        assert!(matches!(
            yearly(date(2020, 1, 15), None, None, Some(40)),
            Err(CalendarError::InvalidDay(40))
        ));
    }

    #[test]
    fn cadence_parses_from_str() {
        assert_eq!(" Monthly ".parse::<Cadence>().unwrap(), Cadence::Monthly);
        assert_eq!("annually".parse::<Cadence>().unwrap(), Cadence::Yearly);
        assert_eq!(
            "fortnightly".parse::<Cadence>().unwrap_err(),
            CalendarError::InvalidCadence("fortnightly".to_string())
        );
        assert_eq!(Cadence::try_from("month".to_string()).unwrap(), Cadence::Monthly);
        assert_eq!(Cadence::Weekly.to_string(), "weekly");
        assert!(Cadence::Yearly.supports_rolling_day());
        assert!(!Cadence::Daily.supports_rolling_day());
    }
}
