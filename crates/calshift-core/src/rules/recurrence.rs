use std::iter::FusedIterator;

use tracing::debug;

use crate::calendar::with_day;
use crate::delta::Delta;
use crate::error::CalendarError;
use crate::point::CalendarPoint;

/// Parameters of a regular sequence of points.
///
/// `start` is inclusive, `end` exclusive. When `end` lies before `start` the
/// sequence is expected to run backwards, which needs a negative `freq`;
/// otherwise it never reaches `end` and only `count` can stop it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceRule<P> {
    freq: Delta,
    start: P,
    end: Option<P>,
    count: Option<u32>,
    rolling_day: Option<u32>,
}

impl<P: CalendarPoint> RecurrenceRule<P> {
    pub fn new(freq: Delta, start: P) -> Self {
        Self {
            freq,
            start,
            end: None,
            count: None,
            rolling_day: None,
        }
    }

    pub fn until(mut self, end: P) -> Self {
        self.end = Some(end);
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    /// Moves every generated point to `day`, clamped to the month's length.
    pub fn with_rolling_day(mut self, day: u32) -> Result<Self, CalendarError> {
        if !(1..=31).contains(&day) {
            return Err(CalendarError::InvalidDay(day));
        }
        self.rolling_day = Some(day);
        Ok(self)
    }

    pub fn freq(&self) -> Delta {
        self.freq
    }

    pub fn start(&self) -> P {
        self.start
    }

    pub fn end(&self) -> Option<P> {
        self.end
    }

    pub fn count(&self) -> Option<u32> {
        self.count
    }

    pub fn rolling_day(&self) -> Option<u32> {
        self.rolling_day
    }

    pub fn iter(&self) -> Recurrence<P> {
        Recurrence::new(*self)
    }
}

impl<P: CalendarPoint> IntoIterator for RecurrenceRule<P> {
    type Item = Result<P, CalendarError>;
    type IntoIter = Recurrence<P>;

    fn into_iter(self) -> Recurrence<P> {
        Recurrence::new(self)
    }
}

/// Builds the iterator for a rule given as loose parameters.
pub fn iterator<P: CalendarPoint>(
    freq: Delta,
    start: P,
    end: Option<P>,
    count: Option<u32>,
    rolling_day: Option<u32>,
) -> Result<Recurrence<P>, CalendarError> {
    let mut rule = RecurrenceRule::new(freq, start);
    if let Some(end) = end {
        rule = rule.until(end);
    }
    if let Some(count) = count {
        rule = rule.with_count(count);
    }
    if let Some(day) = rolling_day {
        rule = rule.with_rolling_day(day)?;
    }
    Ok(rule.iter())
}

/// Lazily yields `start + freq * n` for `n = 0, 1, 2, ...`.
///
/// Each point is computed from `start` directly, so long sequences do not
/// drift when month-end clamping shortens an intermediate date. An
/// arithmetic error is yielded once, after which the iterator is exhausted.
#[derive(Debug, Clone)]
pub struct Recurrence<P> {
    rule: RecurrenceRule<P>,
    ascending: bool,
    emitted: u64,
    finished: bool,
}

impl<P: CalendarPoint> Recurrence<P> {
    fn new(rule: RecurrenceRule<P>) -> Self {
        let ascending = rule.end.is_none_or(|end| end >= rule.start);
        Self {
            rule,
            ascending,
            emitted: 0,
            finished: false,
        }
    }

    pub fn rule(&self) -> &RecurrenceRule<P> {
        &self.rule
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    fn candidate(&self) -> Result<P, CalendarError> {
        let index = i64::try_from(self.emitted).map_err(|_| CalendarError::OutOfRange)?;
        let point = self.rule.freq.checked_mul(index)?.checked_add_to(self.rule.start)?;
        match self.rule.rolling_day {
            Some(day) => with_day(point, day),
            None => Ok(point),
        }
    }

    fn past_end(&self, candidate: &P) -> bool {
        match self.rule.end {
            Some(end) if self.ascending => *candidate >= end,
            Some(end) => *candidate <= end,
            None => false,
        }
    }
}

impl<P: CalendarPoint> Iterator for Recurrence<P> {
    type Item = Result<P, CalendarError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let count_reached = self
            .rule
            .count
            .is_some_and(|count| self.emitted >= u64::from(count));
        if count_reached {
            debug!(emitted = self.emitted, "recurrence reached its count");
            self.finished = true;
            return None;
        }

        let candidate = match self.candidate() {
            Ok(candidate) => candidate,
            Err(err) => {
                debug!(emitted = self.emitted, error = %err, "recurrence stopped");
                self.finished = true;
                return Some(Err(err));
            }
        };

        if self.past_end(&candidate) {
            debug!(emitted = self.emitted, "recurrence reached its end");
            self.finished = true;
            return None;
        }

        self.emitted += 1;
        Some(Ok(candidate))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.finished {
            return (0, Some(0));
        }
        let remaining = self
            .rule
            .count
            .map(|count| u64::from(count).saturating_sub(self.emitted))
            .and_then(|remaining| usize::try_from(remaining).ok());
        (0, remaining)
    }
}

impl<P: CalendarPoint> FusedIterator for Recurrence<P> {}

#[cfg(test)]
mod tests {
    use super::{iterator, RecurrenceRule};
    use crate::delta::Delta;
    use crate::error::CalendarError;
    use chrono::{NaiveDate, TimeDelta};

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn collect(rule: RecurrenceRule<NaiveDate>) -> Vec<NaiveDate> {
        rule.iter().collect::<Result<_, _>>().expect("dates")
    }

    #[test]
    fn backwards_with_count_or_end() {
        let start = date(2020, 3, 31);
        let rule = RecurrenceRule::new(Delta::from_months(-1), start);

        let counted = collect(rule.with_count(3));
        assert_eq!(
            counted,
            vec![date(2020, 3, 31), date(2020, 2, 29), date(2020, 1, 31)]
        );

        let bounded = collect(rule.until(date(2019, 12, 31)));
        assert_eq!(counted, bounded);
    }

    #[test]
    fn yearly_rolling_day_snaps_to_leap_day() {
        let rule = RecurrenceRule::new(Delta::from_months(12), date(2003, 2, 28))
            .until(date(2006, 2, 28))
            .with_rolling_day(29)
            .unwrap();
        assert_eq!(
            collect(rule),
            vec![date(2003, 2, 28), date(2004, 2, 29), date(2005, 2, 28)]
        );
    }

    #[test]
    fn rolling_day_is_validated() {
        let rule = RecurrenceRule::new(Delta::from_months(1), date(2020, 1, 1));
        assert_eq!(
            rule.with_rolling_day(0).unwrap_err(),
            CalendarError::InvalidDay(0)
        );
        assert_eq!(
            rule.with_rolling_day(32).unwrap_err(),
            CalendarError::InvalidDay(32)
        );
    }

    #[test]
    fn zero_length_sequences() {
        let start = date(2020, 1, 1);
        let day = Delta::from_duration(TimeDelta::days(1));
        assert!(collect(RecurrenceRule::new(day, start).with_count(0)).is_empty());
        assert!(collect(RecurrenceRule::new(day, start).until(start)).is_empty());
    }

    #[test]
    fn count_and_end_both_apply() {
        let start = date(2020, 1, 1);
        let day = Delta::from_duration(TimeDelta::days(1));
        let rule = RecurrenceRule::new(day, start)
            .until(date(2020, 1, 3))
            .with_count(10);
        assert_eq!(collect(rule), vec![date(2020, 1, 1), date(2020, 1, 2)]);

        let rule = RecurrenceRule::new(day, start)
            .until(date(2020, 2, 1))
            .with_count(2);
        assert_eq!(collect(rule), vec![date(2020, 1, 1), date(2020, 1, 2)]);
    }

    #[test]
    fn overflow_is_yielded_once() {
        let mut dates = iterator(
            Delta::from_months(1_000_000),
            date(2020, 1, 1),
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(dates.next(), Some(Ok(date(2020, 1, 1))));
        assert_eq!(dates.next(), Some(Ok(date(85353, 5, 1))));
        assert_eq!(dates.next(), Some(Ok(date(168686, 9, 1))));
        assert_eq!(dates.next(), Some(Ok(date(252020, 1, 1))));
        assert_eq!(dates.next(), Some(Err(CalendarError::OutOfRange)));
        assert_eq!(dates.next(), None);
    }

    #[test]
    fn indices_past_i32_stay_exact() {
        let start = date(2000, 1, 1).and_hms_opt(0, 0, 0).unwrap();
        let second = Delta::from_duration(TimeDelta::seconds(1));
        let mut dates = RecurrenceRule::new(second, start).iter();
        dates.emitted = 3_000_000_000;

        let expected = start + TimeDelta::seconds(3_000_000_000);
        assert_eq!(dates.next(), Some(Ok(expected)));
        assert_eq!(dates.emitted(), 3_000_000_001);
    }

    #[test]
    fn size_hint_tracks_count() {
        let mut dates = RecurrenceRule::new(Delta::from_months(1), date(2020, 1, 1))
            .with_count(3)
            .iter();
        assert_eq!(dates.size_hint(), (0, Some(3)));
        dates.next();
        assert_eq!(dates.size_hint(), (0, Some(2)));
        assert_eq!(dates.emitted(), 1);
    }
}
