//! Weekly refresh cadence.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, NaiveTime, TimeDelta, Timelike, Utc, Weekday};

/// Errors raised when building a [`RotationCadence`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CadenceError {
    /// The weekday name was not recognised.
    #[error("unknown weekday '{0}'")]
    UnknownWeekday(String),
    /// Hour or minute fell outside the clock face.
    #[error("invalid time of day {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },
}

/// A weekly tick: one weekday and time of day, in UTC.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc, Weekday};
/// use munch_backend::domain::RotationCadence;
///
/// let cadence = RotationCadence::new(Weekday::Mon, 0, 0).expect("valid cadence");
/// let friday = Utc.with_ymd_and_hms(2026, 3, 6, 15, 30, 0).single().expect("time");
/// let next = cadence.next_tick_after(friday);
/// assert_eq!(next, Utc.with_ymd_and_hms(2026, 3, 9, 0, 0, 0).single().expect("time"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationCadence {
    weekday: Weekday,
    time: NaiveTime,
}

impl RotationCadence {
    /// Build a cadence firing on `weekday` at `hour:minute` UTC.
    pub fn new(weekday: Weekday, hour: u32, minute: u32) -> Result<Self, CadenceError> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0)
            .ok_or(CadenceError::InvalidTime { hour, minute })?;
        Ok(Self { weekday, time })
    }

    /// Build a cadence from a weekday name such as `mon` or `Monday`.
    pub fn parse(weekday: &str, hour: u32, minute: u32) -> Result<Self, CadenceError> {
        let weekday = Weekday::from_str(weekday.trim())
            .map_err(|_| CadenceError::UnknownWeekday(weekday.to_owned()))?;
        Self::new(weekday, hour, minute)
    }

    /// Configured weekday.
    pub fn weekday(&self) -> Weekday {
        self.weekday
    }

    /// First tick strictly after `now`.
    pub fn next_tick_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let days_ahead = (7 + self.weekday.num_days_from_monday()
            - now.weekday().num_days_from_monday())
            % 7;
        let date = now.date_naive() + Days::new(u64::from(days_ahead));
        let candidate = date.and_time(self.time).and_utc();
        if candidate > now {
            candidate
        } else {
            candidate + TimeDelta::days(7)
        }
    }
}

impl Default for RotationCadence {
    fn default() -> Self {
        Self {
            weekday: Weekday::Mon,
            time: NaiveTime::MIN,
        }
    }
}

impl fmt::Display for RotationCadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02}:{:02} UTC",
            self.weekday,
            self.time.hour(),
            self.time.minute()
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn at(day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
        // March 2026: the 2nd is a Monday.
        Utc.with_ymd_and_hms(2026, 3, day, hour, minute, second)
            .single()
            .expect("valid time")
    }

    #[rstest]
    #[case::mid_week(at(4, 12, 0, 0), at(9, 0, 0, 0))]
    #[case::exactly_on_tick(at(2, 0, 0, 0), at(9, 0, 0, 0))]
    #[case::just_after_tick(at(2, 0, 0, 1), at(9, 0, 0, 0))]
    #[case::sunday_night(at(8, 23, 59, 59), at(9, 0, 0, 0))]
    fn default_cadence_fires_monday_midnight(
        #[case] now: DateTime<Utc>,
        #[case] expected: DateTime<Utc>,
    ) {
        assert_eq!(RotationCadence::default().next_tick_after(now), expected);
    }

    #[rstest]
    #[case::later_same_day(at(4, 9, 0, 0), at(4, 17, 30, 0))]
    #[case::earlier_same_day(at(4, 18, 0, 0), at(11, 17, 30, 0))]
    #[case::day_before(at(3, 18, 0, 0), at(4, 17, 30, 0))]
    fn custom_cadence(#[case] now: DateTime<Utc>, #[case] expected: DateTime<Utc>) {
        let cadence = RotationCadence::parse("wed", 17, 30).expect("valid cadence");
        assert_eq!(cadence.next_tick_after(now), expected);
    }

    #[rstest]
    fn next_tick_is_always_strictly_later_and_on_the_weekday() {
        let cadence = RotationCadence::new(Weekday::Fri, 6, 15).expect("valid cadence");
        let mut now = at(1, 0, 0, 0);
        for _ in 0..200 {
            let next = cadence.next_tick_after(now);
            assert!(next > now);
            assert!(next - now <= TimeDelta::days(7));
            assert_eq!(next.weekday(), Weekday::Fri);
            assert_eq!((next.hour(), next.minute()), (6, 15));
            now += TimeDelta::minutes(97);
        }
    }

    #[rstest]
    #[case("Someday", 0, 0, CadenceError::UnknownWeekday("Someday".to_owned()))]
    #[case("mon", 24, 0, CadenceError::InvalidTime { hour: 24, minute: 0 })]
    #[case("mon", 0, 60, CadenceError::InvalidTime { hour: 0, minute: 60 })]
    fn rejects_invalid_cadences(
        #[case] weekday: &str,
        #[case] hour: u32,
        #[case] minute: u32,
        #[case] expected: CadenceError,
    ) {
        assert_eq!(RotationCadence::parse(weekday, hour, minute), Err(expected));
    }
}
