use super::text;
use crate::{Type, Value};
use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})-([0-9]{2})$").unwrap());

static TIMESTAMP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^([0-9]{4})-([0-9][0-9]?)-([0-9][0-9]?)",
        r"(?:[Tt]|[ \t]+)",
        r"([0-9][0-9]?):([0-9]{2}):([0-9]{2})",
        r"(?:\.([0-9]*))?",
        r"(?:[ \t]*(Z|([-+])([0-9][0-9]?)(?::([0-9]{2}))?))?$",
    ))
    .unwrap()
});

fn number(caps: &regex::Captures<'_>, index: usize) -> Option<u32> {
    caps.get(index)?.as_str().parse().ok()
}

/// Parses a timestamp, rejecting calendar dates and times that do not exist.
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Some(caps) = DATE.captures(text) {
        let year = i32::try_from(number(&caps, 1)?).ok()?;
        let date = NaiveDate::from_ymd_opt(year, number(&caps, 2)?, number(&caps, 3)?)?;
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    let caps = TIMESTAMP.captures(text)?;
    let year = i32::try_from(number(&caps, 1)?).ok()?;
    let date = NaiveDate::from_ymd_opt(year, number(&caps, 2)?, number(&caps, 3)?)?;
    let millis = caps.get(7).map_or(0, |fraction| {
        let mut digits: String = fraction.as_str().chars().take(3).collect();
        while digits.len() < 3 {
            digits.push('0');
        }
        digits.parse().unwrap_or(0)
    });
    let local = date.and_hms_milli_opt(
        number(&caps, 4)?,
        number(&caps, 5)?,
        number(&caps, 6)?,
        millis,
    )?;

    let mut offset = Duration::zero();
    if let Some(sign) = caps.get(9) {
        let hours = i64::from(number(&caps, 10)?);
        let minutes = caps.get(11).map_or(Some(0), |_| number(&caps, 11))?;
        offset = Duration::minutes(hours * 60 + i64::from(minutes));
        if sign.as_str() == "-" {
            offset = -offset;
        }
    }
    Some((local - offset).and_utc())
}

/// `!!timestamp`, normalized to UTC.
pub fn timestamp() -> Type {
    Type::scalar("tag:yaml.org,2002:timestamp")
        .with_resolve(|data| text(data).and_then(parse_timestamp).is_some())
        .with_construct(|data| match text(&data).and_then(parse_timestamp) {
            Some(instant) => Value::Timestamp(instant),
            None => data,
        })
        .with_predicate(|value| matches!(value, Value::Timestamp(_)))
        .with_represent(|value, _| match value {
            Value::Timestamp(instant) => {
                Value::Str(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            other => other.clone(),
        })
}
