//! Parsing, display and encoding for temporal value types.
//!
//! Formats are supplied explicitly through [`TemporalConfig`]; there is no
//! ambient or per-thread override.

use chrono::{
    DateTime, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc,
};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Parse formats (chrono `strftime` syntax), tried in priority order.
    pub formats: Vec<String>,
    /// Format used by [`TemporalValueSemantics::format`].
    pub display_format: String,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            formats: vec![
                "%Y-%m-%d %H:%M:%S".into(),
                "%Y-%m-%d %H:%M".into(),
                "%Y%m%dT%H%M%S".into(),
                "%Y-%m-%d".into(),
                "%Y%m%d".into(),
                "%d-%b-%Y".into(),
            ],
            display_format: "%Y-%m-%d %H:%M:%S".into(),
        }
    }
}

/// Value semantics for date-time values, carried in a facet payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemporalValueSemantics {
    config: TemporalConfig,
}

impl TemporalValueSemantics {
    pub fn new(config: TemporalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TemporalConfig {
        &self.config
    }

    /// Parse user input.
    ///
    /// `+N<unit>` / `-N<unit>` is relative to `now` (N defaults to 1, unit to
    /// days). Units: `H` hours, `M` minutes, `w` weeks, `y` years, `m` months,
    /// `d` days. Anything else is tried as RFC 3339, then against each
    /// configured format as a date-time, then as a date at midnight.
    pub fn parse(&self, text: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, DomainError> {
        let input = text.trim();
        if input.is_empty() {
            return Err(invalid(text, "empty input"));
        }
        if input.starts_with(['+', '-']) {
            return parse_relative(input, now);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
            return Ok(dt.with_timezone(&Utc));
        }
        for format in &self.config.formats {
            if let Ok(dt) = NaiveDateTime::parse_from_str(input, format) {
                return Ok(dt.and_utc());
            }
        }
        for format in &self.config.formats {
            if let Ok(date) = NaiveDate::parse_from_str(input, format) {
                return Ok(date.and_time(NaiveTime::MIN).and_utc());
            }
        }
        Err(invalid(
            text,
            &format!("matches none of {} configured format(s)", self.config.formats.len()),
        ))
    }

    pub fn format(&self, value: &DateTime<Utc>) -> String {
        value.format(&self.config.display_format).to_string()
    }

    /// ISO-8601 in UTC with millisecond precision.
    pub fn to_encoded_string(&self, value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn from_encoded_string(&self, text: &str) -> Result<DateTime<Utc>, DomainError> {
        DateTime::parse_from_rfc3339(text.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| invalid(text, &e.to_string()))
    }
}

fn invalid(input: &str, reason: &str) -> DomainError {
    DomainError::InvalidTemporal {
        input: input.to_owned(),
        reason: reason.to_owned(),
    }
}

fn parse_relative(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, DomainError> {
    let (negative, rest) = match input.split_at(1) {
        ("-", rest) => (true, rest),
        (_, rest) => (false, rest),
    };
    let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let (digits, unit) = rest.split_at(digits_end);
    let amount: u32 = if digits.is_empty() {
        1
    } else {
        digits
            .parse()
            .map_err(|_| invalid(input, "relative amount out of range"))?
    };

    let shifted = match unit {
        "" | "d" => shift(now, Duration::try_days(amount.into()), negative),
        "w" => shift(now, Duration::try_weeks(amount.into()), negative),
        "H" => shift(now, Duration::try_hours(amount.into()), negative),
        "M" => shift(now, Duration::try_minutes(amount.into()), negative),
        "m" => shift_months(now, amount, negative),
        "y" => amount
            .checked_mul(12)
            .and_then(|months| shift_months(now, months, negative)),
        other => return Err(invalid(input, &format!("unknown relative unit '{other}'"))),
    };
    shifted.ok_or_else(|| invalid(input, "result out of range"))
}

fn shift(now: DateTime<Utc>, delta: Option<Duration>, negative: bool) -> Option<DateTime<Utc>> {
    let delta = delta?;
    if negative {
        now.checked_sub_signed(delta)
    } else {
        now.checked_add_signed(delta)
    }
}

fn shift_months(now: DateTime<Utc>, months: u32, negative: bool) -> Option<DateTime<Utc>> {
    if negative {
        now.checked_sub_months(Months::new(months))
    } else {
        now.checked_add_months(Months::new(months))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 31, 12, 0, 0).unwrap()
    }

    fn semantics() -> TemporalValueSemantics {
        TemporalValueSemantics::default()
    }

    #[test]
    fn relative_tokens() {
        let s = semantics();
        assert_eq!(s.parse("+3d", now()).unwrap(), now() + Duration::days(3));
        assert_eq!(s.parse("-2w", now()).unwrap(), now() - Duration::weeks(2));
        assert_eq!(s.parse("+H", now()).unwrap(), now() + Duration::hours(1));
        assert_eq!(s.parse("-30M", now()).unwrap(), now() - Duration::minutes(30));
        assert_eq!(s.parse("+", now()).unwrap(), now() + Duration::days(1));
        assert_eq!(
            s.parse("+1m", now()).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap()
        );
        assert_eq!(
            s.parse("-1y", now()).unwrap(),
            Utc.with_ymd_and_hms(2023, 1, 31, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn unknown_unit_rejected() {
        let err = semantics().parse("+3q", now()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTemporal { .. }));
    }

    #[test]
    fn datetime_formats_before_date_formats() {
        let s = semantics();
        assert_eq!(
            s.parse("2024-03-05 14:30", now()).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap()
        );
        assert_eq!(
            s.parse("2024-03-05", now()).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap()
        );
        assert_eq!(
            s.parse("05-Mar-2024", now()).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn configured_formats_only() {
        let s = TemporalValueSemantics::new(TemporalConfig {
            formats: vec!["%d/%m/%Y".into()],
            display_format: "%d/%m/%Y".into(),
        });
        let parsed = s.parse("05/03/2024", now()).unwrap();
        assert_eq!(s.format(&parsed), "05/03/2024");
        assert!(s.parse("2024-03-05 14:30", now()).is_err());
    }

    #[test]
    fn encoded_form_round_trips_with_millis() {
        let s = semantics();
        let value = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 15).unwrap()
            + Duration::milliseconds(250);
        let encoded = s.to_encoded_string(&value);
        assert_eq!(encoded, "2024-03-05T14:30:15.250Z");
        assert_eq!(s.from_encoded_string(&encoded).unwrap(), value);
    }

    #[test]
    fn encoded_form_normalises_offsets_to_utc() {
        let s = semantics();
        let value = s.from_encoded_string("2024-03-05T16:30:15.000+02:00").unwrap();
        assert_eq!(s.to_encoded_string(&value), "2024-03-05T14:30:15.000Z");
    }
}
