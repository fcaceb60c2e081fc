use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Name of a staff member or external party.
///
/// Calls and deposits are joined on party names compared case-insensitively. The
/// comparison key is computed once when the name enters the system; equality and
/// hashing only look at that key, while the original text is kept for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PartyName {
    display: String,
    key: String,
}

impl PartyName {
    pub fn new(value: impl Into<String>) -> Self {
        let display = value.into().trim().to_string();
        let key = normalize_name(&display);
        Self { display, key }
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Lowercased, whitespace-collapsed comparison key.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_blank(&self) -> bool {
        self.key.is_empty()
    }

    pub fn matches(&self, raw: &str) -> bool {
        self.key == normalize_name(raw)
    }
}

impl PartialEq for PartyName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PartyName {}

impl Hash for PartyName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for PartyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl From<String> for PartyName {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for PartyName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<PartyName> for String {
    fn from(value: PartyName) -> Self {
        value.display
    }
}

pub(crate) fn normalize_name(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// A logged call placed by a staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub agent_name: PartyName,
    pub counterparty_name: PartyName,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: NaiveDateTime,
    pub status: String,
}

impl CallRecord {
    /// Only a `Completed` outcome (any casing) counts as a successful call.
    pub fn is_successful(&self) -> bool {
        self.status.eq_ignore_ascii_case("completed")
    }
}

/// A deposit event attributed to a depositor.
///
/// The boolean flags and the bonus unit counters come from separate columns in
/// the source data and are not reconciled against each other.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepositRecord {
    pub depositor_name: PartyName,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_first_time_deposit: bool,
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_deposit: bool,
    #[serde(default)]
    pub ftd_bonus_units: Option<i64>,
    #[serde(default)]
    pub deposit_bonus_units: Option<i64>,
    #[serde(default)]
    pub total_calls_logged: Option<i64>,
    #[serde(default)]
    pub successful_calls_logged: Option<i64>,
}

impl Default for PartyName {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Number(i64),
    Text(String),
}

/// Accepts `true`/`false`, `"Yes"`/`"No"` (any casing), `1`/`0` and `null`.
pub(crate) fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FlagRepr>::deserialize(deserializer)? {
        None => Ok(false),
        Some(FlagRepr::Bool(value)) => Ok(value),
        Some(FlagRepr::Number(value)) => Ok(value != 0),
        Some(FlagRepr::Text(raw)) => parse_flag(&raw).ok_or_else(|| {
            serde::de::Error::custom(format!("'{raw}' is not a recognised yes/no flag"))
        }),
    }
}

pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Some(true),
        "no" | "n" | "false" | "0" | "" => Some(false),
        _ => None,
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("'{raw}' is not a valid timestamp")))
}

/// Parses RFC 3339 (converted to local wall time), ISO-like local date-times, and
/// bare dates (midnight).
///
/// Windows are built from the local clock, so offset-qualified input must land on
/// the local calendar day it happened in.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn party_names_compare_on_normalized_key() {
        let a = PartyName::new("  Jane   DOE ");
        let b = PartyName::new("\u{feff}jane doe");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "Jane   DOE");
        assert_eq!(a.key(), "jane doe");
        assert!(a.matches("JANE DOE"));
        assert!(PartyName::new("   ").is_blank());
    }

    #[test]
    fn status_match_ignores_case() {
        let mut call = CallRecord {
            agent_name: "A".into(),
            counterparty_name: "Client".into(),
            timestamp: parse_timestamp("2025-03-01T09:00:00").unwrap(),
            status: "COMPLETED".to_string(),
        };
        assert!(call.is_successful());
        call.status = "completed".to_string();
        assert!(call.is_successful());
        call.status = "Missed".to_string();
        assert!(!call.is_successful());
    }

    #[test]
    fn deposit_flags_accept_yes_no_strings() {
        let deposit: DepositRecord = serde_json::from_value(json!({
            "depositor_name": "Client",
            "timestamp": "2025-03-01",
            "is_first_time_deposit": "Yes",
            "is_deposit": "no",
            "ftd_bonus_units": 2,
        }))
        .expect("deposit parses");

        assert!(deposit.is_first_time_deposit);
        assert!(!deposit.is_deposit);
        assert_eq!(deposit.ftd_bonus_units, Some(2));
        assert_eq!(deposit.deposit_bonus_units, None);
        assert_eq!(deposit.total_calls_logged, None);
    }

    #[test]
    fn deposit_flags_reject_unknown_text() {
        let result = serde_json::from_value::<DepositRecord>(json!({
            "depositor_name": "Client",
            "timestamp": "2025-03-01",
            "is_deposit": "maybe",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn null_flags_default_to_false() {
        let deposit: DepositRecord = serde_json::from_value(json!({
            "depositor_name": "Client",
            "timestamp": "2025-03-01T10:30:00",
            "is_first_time_deposit": null,
            "is_deposit": true,
        }))
        .expect("deposit parses");
        assert!(!deposit.is_first_time_deposit);
        assert!(deposit.is_deposit);
    }

    #[test]
    fn parse_timestamp_supports_common_shapes() {
        let expected = NaiveDate::from_ymd_opt(2025, 9, 24)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2025-09-24 10:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-09-24T10:00"), Some(expected));
        assert_eq!(
            parse_timestamp("2025-09-24"),
            NaiveDate::from_ymd_opt(2025, 9, 24).unwrap().and_hms_opt(0, 0, 0)
        );
        assert!(parse_timestamp(" ").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn offset_timestamps_convert_to_local_wall_time() {
        let utc = parse_timestamp("2025-09-24T10:00:00Z").expect("utc parses");
        let shifted = parse_timestamp("2025-09-24T12:00:00+02:00").expect("offset parses");
        assert_eq!(utc, shifted);

        let expected = DateTime::parse_from_rfc3339("2025-09-24T10:00:00Z")
            .expect("valid")
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(utc, expected);
    }

    #[test]
    fn offset_timestamp_after_local_midnight_stays_in_local_day() {
        use crate::performance::TimeWindow;
        use chrono::TimeZone;

        let day = NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid");
        let wall = day.and_hms_opt(0, 30, 0).expect("valid");
        let stamped = Local
            .from_local_datetime(&wall)
            .earliest()
            .expect("local time exists")
            .to_rfc3339();

        let parsed = parse_timestamp(&stamped).expect("rfc3339 parses");
        assert_eq!(parsed, wall);
        assert!(TimeWindow::for_day(day).contains(parsed));
        assert!(!TimeWindow::for_day(day.pred_opt().expect("valid")).contains(parsed));
    }
}
