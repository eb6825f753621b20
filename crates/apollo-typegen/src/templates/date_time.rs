/// A `DateTime` scalar: RFC 3339, or an ISO 8601 date-time without offset
/// taken to be UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime(pub chrono::DateTime<chrono::Utc>);

impl std::str::FromStr for DateTime {
    type Err = ScalarFormatError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if let Ok(date_time) = chrono::DateTime::parse_from_rfc3339(value) {
            return Ok(DateTime(date_time.with_timezone(&chrono::Utc)));
        }
        chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| DateTime(naive.and_utc()))
            .map_err(|error| ScalarFormatError {
                scalar: "DateTime",
                value: value.to_string(),
                message: error.to_string(),
            })
    }
}

impl std::fmt::Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(chrono::SecondsFormat::AutoSi, true))
    }
}

impl Serialize for DateTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateTime {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
