use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// ISO-8601 layouts tried, in order, for datetime segments declared without a format.
const ISO_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// A path variable after type conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    DateTime(NaiveDateTime),
    Path(String),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(value) | Self::Path(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&NaiveDateTime> {
        match self {
            Self::DateTime(value) => Some(value),
            _ => None,
        }
    }
}

pub(crate) fn parse_datetime(value: &str, format: Option<&str>) -> Option<NaiveDateTime> {
    match format {
        Some(format) => NaiveDateTime::parse_from_str(value, format)
            .ok()
            .or_else(|| midnight(value, format)),
        None => DateTime::parse_from_rfc3339(value)
            .map(|datetime| datetime.naive_utc())
            .ok()
            .or_else(|| {
                ISO_FORMATS
                    .iter()
                    .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            })
            .or_else(|| midnight(value, "%Y-%m-%d")),
    }
}

fn midnight(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(value, format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Variables captured by a successful path match, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Matches(HashMap<String, Value>);

impl Matches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Matches {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
