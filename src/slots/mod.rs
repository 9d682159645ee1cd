//! Trip-request slot store.
//!
//! A [`SlotRecord`] holds the partially-filled trip request collected over a
//! conversation. Extraction results are merged into it turn by turn and the
//! completion policy in [`completion`] decides when enough has been gathered
//! to move on to recommendations.
//!
//! # Example
//!
//! ```
//! use atlas::slots::{SlotField, SlotRecord};
//! use serde_json::json;
//!
//! let mut record = SlotRecord::new();
//! record.set(SlotField::City, json!("Paris"));
//!
//! let mut extracted = SlotRecord::new();
//! extracted.set(SlotField::City, json!(""));
//! extracted.set(SlotField::Days, json!(5));
//!
//! record.merge(&extracted);
//! assert_eq!(record.get(SlotField::City), Some(&json!("Paris")));
//! assert_eq!(record.get(SlotField::Days), Some(&json!(5)));
//! ```

pub mod completion;

pub use completion::{evaluate, CompletionStatus};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Value the user gives for `start_date` when they have no date in mind.
pub const START_DATE_UNDECIDED: &str = "not decided";

/// The fields of a trip request.
///
/// Declaration order is the canonical field order: required fields first,
/// then optional ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotField {
    City,
    Days,
    Budget,
    People,
    Kids,
    Health,
    Hobbies,
    Name,
    StartDate,
    #[serde(rename = "specificRequirements")]
    SpecificRequirements,
}

impl SlotField {
    /// Every field in canonical order.
    pub const ALL: [SlotField; 10] = [
        SlotField::City,
        SlotField::Days,
        SlotField::Budget,
        SlotField::People,
        SlotField::Kids,
        SlotField::Health,
        SlotField::Hobbies,
        SlotField::Name,
        SlotField::StartDate,
        SlotField::SpecificRequirements,
    ];

    /// Fields that must eventually be filled.
    pub const REQUIRED: [SlotField; 7] = [
        SlotField::City,
        SlotField::Days,
        SlotField::Budget,
        SlotField::People,
        SlotField::Kids,
        SlotField::Health,
        SlotField::Hobbies,
    ];

    /// Fields that help planning but never block it.
    pub const OPTIONAL: [SlotField; 3] = [
        SlotField::Name,
        SlotField::StartDate,
        SlotField::SpecificRequirements,
    ];

    /// The core trip parameters without which no recommendation is attempted.
    pub const CORE: [SlotField; 4] = [
        SlotField::City,
        SlotField::Days,
        SlotField::Budget,
        SlotField::People,
    ];

    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            SlotField::City => "city",
            SlotField::Days => "days",
            SlotField::Budget => "budget",
            SlotField::People => "people",
            SlotField::Kids => "kids",
            SlotField::Health => "health",
            SlotField::Hobbies => "hobbies",
            SlotField::Name => "name",
            SlotField::StartDate => "start_date",
            SlotField::SpecificRequirements => "specificRequirements",
        }
    }

    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}

impl fmt::Display for SlotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("Unknown slot field: {}", s))
    }
}

/// Whether a slot value counts as "not provided".
///
/// Null, blank strings, `false`, zero, and empty arrays or objects are empty.
/// Everything else is a provided value, whatever its type.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Parsed view of the `start_date` slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartDate {
    /// Nothing collected yet.
    Unspecified,
    /// The user said they have not decided.
    Undecided,
    /// A calendar date in `YYYY-MM-DD` form.
    Date(NaiveDate),
    /// Something that is neither the sentinel nor a date.
    Unparsed(String),
}

/// A trip request: known fields mapped to uninterpreted JSON values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct SlotRecord {
    values: BTreeMap<SlotField, Value>,
}

impl SlotRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: SlotField) -> Option<&Value> {
        self.values.get(&field)
    }

    /// Text form of a field: strings as-is, other values as compact JSON.
    pub fn get_text(&self, field: SlotField) -> Option<String> {
        self.get(field).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    pub fn set(&mut self, field: SlotField, value: Value) {
        self.values.insert(field, value);
    }

    /// Whether the field holds a non-empty value.
    pub fn is_filled(&self, field: SlotField) -> bool {
        self.get(field).is_some_and(|v| !is_empty_value(v))
    }

    /// Merge an extraction result into this record.
    ///
    /// Only non-empty values in `extracted` are copied; absent or empty
    /// extractions never erase what is already stored. Returns the fields
    /// that were written.
    pub fn merge(&mut self, extracted: &SlotRecord) -> Vec<SlotField> {
        let mut updated = Vec::new();
        for (field, value) in &extracted.values {
            if is_empty_value(value) {
                continue;
            }
            self.values.insert(*field, value.clone());
            updated.push(*field);
        }
        updated
    }

    /// Consuming form of [`merge`](Self::merge).
    pub fn merged(mut self, extracted: &SlotRecord) -> Self {
        self.merge(extracted);
        self
    }

    /// Copy of this record without empty values.
    pub fn non_empty(&self) -> SlotRecord {
        SlotRecord {
            values: self
                .values
                .iter()
                .filter(|(_, v)| !is_empty_value(v))
                .map(|(k, v)| (*k, v.clone()))
                .collect(),
        }
    }

    pub fn start_date(&self) -> StartDate {
        match self.get_text(SlotField::StartDate) {
            None => StartDate::Unspecified,
            Some(text) => {
                let text = text.trim();
                if text.is_empty() {
                    StartDate::Unspecified
                } else if text.eq_ignore_ascii_case(START_DATE_UNDECIDED) {
                    StartDate::Undecided
                } else {
                    match NaiveDate::parse_from_str(text, "%Y-%m-%d") {
                        Ok(date) => StartDate::Date(date),
                        Err(_) => StartDate::Unparsed(text.to_string()),
                    }
                }
            }
        }
    }

    /// Trip length in days, when the `days` slot holds something numeric.
    pub fn days(&self) -> Option<u32> {
        match self.get(SlotField::Days)? {
            Value::Number(n) => n.as_u64().and_then(|d| u32::try_from(d).ok()),
            Value::String(s) => s
                .split_whitespace()
                .next()
                .and_then(|first| first.parse().ok()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (SlotField, &Value)> {
        self.values.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// JSON object form with wire field names.
    pub fn to_json(&self) -> Value {
        Value::Object(self.clone().into())
    }
}

impl From<Map<String, Value>> for SlotRecord {
    /// Unknown keys are dropped; values are kept uninterpreted.
    fn from(map: Map<String, Value>) -> Self {
        let values = map
            .into_iter()
            .filter_map(|(key, value)| key.parse::<SlotField>().ok().map(|f| (f, value)))
            .collect();
        Self { values }
    }
}

impl From<SlotRecord> for Map<String, Value> {
    fn from(record: SlotRecord) -> Self {
        record
            .values
            .into_iter()
            .map(|(field, value)| (field.as_str().to_string(), value))
            .collect()
    }
}

impl FromIterator<(SlotField, Value)> for SlotRecord {
    fn from_iter<I: IntoIterator<Item = (SlotField, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
