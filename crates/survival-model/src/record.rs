//! Row types flowing through the builder and the expander.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::enums::EventCategory;
use crate::month::MonthLabel;

/// A passthrough cell value, carried unchanged from input to output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum AttributeValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Missing,
}

impl AttributeValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, AttributeValue::Missing)
    }
}

/// A named passthrough attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Raw per-subject input, exactly as read from the source table.
///
/// Date fields hold the untouched cell text; `None` means the cell was null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectRawEvents {
    pub id: String,
    pub attributes: Vec<Attribute>,
    pub start_event: Option<String>,
    pub primary_event: Option<String>,
    pub competing_event: Option<String>,
    pub censor_date: Option<String>,
}

/// The three candidate terminal dates of one subject.
///
/// Fixed shape: each category is either present or absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalEvents {
    pub primary: Option<NaiveDate>,
    pub competing: Option<NaiveDate>,
    pub censor: Option<NaiveDate>,
}

impl TerminalEvents {
    /// Returns true when no terminal date is present.
    pub fn is_empty(&self) -> bool {
        self.primary.is_none() && self.competing.is_none() && self.censor.is_none()
    }

    /// Present dates tagged with their category, in tie order.
    pub fn candidates(&self) -> impl Iterator<Item = (EventCategory, NaiveDate)> {
        [
            (EventCategory::Primary, self.primary),
            (EventCategory::Competing, self.competing),
            (EventCategory::Censor, self.censor),
        ]
        .into_iter()
        .filter_map(|(category, date)| date.map(|d| (category, d)))
    }
}

/// One resolved observation interval per subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalRecord {
    pub id: String,
    pub attributes: Vec<Attribute>,
    pub start_date: NaiveDate,
    pub primary_event_date: Option<NaiveDate>,
    pub competing_event_date: Option<NaiveDate>,
    pub censor_date: Option<NaiveDate>,
    pub end_date: NaiveDate,
    /// Category whose date became `end_date`.
    pub end_reason: EventCategory,
    /// Whole days from `start_date` to `end_date`.
    pub time_at_risk: i64,
}

/// A follow-up interval the expander can split into calendar months.
pub trait FollowUp {
    fn subject_id(&self) -> &str;
    fn attributes(&self) -> &[Attribute];
    fn start_date(&self) -> NaiveDate;
    fn end_date(&self) -> NaiveDate;
}

impl FollowUp for SurvivalRecord {
    fn subject_id(&self) -> &str {
        &self.id
    }

    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    fn end_date(&self) -> NaiveDate {
        self.end_date
    }
}

/// A bare follow-up interval, used when the survival table comes from
/// storage rather than straight from the builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectInterval {
    pub id: String,
    pub attributes: Vec<Attribute>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl FollowUp for SubjectInterval {
    fn subject_id(&self) -> &str {
        &self.id
    }

    fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    fn end_date(&self) -> NaiveDate {
        self.end_date
    }
}

/// Days a subject contributed to one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyExposureRecord {
    pub id: String,
    pub attributes: Vec<Attribute>,
    pub end_date: NaiveDate,
    pub month: MonthLabel,
    /// Exposure days, within 1..=31.
    pub time: u32,
}
