//! Catalog record model
//!
//! [`Record`] is the normalized unit of the catalog. [`RawRecord`] is the
//! schema-on-read shape produced by source adapters and by the baseline
//! loader; it only becomes a [`Record`] through
//! [`normalize`](crate::canonical::normalize).

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Sentinel subject for records without any known subject
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Text fields of a record
///
/// Subjects are list-valued and handled separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Display title
    Name,

    /// Free-text venue
    Location,

    /// First conference day
    StartDate,

    /// Last conference day
    EndDate,

    /// Abstract registration deadline
    AbstractDeadline,

    /// Paper submission deadline
    SubmissionDeadline,

    /// Author notification date
    Notification,

    /// Official website
    Link,
}

impl Field {
    /// All text fields, in output order
    pub const ALL: [Field; 8] = [
        Field::Name,
        Field::Location,
        Field::StartDate,
        Field::EndDate,
        Field::AbstractDeadline,
        Field::SubmissionDeadline,
        Field::Notification,
        Field::Link,
    ];

    /// Date-valued fields, cleaned by `clean_deadline`
    pub const DATES: [Field; 5] = [
        Field::StartDate,
        Field::EndDate,
        Field::AbstractDeadline,
        Field::SubmissionDeadline,
        Field::Notification,
    ];

    /// Fields a fresher non-empty value overwrites during merge
    pub const REFRESHABLE: [Field; 6] = [
        Field::Location,
        Field::StartDate,
        Field::EndDate,
        Field::AbstractDeadline,
        Field::SubmissionDeadline,
        Field::Notification,
    ];

    /// JSON key of this field in the catalog file
    #[inline]
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Location => "Location",
            Self::StartDate => "Start Date",
            Self::EndDate => "End Date",
            Self::AbstractDeadline => "Abstract Deadline",
            Self::SubmissionDeadline => "Submission Deadline",
            Self::Notification => "Notification",
            Self::Link => "link",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One catalog entry: a conference edition or CFP round
///
/// Serialized with the catalog file's historical key names. Date fields hold
/// either an empty string, a `"Mon DD YYYY"` date, an ISO-8601 timestamp with
/// offset, or cleaned text that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    /// Display title
    pub name: String,

    /// Canonical subject labels, deduplicated, never empty once normalized
    #[serde(rename = "sub")]
    pub subjects: Vec<String>,

    /// Free-text venue
    #[serde(rename = "Location")]
    pub location: String,

    /// First conference day
    #[serde(rename = "Start Date")]
    pub start_date: String,

    /// Last conference day
    #[serde(rename = "End Date")]
    pub end_date: String,

    /// Abstract registration deadline
    #[serde(rename = "Abstract Deadline")]
    pub abstract_deadline: String,

    /// Paper submission deadline
    #[serde(rename = "Submission Deadline")]
    pub submission_deadline: String,

    /// Author notification date
    #[serde(rename = "Notification")]
    pub notification: String,

    /// Official website
    pub link: String,
}

impl Record {
    /// Create record with a name and the sentinel subject
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subjects: vec![UNCATEGORIZED.to_string()],
            ..Self::default()
        }
    }

    /// Set a text field, returning the record
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        *self.text_mut(field) = value.into();
        self
    }

    /// Replace subjects, returning the record
    #[must_use]
    pub fn with_subjects<I, S>(mut self, subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subjects = subjects.into_iter().map(Into::into).collect();
        self
    }

    /// Read a text field
    #[must_use]
    pub fn text(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Location => &self.location,
            Field::StartDate => &self.start_date,
            Field::EndDate => &self.end_date,
            Field::AbstractDeadline => &self.abstract_deadline,
            Field::SubmissionDeadline => &self.submission_deadline,
            Field::Notification => &self.notification,
            Field::Link => &self.link,
        }
    }

    /// Mutable access to a text field
    pub fn text_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Location => &mut self.location,
            Field::StartDate => &mut self.start_date,
            Field::EndDate => &mut self.end_date,
            Field::AbstractDeadline => &mut self.abstract_deadline,
            Field::SubmissionDeadline => &mut self.submission_deadline,
            Field::Notification => &mut self.notification,
            Field::Link => &mut self.link,
        }
    }

    /// Re-run normalization over this record
    ///
    /// Normalization is idempotent, so this is safe on records that are
    /// already canonical.
    #[must_use]
    pub fn normalized(&self) -> Self {
        crate::canonical::normalize(&RawRecord::from(self))
    }
}

/// Loosely-typed field value as found in feeds and old catalog files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    /// Plain text
    Text(String),

    /// A list, usually of subject labels
    List(Vec<RawValue>),

    /// Any other scalar or mapping
    Other(serde_json::Value),
}

impl RawValue {
    /// Flatten to a single text value
    ///
    /// Lists join their non-blank items with a space; numbers and booleans
    /// render as text; mappings and nulls are empty.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::List(items) => items
                .iter()
                .map(Self::to_text)
                .filter(|item| !item.trim().is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            Self::Other(serde_json::Value::Number(n)) => n.to_string(),
            Self::Other(serde_json::Value::Bool(b)) => b.to_string(),
            Self::Other(_) => String::new(),
        }
    }

    /// Read as a list of labels
    ///
    /// A single text is a one-element list; non-text scalars count as absent.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        match self {
            Self::Text(text) => vec![text.clone()],
            Self::List(items) => items.iter().map(Self::to_text).collect(),
            Self::Other(_) => Vec::new(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(values: Vec<String>) -> Self {
        Self::List(values.into_iter().map(Self::Text).collect())
    }
}

/// Candidate record as delivered by a source, before normalization
///
/// Every key is optional and unknown keys are ignored, so any JSON object
/// deserializes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Display title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<RawValue>,

    /// Subject label or labels
    #[serde(default, rename = "sub", skip_serializing_if = "Option::is_none")]
    pub subjects: Option<RawValue>,

    /// Free-text venue
    #[serde(default, rename = "Location", skip_serializing_if = "Option::is_none")]
    pub location: Option<RawValue>,

    /// First conference day
    #[serde(default, rename = "Start Date", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<RawValue>,

    /// Last conference day
    #[serde(default, rename = "End Date", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<RawValue>,

    /// Abstract registration deadline
    #[serde(default, rename = "Abstract Deadline", skip_serializing_if = "Option::is_none")]
    pub abstract_deadline: Option<RawValue>,

    /// Paper submission deadline
    #[serde(default, rename = "Submission Deadline", skip_serializing_if = "Option::is_none")]
    pub submission_deadline: Option<RawValue>,

    /// Author notification date
    #[serde(default, rename = "Notification", skip_serializing_if = "Option::is_none")]
    pub notification: Option<RawValue>,

    /// Official website
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<RawValue>,
}

impl RawRecord {
    /// Start a raw record from a name
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::default().with(Field::Name, name)
    }

    /// Set a text field, returning the record
    #[must_use]
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        *self.slot_mut(field) = Some(RawValue::Text(value.into()));
        self
    }

    /// Set a single subject label
    #[must_use]
    pub fn with_subject(mut self, label: impl Into<String>) -> Self {
        self.subjects = Some(RawValue::Text(label.into()));
        self
    }

    /// Set a list of subject labels
    #[must_use]
    pub fn with_subjects<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        self.subjects = Some(RawValue::from(labels));
        self
    }

    /// Text of a field, empty when absent
    #[must_use]
    pub fn text(&self, field: Field) -> String {
        self.slot(field).as_ref().map(RawValue::to_text).unwrap_or_default()
    }

    /// Subject labels as delivered, empty when absent
    #[must_use]
    pub fn subject_labels(&self) -> Vec<String> {
        self.subjects.as_ref().map(RawValue::labels).unwrap_or_default()
    }

    fn slot(&self, field: Field) -> &Option<RawValue> {
        match field {
            Field::Name => &self.name,
            Field::Location => &self.location,
            Field::StartDate => &self.start_date,
            Field::EndDate => &self.end_date,
            Field::AbstractDeadline => &self.abstract_deadline,
            Field::SubmissionDeadline => &self.submission_deadline,
            Field::Notification => &self.notification,
            Field::Link => &self.link,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<RawValue> {
        match field {
            Field::Name => &mut self.name,
            Field::Location => &mut self.location,
            Field::StartDate => &mut self.start_date,
            Field::EndDate => &mut self.end_date,
            Field::AbstractDeadline => &mut self.abstract_deadline,
            Field::SubmissionDeadline => &mut self.submission_deadline,
            Field::Notification => &mut self.notification,
            Field::Link => &mut self.link,
        }
    }
}

impl From<&Record> for RawRecord {
    fn from(record: &Record) -> Self {
        let mut raw = Self {
            subjects: Some(RawValue::from(record.subjects.clone())),
            ..Self::default()
        };
        for field in Field::ALL {
            *raw.slot_mut(field) = Some(RawValue::Text(record.text(field).to_string()));
        }
        raw
    }
}
