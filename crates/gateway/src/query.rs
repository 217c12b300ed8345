//! Sort specifications and filter criteria.

use std::collections::BTreeMap;

use serde_json::Value;

/// Columns every collection has outside the JSON document.
pub const SYSTEM_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

/// Sort order for list and filter calls.
///
/// Parsed from a field name with an optional leading `-` for descending
/// order, the way the storefront and admin pages spell it: `"date"`,
/// `"-created_at"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub descending: bool,
}

impl SortSpec {
    /// Ascending by `field`.
    #[must_use]
    pub fn asc(field: &str) -> Self {
        Self {
            field: field.to_owned(),
            descending: false,
        }
    }

    /// Descending by `field`.
    #[must_use]
    pub fn desc(field: &str) -> Self {
        Self {
            field: field.to_owned(),
            descending: true,
        }
    }

    /// Parse `"field"` or `"-field"`. Blank input gives the default,
    /// newest first.
    #[must_use]
    pub fn parse(spec: &str) -> Self {
        let spec = spec.trim();
        match spec.strip_prefix('-') {
            Some(field) if !field.is_empty() => Self::desc(field),
            Some(_) => Self::default(),
            None if spec.is_empty() => Self::default(),
            None => Self::asc(spec),
        }
    }

    /// Whether the field is one of the row columns rather than a document key.
    #[must_use]
    pub fn is_system_field(&self) -> bool {
        SYSTEM_FIELDS.contains(&self.field.as_str())
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::desc("created_at")
    }
}

impl std::str::FromStr for SortSpec {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// A single filter condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Field equals the value.
    Eq(Value),
    /// Field equals one of the values.
    OneOf(Vec<Value>),
}

impl Condition {
    /// Check a document value against this condition.
    #[must_use]
    pub fn matches(&self, actual: &Value) -> bool {
        match self {
            Self::Eq(expected) => expected == actual,
            Self::OneOf(options) => options.contains(actual),
        }
    }
}

/// AND-combined field conditions.
///
/// Null, empty-string and empty-list values are dropped when a condition is
/// added, so a blank form field never filters anything out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    conditions: BTreeMap<String, Condition>,
}

impl Criteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field == value`.
    #[must_use]
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        let value = value.into();
        if !is_blank(&value) {
            self.conditions
                .insert(field.to_owned(), Condition::Eq(value));
        }
        self
    }

    /// Require `field` to equal one of `values`.
    #[must_use]
    pub fn one_of<I, V>(mut self, field: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values
            .into_iter()
            .map(Into::into)
            .filter(|v| !is_blank(v))
            .collect();
        if !values.is_empty() {
            self.conditions
                .insert(field.to_owned(), Condition::OneOf(values));
        }
        self
    }

    /// Build criteria from a JSON object: arrays become membership tests,
    /// everything else equality.
    #[must_use]
    pub fn from_json(object: &serde_json::Map<String, Value>) -> Self {
        object
            .iter()
            .fold(Self::new(), |criteria, (field, value)| match value {
                Value::Array(values) => criteria.one_of(field, values.iter().cloned()),
                other => criteria.eq(field, other.clone()),
            })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Condition)> {
        self.conditions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.conditions.keys().map(String::as_str)
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
