//! Closed predicate set for structured filtering.
//!
//! Replaces ad-hoc filter objects with a fixed set of variants combined
//! with explicit AND semantics. Predicates are evaluated against the
//! entity's JSON representation, so any serializable entity can be
//! filtered without bespoke plumbing.
//!
//! An unknown field or a value of the wrong shape makes the predicate
//! false, so filters yield an empty result set, never an error.

use serde::Serialize;
use serde_json::Value as JsonValue;

/// A single filter condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Field equals the given value exactly.
    Equals { field: String, value: JsonValue },
    /// String field contains the value case-insensitively, or an array
    /// field has an element equal to it case-insensitively.
    Contains { field: String, value: String },
    /// Numeric field is strictly greater than the bound.
    GreaterThan { field: String, bound: f64 },
    /// Numeric field is strictly less than the bound.
    LessThan { field: String, bound: f64 },
    /// Field equals one of the given values.
    OneOf { field: String, values: Vec<JsonValue> },
}

impl Predicate {
    /// Evaluate against one entity in JSON form.
    pub fn matches(&self, entity: &JsonValue) -> bool {
        match self {
            Predicate::Equals { field, value } => entity.get(field) == Some(value),
            Predicate::Contains { field, value } => match entity.get(field) {
                Some(JsonValue::String(s)) => {
                    s.to_lowercase().contains(&value.to_lowercase())
                }
                Some(JsonValue::Array(items)) => items.iter().any(|item| {
                    item.as_str()
                        .is_some_and(|s| s.eq_ignore_ascii_case(value))
                }),
                _ => false,
            },
            Predicate::GreaterThan { field, bound } => entity
                .get(field)
                .and_then(JsonValue::as_f64)
                .is_some_and(|n| n > *bound),
            Predicate::LessThan { field, bound } => entity
                .get(field)
                .and_then(JsonValue::as_f64)
                .is_some_and(|n| n < *bound),
            Predicate::OneOf { field, values } => entity
                .get(field)
                .is_some_and(|v| values.contains(v)),
        }
    }
}

/// A conjunction of predicates. The empty set matches everything.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    predicates: Vec<Predicate>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.predicates.push(Predicate::Equals {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn contains(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.predicates.push(Predicate::Contains {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    pub fn gt(mut self, field: impl Into<String>, bound: f64) -> Self {
        self.predicates.push(Predicate::GreaterThan {
            field: field.into(),
            bound,
        });
        self
    }

    pub fn lt(mut self, field: impl Into<String>, bound: f64) -> Self {
        self.predicates.push(Predicate::LessThan {
            field: field.into(),
            bound,
        });
        self
    }

    pub fn one_of(mut self, field: impl Into<String>, values: Vec<JsonValue>) -> Self {
        self.predicates.push(Predicate::OneOf {
            field: field.into(),
            values,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Evaluate the conjunction against one entity in JSON form.
    pub fn matches_value(&self, entity: &JsonValue) -> bool {
        self.predicates.iter().all(|p| p.matches(entity))
    }

    /// Filter a slice of entities, keeping original order.
    ///
    /// Entities that fail to serialize are excluded rather than
    /// aborting the whole evaluation.
    pub fn apply<'a, T: Serialize>(&self, items: &'a [T]) -> Vec<&'a T> {
        items
            .iter()
            .filter(|item| {
                serde_json::to_value(item)
                    .map(|v| self.matches_value(&v))
                    .unwrap_or(false)
            })
            .collect()
    }
}
