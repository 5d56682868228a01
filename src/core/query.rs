//! Predicates, filter specifications and the list criteria builder
//!
//! A [`FilterSpec`] is a flat conjunction of [`Predicate`]s. It can be
//! evaluated directly against an [`Item`] (in-memory stores) or translated
//! into a parameterized SQL `WHERE` clause (SQL stores). There is no OR and no
//! nesting.
//!
//! # Example
//! ```rust,ignore
//! // GET /books?title=dune&language=en
//! let criteria = ListCriteria {
//!     title: Some("Dune".into()),
//!     language: Some("en".into()),
//!     ..Default::default()
//! };
//! let filter = criteria.to_filter();
//! // title CONTAINS "dune" AND language EQ "en"
//! assert_eq!(filter.len(), 2);
//! ```

use crate::core::error::{CatalogResult, ValidationError};
use crate::core::field::FieldValue;
use crate::core::item::{Item, attr};
use serde::{Deserialize, Deserializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    StartsWith,
}

impl Operator {
    /// Whether the operator compares textual renderings instead of typed values
    pub fn is_textual(self) -> bool {
        matches!(self, Operator::Contains | Operator::StartsWith)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operator::Eq => "EQ",
            Operator::Neq => "NEQ",
            Operator::Gt => "GT",
            Operator::Gte => "GTE",
            Operator::Lt => "LT",
            Operator::Lte => "LTE",
            Operator::Contains => "CONTAINS",
            Operator::StartsWith => "STARTS_WITH",
        };
        f.write_str(s)
    }
}

/// A single `attribute operator operand` condition
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    attribute: String,
    operator: Operator,
    operand: FieldValue,
}

impl Predicate {
    pub fn new(
        attribute: impl Into<String>,
        operator: Operator,
        operand: impl Into<FieldValue>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            operator,
            operand: operand.into(),
        }
    }

    pub fn eq(attribute: impl Into<String>, operand: impl Into<FieldValue>) -> Self {
        Self::new(attribute, Operator::Eq, operand)
    }

    pub fn neq(attribute: impl Into<String>, operand: impl Into<FieldValue>) -> Self {
        Self::new(attribute, Operator::Neq, operand)
    }

    pub fn gt(attribute: impl Into<String>, operand: impl Into<FieldValue>) -> Self {
        Self::new(attribute, Operator::Gt, operand)
    }

    pub fn gte(attribute: impl Into<String>, operand: impl Into<FieldValue>) -> Self {
        Self::new(attribute, Operator::Gte, operand)
    }

    pub fn lt(attribute: impl Into<String>, operand: impl Into<FieldValue>) -> Self {
        Self::new(attribute, Operator::Lt, operand)
    }

    pub fn lte(attribute: impl Into<String>, operand: impl Into<FieldValue>) -> Self {
        Self::new(attribute, Operator::Lte, operand)
    }

    pub fn contains(attribute: impl Into<String>, fragment: impl Into<FieldValue>) -> Self {
        Self::new(attribute, Operator::Contains, fragment)
    }

    pub fn starts_with(attribute: impl Into<String>, prefix: impl Into<FieldValue>) -> Self {
        Self::new(attribute, Operator::StartsWith, prefix)
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    pub fn operand(&self) -> &FieldValue {
        &self.operand
    }

    /// Evaluate the predicate against an item.
    ///
    /// A predicate on an attribute the item does not have never matches.
    pub fn matches(&self, item: &Item) -> bool {
        let Some(value) = item.field_value(&self.attribute) else {
            return false;
        };

        match self.operator {
            Operator::Eq => value == self.operand,
            Operator::Neq => value != self.operand,
            Operator::Contains => self.text_match(&value, |v, o| v.contains(o)),
            Operator::StartsWith => self.text_match(&value, |v, o| v.starts_with(o)),
            Operator::Gt => self.ordered(&value, Ordering::is_gt),
            Operator::Gte => self.ordered(&value, Ordering::is_ge),
            Operator::Lt => self.ordered(&value, Ordering::is_lt),
            Operator::Lte => self.ordered(&value, Ordering::is_le),
        }
    }

    fn text_match(&self, value: &FieldValue, test: impl Fn(&str, &str) -> bool) -> bool {
        match (value.to_text(), self.operand.to_text()) {
            (Some(v), Some(o)) => test(&v.to_lowercase(), &o.to_lowercase()),
            _ => false,
        }
    }

    fn ordered(&self, value: &FieldValue, test: impl Fn(Ordering) -> bool) -> bool {
        value.compare(&self.operand).is_some_and(test)
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.attribute, self.operator, self.operand)
    }
}

/// Ordered AND-combination of predicates. Empty matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    predicates: Vec<Predicate>,
}

/// A parameterized SQL condition with positional (`$n`) placeholders
#[derive(Debug, Clone, PartialEq)]
pub struct SqlWhere {
    pub clause: String,
    pub params: Vec<FieldValue>,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a predicate (builder style)
    pub fn with(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Append a predicate in place
    pub fn and(&mut self, predicate: Predicate) -> &mut Self {
        self.predicates.push(predicate);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.iter()
    }

    /// True when every predicate matches
    pub fn matches(&self, item: &Item) -> bool {
        self.predicates.iter().all(|p| p.matches(item))
    }

    /// Translate into a PostgreSQL condition.
    ///
    /// Placeholders are numbered from `first_param`. Returns `TRUE` for an
    /// empty spec and fails on attributes without a backing column.
    pub fn to_sql(&self, first_param: usize) -> CatalogResult<SqlWhere> {
        if self.predicates.is_empty() {
            return Ok(SqlWhere {
                clause: "TRUE".to_string(),
                params: Vec::new(),
            });
        }

        let mut conditions = Vec::with_capacity(self.predicates.len());
        let mut params = Vec::new();

        for predicate in &self.predicates {
            let column = Item::column_name(predicate.attribute()).ok_or_else(|| {
                ValidationError::UnknownAttribute {
                    attribute: predicate.attribute().to_string(),
                }
            })?;
            let operand = predicate.operand();

            if operand.is_null() {
                match predicate.operator() {
                    Operator::Eq => conditions.push(format!("{column} IS NULL")),
                    Operator::Neq => conditions.push(format!("{column} IS NOT NULL")),
                    // Ordering and text tests against null never match
                    _ => conditions.push("FALSE".to_string()),
                }
                continue;
            }

            let index = first_param + params.len();
            let condition = match predicate.operator() {
                op if op.is_textual() => {
                    let fragment = escape_like(&operand.to_text().unwrap_or_default().to_lowercase());
                    let pattern = if op == Operator::Contains {
                        format!("%{fragment}%")
                    } else {
                        format!("{fragment}%")
                    };
                    params.push(FieldValue::String(pattern));
                    format!("LOWER({column}::TEXT) LIKE ${index} ESCAPE '\\'")
                }
                op => {
                    let placeholder = match operand {
                        FieldValue::Decimal(_) => format!("${index}::NUMERIC"),
                        _ => format!("${index}"),
                    };
                    params.push(operand.clone());
                    let sql_op = match op {
                        Operator::Eq => "=",
                        Operator::Neq => "IS DISTINCT FROM",
                        Operator::Gt => ">",
                        Operator::Gte => ">=",
                        Operator::Lt => "<",
                        _ => "<=",
                    };
                    format!("{column} {sql_op} {placeholder}")
                }
            };
            conditions.push(condition);
        }

        Ok(SqlWhere {
            clause: conditions.join(" AND "),
            params,
        })
    }
}

impl<'a> IntoIterator for &'a FilterSpec {
    type Item = &'a Predicate;
    type IntoIter = std::slice::Iter<'a, Predicate>;

    fn into_iter(self) -> Self::IntoIter {
        self.predicates.iter()
    }
}

impl FromIterator<Predicate> for FilterSpec {
    fn from_iter<I: IntoIterator<Item = Predicate>>(iter: I) -> Self {
        Self {
            predicates: iter.into_iter().collect(),
        }
    }
}

fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Optional list criteria, as received from `GET /books?...`
///
/// Strings are not trimmed; a zero-length string counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCriteria {
    pub title: Option<String>,
    pub language: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub category_id: Option<i64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub status: Option<bool>,
}

/// Query-string values arrive as text; `categoryId=` means "not supplied"
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

impl ListCriteria {
    /// True when no criterion would contribute a predicate
    pub fn is_empty(&self) -> bool {
        self.to_filter().is_empty()
    }

    /// Build the filter: one predicate per non-empty criterion, in the fixed
    /// order title, language, category, status.
    pub fn to_filter(&self) -> FilterSpec {
        let mut filter = FilterSpec::new();

        if let Some(title) = self.title.as_deref().filter(|s| !s.is_empty()) {
            filter.and(Predicate::contains(attr::TITLE, title.to_lowercase()));
        }
        if let Some(language) = self.language.as_deref().filter(|s| !s.is_empty()) {
            filter.and(Predicate::eq(attr::LANGUAGE, language));
        }
        if let Some(category_id) = self.category_id {
            filter.and(Predicate::eq(attr::CATEGORY_ID, category_id));
        }
        if let Some(status) = self.status {
            filter.and(Predicate::eq(attr::STATUS, status));
        }

        filter
    }
}
