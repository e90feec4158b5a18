//! Filter and sort expressions for remote grid queries.
//!
//! The grid client describes predicates as JSON tuples (`[field, op, value]`
//! or a list of such tuples, AND-combined) and ordering as a list of
//! `{selector, desc}` objects. This module decodes those untyped wire shapes
//! into strongly typed expressions, rejecting unknown fields and operators at
//! the boundary instead of silently dropping them. OR-combination and nested
//! groups are not supported.

use serde_json::{Value, json};

use super::error::Error;

/// A filterable or sortable column of the user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    /// `id` — store-assigned identifier.
    Id,
    /// `email`.
    Email,
    /// `firstName`.
    FirstName,
    /// `lastName`.
    LastName,
    /// `position`.
    Position,
    /// `phone`.
    Phone,
    /// `createdAt` — sortable only.
    CreatedAt,
    /// `updatedAt` — sortable only.
    UpdatedAt,
}

impl UserField {
    /// Resolve a camelCase wire name.
    pub fn from_wire(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Self::Id),
            "email" => Some(Self::Email),
            "firstName" => Some(Self::FirstName),
            "lastName" => Some(Self::LastName),
            "position" => Some(Self::Position),
            "phone" => Some(Self::Phone),
            "createdAt" => Some(Self::CreatedAt),
            "updatedAt" => Some(Self::UpdatedAt),
            _ => None,
        }
    }

    /// The camelCase name used on the wire.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Email => "email",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Position => "position",
            Self::Phone => "phone",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }

    fn is_text(self) -> bool {
        matches!(
            self,
            Self::Email | Self::FirstName | Self::LastName | Self::Position
        )
    }

    fn is_numeric(self) -> bool {
        matches!(self, Self::Id | Self::Phone)
    }
}

/// Comparison operator of a filter tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// `=` — exact equality under the store's collation.
    Equals,
    /// `contains` — case-insensitive substring containment.
    Contains,
    /// `startswith` — case-insensitive prefix match.
    StartsWith,
    /// `endswith` — case-insensitive suffix match.
    EndsWith,
}

impl FilterOp {
    /// Resolve a wire operator name.
    pub fn from_wire(op: &str) -> Option<Self> {
        match op {
            "=" => Some(Self::Equals),
            "contains" => Some(Self::Contains),
            "startswith" => Some(Self::StartsWith),
            "endswith" => Some(Self::EndsWith),
            _ => None,
        }
    }
}

/// Comparison value of a filter tuple, typed per target column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    /// Value compared against a text column.
    Text(String),
    /// Value compared against a numeric column.
    Number(i64),
}

/// One `(field, op, value)` condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFilter {
    /// Target column.
    pub field: UserField,
    /// Comparison operator.
    pub op: FilterOp,
    /// Comparison value.
    pub value: FilterValue,
}

/// A decoded filter expression: nothing, one condition, or an
/// AND-combination of conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    /// Match everything.
    Empty,
    /// A single flat tuple.
    Field(FieldFilter),
    /// A list of tuples, conjoined.
    All(Vec<FieldFilter>),
}

impl UserFilter {
    /// All conditions in declaration order.
    pub fn conditions(&self) -> &[FieldFilter] {
        match self {
            Self::Empty => &[],
            Self::Field(filter) => std::slice::from_ref(filter),
            Self::All(filters) => filters,
        }
    }

    /// Decode the grid's JSON filter shape.
    ///
    /// Accepts `[]`, a flat tuple `[field, op, value]`, or a list of tuples.
    /// Literal `"and"` separators between tuples are tolerated; everything
    /// else is rejected with an `invalid_request` error.
    pub fn from_wire(value: &Value) -> Result<Self, Error> {
        let Value::Array(items) = value else {
            return Err(filter_error("filter must be a JSON array", value));
        };
        if items.is_empty() {
            return Ok(Self::Empty);
        }

        // A flat tuple has a string field name in first position; a
        // composite filter has an array there.
        if items[0].is_array() {
            let mut filters = Vec::new();
            for item in items {
                if item.as_str() == Some("and") {
                    continue;
                }
                let Value::Array(tuple) = item else {
                    return Err(filter_error("filter entries must be [field, op, value] tuples", item));
                };
                filters.push(decode_tuple(tuple)?);
            }
            if filters.is_empty() {
                return Ok(Self::Empty);
            }
            Ok(Self::All(filters))
        } else {
            Ok(Self::Field(decode_tuple(items)?))
        }
    }
}

/// One entry of a sort expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortEntry {
    /// Column to order by.
    pub field: UserField,
    /// True for descending order.
    pub descending: bool,
}

/// Decode the grid's JSON sort shape: a list of `{selector, desc}` objects.
///
/// Entries translate 1:1, in list order, to the store's multi-key ordering;
/// earlier entries take precedence. An empty list means store default order.
pub fn sort_from_wire(value: &Value) -> Result<Vec<SortEntry>, Error> {
    let Value::Array(items) = value else {
        return Err(sort_error("sort must be a JSON array", value));
    };

    let mut entries = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(entry) = item else {
            return Err(sort_error("sort entries must be {selector, desc} objects", item));
        };
        let selector = entry
            .get("selector")
            .and_then(Value::as_str)
            .ok_or_else(|| sort_error("sort entry is missing a selector", item))?;
        let field = UserField::from_wire(selector).ok_or_else(|| {
            Error::invalid_request(format!("unknown sort selector: {selector}")).with_details(
                json!({ "selector": selector, "code": "unknown_field" }),
            )
        })?;
        let descending = entry.get("desc").and_then(Value::as_bool).unwrap_or(false);
        entries.push(SortEntry { field, descending });
    }
    Ok(entries)
}

fn decode_tuple(tuple: &[Value]) -> Result<FieldFilter, Error> {
    let [field, op, value] = tuple else {
        return Err(Error::invalid_request(
            "filter tuples must have exactly three elements",
        )
        .with_details(json!({ "tuple": tuple, "code": "invalid_tuple" })));
    };

    let field_name = field
        .as_str()
        .ok_or_else(|| filter_error("filter field must be a string", field))?;
    let field = UserField::from_wire(field_name).ok_or_else(|| {
        Error::invalid_request(format!("unknown filter field: {field_name}"))
            .with_details(json!({ "field": field_name, "code": "unknown_field" }))
    })?;

    let op_name = op
        .as_str()
        .ok_or_else(|| filter_error("filter operator must be a string", op))?;
    let op = FilterOp::from_wire(op_name).ok_or_else(|| {
        Error::invalid_request(format!("unknown filter operator: {op_name}"))
            .with_details(json!({ "operator": op_name, "code": "unknown_operator" }))
    })?;

    let value = decode_value(field, op, value)?;
    Ok(FieldFilter { field, op, value })
}

fn decode_value(field: UserField, op: FilterOp, value: &Value) -> Result<FilterValue, Error> {
    if field.is_text() {
        let text = value
            .as_str()
            .ok_or_else(|| filter_error("filter value must be a string", value))?;
        return Ok(FilterValue::Text(text.to_owned()));
    }

    if field.is_numeric() {
        if op != FilterOp::Equals {
            return Err(Error::invalid_request(format!(
                "operator is not supported for numeric field {}",
                field.wire_name()
            ))
            .with_details(json!({ "field": field.wire_name(), "code": "unsupported_operator" })));
        }
        // The grid serialises numeric cell values either as JSON numbers or
        // as their string rendering.
        let number = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.parse::<i64>().ok(),
            _ => None,
        };
        return number.map(FilterValue::Number).ok_or_else(|| {
            filter_error("filter value must be an integer", value)
        });
    }

    Err(Error::invalid_request(format!(
        "field {} cannot be filtered",
        field.wire_name()
    ))
    .with_details(json!({ "field": field.wire_name(), "code": "unsupported_field" })))
}

fn filter_error(message: &str, value: &Value) -> Error {
    Error::invalid_request(message).with_details(json!({ "value": value, "code": "invalid_filter" }))
}

fn sort_error(message: &str, value: &Value) -> Error {
    Error::invalid_request(message).with_details(json!({ "value": value, "code": "invalid_sort" }))
}
