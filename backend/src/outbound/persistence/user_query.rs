//! Translation of grid filter/sort expressions into Diesel clauses.
//!
//! The domain decodes and validates the grid's untyped wire shapes, so this
//! module only has to map well-typed conditions onto the `users` table:
//! substring operators become escaped `ILIKE` patterns (case-insensitive),
//! equality uses the column's native comparison, and sort entries append to
//! the query's `ORDER BY` in list order.

use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::Bool;

use crate::domain::query::{FieldFilter, FilterOp, FilterValue, SortEntry, UserField, UserFilter};

use super::schema::users;

/// A dynamically built predicate over the users table.
pub(super) type BoxedCondition = Box<dyn BoxableExpression<users::table, Pg, SqlType = Bool>>;

/// The boxed form of a select over the users table.
pub(super) type BoxedUsersQuery<'a> = users::BoxedQuery<'a, Pg>;

/// Escape LIKE wildcards so filter values match literally.
fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn contains_pattern(value: &str) -> String {
    format!("%{}%", escape_like(value))
}

fn prefix_pattern(value: &str) -> String {
    format!("{}%", escape_like(value))
}

fn suffix_pattern(value: &str) -> String {
    format!("%{}", escape_like(value))
}

/// Build the predicate equivalent to the AND of the filter's conditions.
///
/// `UserFilter::Empty` yields `None`: match everything.
pub(super) fn filter_predicate(filter: &UserFilter) -> Option<BoxedCondition> {
    let mut predicate: Option<BoxedCondition> = None;
    for condition in filter.conditions() {
        let next = condition_expression(condition);
        predicate = Some(match predicate {
            Some(prior) => Box::new(prior.and(next)),
            None => next,
        });
    }
    predicate
}

fn condition_expression(condition: &FieldFilter) -> BoxedCondition {
    macro_rules! text_condition {
        ($column:expr, $value:expr) => {
            match condition.op {
                FilterOp::Equals => Box::new($column.eq($value.clone())) as BoxedCondition,
                FilterOp::Contains => Box::new($column.ilike(contains_pattern($value))),
                FilterOp::StartsWith => Box::new($column.ilike(prefix_pattern($value))),
                FilterOp::EndsWith => Box::new($column.ilike(suffix_pattern($value))),
            }
        };
    }

    match (condition.field, &condition.value) {
        (UserField::Email, FilterValue::Text(value)) => text_condition!(users::email, value),
        (UserField::FirstName, FilterValue::Text(value)) => {
            text_condition!(users::first_name, value)
        }
        (UserField::LastName, FilterValue::Text(value)) => text_condition!(users::last_name, value),
        (UserField::Position, FilterValue::Text(value)) => text_condition!(users::position, value),
        (UserField::Id, FilterValue::Number(value)) => match i32::try_from(*value) {
            Ok(id) => Box::new(users::id.eq(id)),
            // Out of range for the key column: no row can match.
            Err(_) => Box::new(diesel::dsl::sql::<Bool>("FALSE")),
        },
        (UserField::Phone, FilterValue::Number(value)) => Box::new(users::phone.eq(*value)),
        // Decode guarantees field/value compatibility; anything else matches
        // no rows rather than guessing a comparison.
        _ => Box::new(diesel::dsl::sql::<Bool>("FALSE")),
    }
}

/// Append one ordering key per sort entry, earlier entries first.
pub(super) fn apply_sort<'a>(
    mut query: BoxedUsersQuery<'a>,
    sort: &[SortEntry],
) -> BoxedUsersQuery<'a> {
    for entry in sort {
        macro_rules! order_by {
            ($column:expr) => {
                if entry.descending {
                    query.then_order_by($column.desc())
                } else {
                    query.then_order_by($column.asc())
                }
            };
        }

        query = match entry.field {
            UserField::Id => order_by!(users::id),
            UserField::Email => order_by!(users::email),
            UserField::FirstName => order_by!(users::first_name),
            UserField::LastName => order_by!(users::last_name),
            UserField::Position => order_by!(users::position),
            UserField::Phone => order_by!(users::phone),
            UserField::CreatedAt => order_by!(users::created_at),
            UserField::UpdatedAt => order_by!(users::updated_at),
        };
    }
    query
}
