//! Rendering of compiled queries into `sea-query` conditions.
//!
//! Field names are resolved against the entity's columns before rendering.
//! A name that matches no column is an error rather than a skipped
//! predicate, so a typo can never widen a bulk delete.

use sea_orm::sea_query::{Alias, Expr, SimpleExpr};
use sea_orm::{
    Condition, EntityTrait, IdenStatic, Iterable, Order, QueryFilter, QueryOrder,
    QuerySelect, Select,
};
use serde_json::Value as Json;

use crate::query::{CompiledQuery, Predicate, SortDir};
use crate::StoreError;

/// Largest limit every backend accepts; stands in for "no limit".
const UNBOUNDED_LIMIT: u64 = i64::MAX.unsigned_abs();

/// Look up the column whose name is `field`.
pub fn resolve_column<E: EntityTrait>(field: &str) -> Option<E::Column> {
    E::Column::iter().find(|c| c.as_str() == field)
}

fn table_name<E: EntityTrait>() -> String {
    E::default().table_name().to_owned()
}

fn column<E: EntityTrait>(field: &str) -> Result<E::Column, StoreError> {
    resolve_column::<E>(field).ok_or_else(|| StoreError::unknown_field(table_name::<E>(), field))
}

/// Convert a JSON scalar into a bindable `sea-orm` value.
fn bind_value(field: &str, v: &Json) -> Result<sea_orm::Value, StoreError> {
    let bound = match v {
        Json::String(s) => sea_orm::Value::from(s.clone()),
        Json::Bool(b) => sea_orm::Value::from(*b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                sea_orm::Value::from(i)
            } else if let Some(u) = n.as_u64() {
                sea_orm::Value::from(u)
            } else if let Some(f) = n.as_f64() {
                sea_orm::Value::from(f)
            } else {
                return Err(unbindable(field, v));
            }
        }
        Json::Null | Json::Array(_) | Json::Object(_) => return Err(unbindable(field, v)),
    };
    Ok(bound)
}

fn unbindable(field: &str, v: &Json) -> StoreError {
    StoreError::Unbindable {
        field: field.to_owned(),
        value: v.to_string(),
    }
}

fn predicate_expr<E: EntityTrait>(alias: &str, p: &Predicate) -> Result<SimpleExpr, StoreError> {
    let col = |field: &str| -> Result<Expr, StoreError> {
        Ok(Expr::col((Alias::new(alias), column::<E>(field)?)))
    };
    let expr = match p {
        Predicate::Equals { field, value } => col(field)?.eq(bind_value(field, value)?),
        Predicate::Like { field, pattern } => col(field)?.like(pattern.as_str()),
        Predicate::In { field, values } => {
            let bound = values
                .iter()
                .map(|v| bind_value(field, v))
                .collect::<Result<Vec<_>, _>>()?;
            col(field)?.is_in(bound)
        }
        Predicate::Raw { sql, values } => {
            let bound = values
                .iter()
                .map(|v| bind_value("<raw>", v))
                .collect::<Result<Vec<_>, _>>()?;
            Expr::cust_with_values(sql.as_str(), bound)
        }
    };
    Ok(expr)
}

/// AND all predicates together. An empty slice yields an unrestricted
/// condition.
///
/// # Errors
/// [`StoreError::UnknownField`] when a predicate names no column of `E`;
/// [`StoreError::Unbindable`] for values that are not JSON scalars.
pub fn build_condition<E: EntityTrait>(
    alias: &str,
    predicates: &[Predicate],
) -> Result<Condition, StoreError> {
    predicates
        .iter()
        .try_fold(Condition::all(), |cond, p| Ok(cond.add(predicate_expr::<E>(alias, p)?)))
}

/// Apply filter, ordering and paging of `q` to `select`.
///
/// An ordering on an unknown field is dropped with a warning; it cannot
/// change which rows match.
///
/// # Errors
/// See [`build_condition`].
pub fn apply_query<E: EntityTrait>(
    select: Select<E>,
    q: &CompiledQuery,
) -> Result<Select<E>, StoreError> {
    let mut select = apply_filter(select, q)?;

    if let Some(order) = &q.order {
        if let Some(col) = resolve_column::<E>(&order.field) {
            let dir = match order.direction {
                SortDir::Asc => Order::Asc,
                SortDir::Desc => Order::Desc,
            };
            select = select.order_by(col, dir);
        } else {
            tracing::warn!(field = %order.field, "sort on unknown field ignored");
        }
    }
    if let Some(offset) = q.offset {
        select = select.offset(offset);
    }
    // SQLite accepts OFFSET only after a LIMIT.
    match (q.offset, q.limit) {
        (_, Some(limit)) => select = select.limit(limit),
        (Some(_), None) => select = select.limit(UNBOUNDED_LIMIT),
        (None, None) => {}
    }
    Ok(select)
}

/// Apply only the filter of `q`, for counting.
///
/// # Errors
/// See [`build_condition`].
pub fn apply_filter<E: EntityTrait>(
    select: Select<E>,
    q: &CompiledQuery,
) -> Result<Select<E>, StoreError> {
    if q.predicates.is_empty() {
        return Ok(select);
    }
    Ok(select.filter(build_condition::<E>(&q.alias, &q.predicates)?))
}
