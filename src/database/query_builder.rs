use std::collections::HashMap;
use std::time::Instant;

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{FromRow, PgConnection, Postgres};

use crate::config;
use crate::database::manager::DatabaseError;
use crate::filter::{SqlResult, SqlValue};

/// `SET` fragment of a partial update and the values its placeholders bind.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialUpdate {
    pub set_cols: String,
    pub values: Vec<SqlValue>,
}

impl PartialUpdate {
    /// Placeholder for the first parameter after the update values, usually
    /// the key of the row being updated.
    pub fn next_placeholder(&self) -> String {
        format!("${}", self.values.len() + 1)
    }
}

/// Turns a sparse update into `"col1"=$1, "col2"=$2` plus the matching values.
///
/// Fields are numbered in the order given. `js_to_sql` maps field names to
/// column names; fields missing from it are used as the column name as-is.
///
/// ```text
/// {firstName: "Aliya", age: 32} => "\"first_name\"=$1, \"age\"=$2", ["Aliya", 32]
/// ```
pub fn sql_for_partial_update<K>(
    data_to_update: Vec<(K, SqlValue)>,
    js_to_sql: &HashMap<&str, &str>,
) -> Result<PartialUpdate, DatabaseError>
where
    K: AsRef<str>,
{
    if data_to_update.is_empty() {
        return Err(DatabaseError::NoData);
    }

    let mut cols = Vec::with_capacity(data_to_update.len());
    let mut values = Vec::with_capacity(data_to_update.len());
    for (idx, (field, value)) in data_to_update.into_iter().enumerate() {
        let field = field.as_ref();
        let column = js_to_sql.get(field).copied().unwrap_or(field);
        cols.push(format!("\"{}\"=${}", column, idx + 1));
        values.push(value);
    }

    Ok(PartialUpdate {
        set_cols: cols.join(", "),
        values,
    })
}

/// Runs `sql` and maps every row into `T`.
pub async fn fetch_all<T>(conn: &mut PgConnection, sql: &SqlResult) -> Result<Vec<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let started = log_query(&sql.query, sql.params.len());
    let mut q = sqlx::query_as::<_, T>(&sql.query);
    for p in sql.params.iter() {
        q = bind_param_query_as(q, p);
    }
    let rows = q.fetch_all(&mut *conn).await?;
    log_slow_query(&sql.query, started);
    Ok(rows)
}

/// Runs `sql` and maps at most one row into `T`.
pub async fn fetch_optional<T>(conn: &mut PgConnection, sql: &SqlResult) -> Result<Option<T>, DatabaseError>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    let started = log_query(&sql.query, sql.params.len());
    let mut q = sqlx::query_as::<_, T>(&sql.query);
    for p in sql.params.iter() {
        q = bind_param_query_as(q, p);
    }
    let row = q.fetch_optional(&mut *conn).await?;
    log_slow_query(&sql.query, started);
    Ok(row)
}

fn log_query(query: &str, param_count: usize) -> Instant {
    if config::config().database.enable_query_logging {
        tracing::debug!(params = param_count, "SQL: {}", query);
    }
    Instant::now()
}

fn log_slow_query(query: &str, started: Instant) {
    let db = &config::config().database;
    if !db.enable_slow_query_warning {
        return;
    }
    let elapsed = started.elapsed();
    if elapsed.as_millis() as u64 >= db.slow_query_threshold_ms {
        tracing::warn!("Slow query ({} ms): {}", elapsed.as_millis(), query);
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, Postgres, O, PgArguments>,
    v: &'q SqlValue,
) -> sqlx::query::QueryAs<'q, Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match v {
        SqlValue::Bool(b) => q.bind(*b),
        SqlValue::Int(i) => q.bind(*i),
        SqlValue::Text(s) => q.bind(s.as_deref()),
        SqlValue::Decimal(d) => q.bind(d.as_ref()),
    }
}
