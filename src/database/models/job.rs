use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::types::BigDecimal;
use sqlx::{FromRow, PgConnection};
use validator::Validate;

use super::deserialize_some;
use crate::database::manager::{DatabaseError, FOREIGN_KEY_VIOLATION};
use crate::database::query_builder::{self, sql_for_partial_update};
use crate::filter::{Filter, JobFilter, SqlResult, SqlValue};

// NUMERIC comes back as PostgreSQL renders it ("0.1", not "0.1000")
const JOB_COLUMNS: &str = "id, title, salary, equity::TEXT AS equity, company_handle";

static JOB_JS_TO_SQL: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("companyHandle", "company_handle")]));

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
    pub company_handle: String,
}

/// Share of the company offered with a job, a decimal string between 0 and 1.
///
/// Only JSON strings are accepted so the value keeps its exact decimal form.
#[derive(Debug, Clone, PartialEq)]
pub struct Equity(pub BigDecimal);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEquity(String);

impl fmt::Display for InvalidEquity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "equity must be a decimal string between 0 and 1, got \"{}\"", self.0)
    }
}

impl std::error::Error for InvalidEquity {}

impl FromStr for Equity {
    type Err = InvalidEquity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let well_formed = !s.is_empty()
            && s.chars().all(|c| c.is_ascii_digit() || c == '.')
            && s.chars().filter(|c| *c == '.').count() <= 1;
        if !well_formed {
            return Err(InvalidEquity(s.to_string()));
        }

        let value = BigDecimal::from_str(s).map_err(|_| InvalidEquity(s.to_string()))?;
        if value > BigDecimal::from(1) {
            return Err(InvalidEquity(s.to_string()));
        }
        Ok(Equity(value))
    }
}

impl<'de> Deserialize<'de> for Equity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Body of `POST /jobs`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewJob {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(range(min = 0))]
    pub salary: Option<i32>,
    pub equity: Option<Equity>,
    #[validate(length(min = 1, max = 25))]
    pub company_handle: String,
}

/// Body of `PATCH /jobs/:id`. The id and owning company cannot change.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobUpdate {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(range(min = 0))]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub equity: Option<Option<Equity>>,
}

impl JobUpdate {
    pub fn into_fields(self) -> Vec<(&'static str, SqlValue)> {
        let mut fields = Vec::new();
        if let Some(title) = self.title {
            fields.push(("title", SqlValue::from(title)));
        }
        if let Some(salary) = self.salary {
            fields.push(("salary", SqlValue::from(salary)));
        }
        if let Some(equity) = self.equity {
            fields.push(("equity", SqlValue::from(equity.map(|e| e.0))));
        }
        fields
    }
}

impl Job {
    pub async fn create(conn: &mut PgConnection, data: NewJob) -> Result<Job, DatabaseError> {
        let sql = format!(
            "INSERT INTO jobs (title, salary, equity, company_handle) VALUES ($1, $2, $3, $4) RETURNING {JOB_COLUMNS}"
        );
        let result = sqlx::query_as::<_, Job>(&sql)
            .bind(&data.title)
            .bind(data.salary)
            .bind(data.equity.as_ref().map(|e| &e.0))
            .bind(&data.company_handle)
            .fetch_one(&mut *conn)
            .await;

        match result {
            Ok(job) => {
                tracing::info!("Created job {} for {}", job.id, job.company_handle);
                Ok(job)
            }
            Err(e) => {
                let err = DatabaseError::from(e);
                if err.sqlstate().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                    Err(DatabaseError::InvalidInput(format!("No company: {}", data.company_handle)))
                } else {
                    Err(err)
                }
            }
        }
    }

    /// All jobs matching `filter`, in database order.
    pub async fn find_all(conn: &mut PgConnection, filter: &JobFilter) -> Result<Vec<Job>, DatabaseError> {
        let sql = Self::find_all_sql(filter);
        Self::fetch_matching(conn, &sql).await
    }

    pub async fn fetch_matching(conn: &mut PgConnection, sql: &SqlResult) -> Result<Vec<Job>, DatabaseError> {
        query_builder::fetch_all(conn, sql).await
    }

    pub fn find_all_sql(filter: &JobFilter) -> SqlResult {
        Filter::new(format!("SELECT {JOB_COLUMNS} FROM jobs"))
            .where_clause(filter.to_where())
            .to_sql()
    }

    pub async fn get(conn: &mut PgConnection, id: i32) -> Result<Job, DatabaseError> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn update(conn: &mut PgConnection, id: i32, data: JobUpdate) -> Result<Job, DatabaseError> {
        let sql = Self::update_sql(id, data)?;
        Self::apply_update(conn, id, &sql).await
    }

    /// Runs an update built by `update_sql`.
    pub async fn apply_update(conn: &mut PgConnection, id: i32, sql: &SqlResult) -> Result<Job, DatabaseError> {
        query_builder::fetch_optional::<Job>(conn, sql)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// `UPDATE` statement for `data`; fails with `NoData` when nothing is set.
    pub fn update_sql(id: i32, data: JobUpdate) -> Result<SqlResult, DatabaseError> {
        let update = sql_for_partial_update(data.into_fields(), &JOB_JS_TO_SQL)?;
        let query = format!(
            "UPDATE jobs SET {} WHERE id = {} RETURNING {JOB_COLUMNS}",
            update.set_cols,
            update.next_placeholder()
        );
        let mut params = update.values;
        params.push(SqlValue::from(id));
        Ok(SqlResult { query, params })
    }

    pub async fn remove(conn: &mut PgConnection, id: i32) -> Result<(), DatabaseError> {
        let deleted: Option<i32> = sqlx::query_scalar("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        match deleted {
            Some(_) => {
                tracing::info!("Deleted job {}", id);
                Ok(())
            }
            None => Err(not_found(id)),
        }
    }
}

pub(crate) fn not_found(id: impl fmt::Display) -> DatabaseError {
    DatabaseError::NotFound(format!("No job: {}", id))
}
