use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgConnection};
use validator::{Validate, ValidationError};

use super::deserialize_some;
use crate::database::manager::{DatabaseError, CHECK_VIOLATION, UNIQUE_VIOLATION};
use crate::database::query_builder::{self, sql_for_partial_update};
use crate::filter::{CompanyFilter, Filter, SqlResult, SqlValue};

const COMPANY_COLUMNS: &str = "handle, name, description, num_employees, logo_url";

static COMPANY_JS_TO_SQL: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| HashMap::from([("numEmployees", "num_employees"), ("logoUrl", "logo_url")]));

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub handle: String,
    pub name: String,
    pub description: String,
    pub num_employees: Option<i32>,
    pub logo_url: Option<String>,
}

/// Job summary embedded in a company detail. `equity` is PostgreSQL's own
/// text rendering of the NUMERIC value.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct CompanyJob {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub jobs: Vec<CompanyJob>,
}

/// Body of `POST /companies`
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NewCompany {
    #[validate(length(min = 1, max = 25), custom(function = "lowercase_handle"))]
    pub handle: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub description: String,
    #[validate(range(min = 0))]
    pub num_employees: Option<i32>,
    #[validate(url)]
    pub logo_url: Option<String>,
}

/// Body of `PATCH /companies/:handle`. `null` clears a nullable column.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyUpdate {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(range(min = 0))]
    pub num_employees: Option<Option<i32>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    #[validate(url)]
    pub logo_url: Option<Option<String>>,
}

fn lowercase_handle(handle: &str) -> Result<(), ValidationError> {
    if handle.chars().any(|c| c.is_uppercase()) {
        return Err(ValidationError::new("lowercase").with_message("handle must be lowercase".into()));
    }
    Ok(())
}

impl CompanyUpdate {
    /// Fields present in the request, keyed by their JSON name
    pub fn into_fields(self) -> Vec<(&'static str, SqlValue)> {
        let mut fields = Vec::new();
        if let Some(name) = self.name {
            fields.push(("name", SqlValue::from(name)));
        }
        if let Some(description) = self.description {
            fields.push(("description", SqlValue::from(description)));
        }
        if let Some(num_employees) = self.num_employees {
            fields.push(("numEmployees", SqlValue::from(num_employees)));
        }
        if let Some(logo_url) = self.logo_url {
            fields.push(("logoUrl", SqlValue::from(logo_url)));
        }
        fields
    }
}

impl Company {
    /// Insert a company. Fails with a client error if the handle is taken.
    pub async fn create(conn: &mut PgConnection, data: NewCompany) -> Result<Company, DatabaseError> {
        let duplicate: Option<String> = sqlx::query_scalar("SELECT handle FROM companies WHERE handle = $1")
            .bind(&data.handle)
            .fetch_optional(&mut *conn)
            .await?;

        if duplicate.is_some() {
            return Err(duplicate_company(&data.handle));
        }

        let sql = format!(
            "INSERT INTO companies ({COMPANY_COLUMNS}) VALUES ($1, $2, $3, $4, $5) RETURNING {COMPANY_COLUMNS}"
        );
        let result = sqlx::query_as::<_, Company>(&sql)
            .bind(&data.handle)
            .bind(&data.name)
            .bind(&data.description)
            .bind(data.num_employees)
            .bind(&data.logo_url)
            .fetch_one(&mut *conn)
            .await;

        match result {
            Ok(company) => {
                tracing::info!("Created company {}", company.handle);
                Ok(company)
            }
            Err(e) => {
                let err = DatabaseError::from(e);
                match err.sqlstate().as_deref() {
                    Some(UNIQUE_VIOLATION) => Err(duplicate_company(&data.handle)),
                    Some(CHECK_VIOLATION) => Err(invalid_company(&data.handle)),
                    _ => Err(err),
                }
            }
        }
    }

    /// All companies matching `filter`, ordered by name.
    pub async fn find_all(conn: &mut PgConnection, filter: &CompanyFilter) -> Result<Vec<Company>, DatabaseError> {
        let sql = Self::find_all_sql(filter)?;
        Self::fetch_matching(conn, &sql).await
    }

    /// Listing query for `filter`. Rejects an inverted employee range
    /// without touching the database.
    pub fn find_all_sql(filter: &CompanyFilter) -> Result<SqlResult, DatabaseError> {
        let conditions = filter.to_where()?;
        Ok(Filter::new(format!("SELECT {COMPANY_COLUMNS} FROM companies"))
            .where_clause(conditions)
            .order("name")
            .to_sql())
    }

    /// Runs a listing query built by `find_all_sql`.
    pub async fn fetch_matching(conn: &mut PgConnection, sql: &SqlResult) -> Result<Vec<Company>, DatabaseError> {
        query_builder::fetch_all(conn, sql).await
    }

    /// A company and its jobs.
    pub async fn get(conn: &mut PgConnection, handle: &str) -> Result<CompanyDetail, DatabaseError> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE handle = $1");
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(handle)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| not_found(handle))?;

        let jobs = sqlx::query_as::<_, CompanyJob>(
            "SELECT id, title, salary, equity::TEXT AS equity FROM jobs WHERE company_handle = $1 ORDER BY id",
        )
        .bind(&company.handle)
        .fetch_all(&mut *conn)
        .await?;

        Ok(CompanyDetail { company, jobs })
    }

    /// Partial update; only the fields present in `data` change.
    pub async fn update(conn: &mut PgConnection, handle: &str, data: CompanyUpdate) -> Result<Company, DatabaseError> {
        let sql = Self::update_sql(handle, data)?;
        Self::apply_update(conn, handle, &sql).await
    }

    /// `UPDATE` statement for `data`; fails with `NoData` when nothing is set.
    pub fn update_sql(handle: &str, data: CompanyUpdate) -> Result<SqlResult, DatabaseError> {
        let update = sql_for_partial_update(data.into_fields(), &COMPANY_JS_TO_SQL)?;
        let query = format!(
            "UPDATE companies SET {} WHERE handle = {} RETURNING {COMPANY_COLUMNS}",
            update.set_cols,
            update.next_placeholder()
        );
        let mut params = update.values;
        params.push(SqlValue::from(handle));
        Ok(SqlResult { query, params })
    }

    /// Runs an update built by `update_sql`.
    pub async fn apply_update(conn: &mut PgConnection, handle: &str, sql: &SqlResult) -> Result<Company, DatabaseError> {
        match query_builder::fetch_optional::<Company>(conn, sql).await {
            Ok(Some(company)) => Ok(company),
            Ok(None) => Err(not_found(handle)),
            Err(err) => match err.sqlstate().as_deref() {
                Some(UNIQUE_VIOLATION) => Err(DatabaseError::InvalidInput("Duplicate company name".to_string())),
                Some(CHECK_VIOLATION) => Err(invalid_company(handle)),
                _ => Err(err),
            },
        }
    }

    pub async fn remove(conn: &mut PgConnection, handle: &str) -> Result<(), DatabaseError> {
        let deleted: Option<String> = sqlx::query_scalar("DELETE FROM companies WHERE handle = $1 RETURNING handle")
            .bind(handle)
            .fetch_optional(&mut *conn)
            .await?;

        match deleted {
            Some(_) => {
                tracing::info!("Deleted company {}", handle);
                Ok(())
            }
            None => Err(not_found(handle)),
        }
    }
}

fn duplicate_company(handle: &str) -> DatabaseError {
    DatabaseError::InvalidInput(format!("Duplicate company: {}", handle))
}

fn invalid_company(handle: &str) -> DatabaseError {
    DatabaseError::InvalidInput(format!("Invalid company data: {}", handle))
}

fn not_found(handle: &str) -> DatabaseError {
    DatabaseError::NotFound(format!("No company: {}", handle))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_all_without_filters_orders_by_name() {
        let sql = Company::find_all_sql(&CompanyFilter::default()).unwrap();
        assert_eq!(
            sql.query,
            "SELECT handle, name, description, num_employees, logo_url FROM companies ORDER BY name"
        );
        assert!(sql.params.is_empty());
    }

    #[test]
    fn find_all_with_filters() {
        let filter = CompanyFilter {
            min_employees: Some(1),
            max_employees: None,
            name: Some("c".to_string()),
        };
        let sql = Company::find_all_sql(&filter).unwrap();
        assert!(sql
            .query
            .ends_with("FROM companies WHERE num_employees >= $1 AND name ILIKE $2 ORDER BY name"));
        assert_eq!(sql.params, vec![SqlValue::from(1), SqlValue::from("%c%")]);
    }

    #[test]
    fn find_all_rejects_inverted_range() {
        let filter = CompanyFilter {
            min_employees: Some(10),
            max_employees: Some(1),
            name: None,
        };
        assert!(matches!(
            Company::find_all_sql(&filter),
            Err(DatabaseError::Filter(_))
        ));
    }

    #[test]
    fn update_appends_handle_after_values() {
        let data = CompanyUpdate {
            description: Some("new data".to_string()),
            num_employees: Some(Some(7)),
            ..Default::default()
        };
        let sql = Company::update_sql("c1", data).unwrap();
        assert!(sql
            .query
            .starts_with("UPDATE companies SET \"description\"=$1, \"num_employees\"=$2 WHERE handle = $3"));
        assert_eq!(
            sql.params,
            vec![SqlValue::from("new data"), SqlValue::from(7), SqlValue::from("c1")]
        );
    }

    #[test]
    fn update_null_clears_column() {
        let data: CompanyUpdate = serde_json::from_value(serde_json::json!({ "logoUrl": null })).unwrap();
        let sql = Company::update_sql("c1", data).unwrap();
        assert!(sql.query.contains("SET \"logo_url\"=$1 WHERE handle = $2"));
        assert_eq!(sql.params[0], SqlValue::Text(None));
    }

    #[test]
    fn empty_update_is_no_data() {
        let err = Company::update_sql("c1", CompanyUpdate::default()).unwrap_err();
        assert!(matches!(err, DatabaseError::NoData));
    }

    #[test]
    fn update_rejects_handle_change() {
        let parsed = serde_json::from_value::<CompanyUpdate>(serde_json::json!({ "handle": "c1-new" }));
        assert!(parsed.is_err());
    }

    #[test]
    fn new_company_validation() {
        let ok: NewCompany = serde_json::from_value(serde_json::json!({
            "handle": "new",
            "name": "New",
            "description": "New Description",
            "numEmployees": 10,
            "logoUrl": "http://new.img"
        }))
        .unwrap();
        assert!(ok.validate().is_ok());

        let bad: NewCompany = serde_json::from_value(serde_json::json!({
            "handle": "",
            "name": "New",
            "description": "d",
            "numEmployees": -1
        }))
        .unwrap();
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("handle"));
        assert_eq!(errors.field_errors().len(), 2);
    }

    #[test]
    fn new_company_handle_must_be_lowercase() {
        let upper: NewCompany = serde_json::from_value(serde_json::json!({
            "handle": "Upper",
            "name": "Upper",
            "description": "d"
        }))
        .unwrap();
        let errors = upper.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("handle"));
    }

    #[test]
    fn detail_serializes_flat_with_jobs() {
        let detail = CompanyDetail {
            company: Company {
                handle: "c1".to_string(),
                name: "C1".to_string(),
                description: "Desc1".to_string(),
                num_employees: Some(1),
                logo_url: None,
            },
            jobs: vec![],
        };
        let v = serde_json::to_value(&detail).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "handle": "c1",
                "name": "C1",
                "description": "Desc1",
                "numEmployees": 1,
                "logoUrl": null,
                "jobs": []
            })
        );
    }
}
