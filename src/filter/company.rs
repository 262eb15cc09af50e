use serde::Deserialize;
use validator::Validate;

use super::error::FilterError;
use super::filter_where::FilterWhere;

/// Query-string filters accepted by `GET /companies`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CompanyFilter {
    #[validate(range(min = 0))]
    pub min_employees: Option<i32>,
    #[validate(range(min = 0))]
    pub max_employees: Option<i32>,
    #[validate(length(min = 1))]
    pub name: Option<String>,
}

impl CompanyFilter {
    /// Builds the `WHERE` conditions for this filter.
    ///
    /// Fails before producing any SQL when `minEmployees > maxEmployees`.
    pub fn to_where(&self) -> Result<FilterWhere, FilterError> {
        if let (Some(min), Some(max)) = (self.min_employees, self.max_employees) {
            if min > max {
                return Err(FilterError::InvalidRange {
                    min: "minEmployees",
                    max: "maxEmployees",
                });
            }
        }

        let mut filter_where = FilterWhere::new();
        if let Some(min) = self.min_employees {
            filter_where.compare("num_employees", ">=", min);
        }
        if let Some(max) = self.max_employees {
            filter_where.compare("num_employees", "<=", max);
        }
        if let Some(name) = self.name.as_deref().filter(|n| !n.is_empty()) {
            filter_where.ilike_contains("name", name);
        }
        Ok(filter_where)
    }
}
