use serde::Deserialize;
use validator::Validate;

use super::filter_where::FilterWhere;

/// Query-string filters accepted by `GET /jobs`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JobFilter {
    #[validate(length(min = 1))]
    pub title: Option<String>,
    #[validate(range(min = 0))]
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
}

impl JobFilter {
    pub fn to_where(&self) -> FilterWhere {
        let mut filter_where = FilterWhere::new();
        if let Some(title) = self.title.as_deref() {
            filter_where.ilike_contains("title", title);
        }
        if let Some(min) = self.min_salary {
            filter_where.compare("salary", ">=", min);
        }
        // hasEquity=false means "don't care", not "no equity"
        if self.has_equity == Some(true) {
            filter_where.raw("equity > 0");
        }
        filter_where
    }
}
