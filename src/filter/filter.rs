use super::filter_where::FilterWhere;
use super::types::SqlResult;

/// Assembles a listing statement from a fixed `SELECT ... FROM ...` prefix,
/// optional `WHERE` conditions and optional ascending `ORDER BY` columns.
pub struct Filter {
    select: String,
    where_data: FilterWhere,
    order_data: Vec<&'static str>,
}

impl Filter {
    pub fn new(select: impl Into<String>) -> Self {
        Self {
            select: select.into(),
            where_data: FilterWhere::new(),
            order_data: vec![],
        }
    }

    pub fn where_clause(mut self, conditions: FilterWhere) -> Self {
        self.where_data = conditions;
        self
    }

    pub fn order(mut self, column: &'static str) -> Self {
        self.order_data.push(column);
        self
    }

    pub fn to_sql(self) -> SqlResult {
        let (where_clause, params) = self.where_data.generate();
        let order_clause = self.order_data.join(", ");

        let query = [
            self.select.trim().to_string(),
            if where_clause.is_empty() { String::new() } else { format!("WHERE {}", where_clause) },
            if order_clause.is_empty() { String::new() } else { format!("ORDER BY {}", order_clause) },
        ]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

        SqlResult { query, params }
    }
}
