use super::types::SqlValue;

/// Accumulates `WHERE` conditions and their bound values.
///
/// Placeholders are numbered from the length of the value list at the time a
/// condition is added, so conditions without a parameter (`equity > 0`) never
/// shift the numbering of the ones that follow.
#[derive(Debug, Default)]
pub struct FilterWhere {
    conditions: Vec<String>,
    param_values: Vec<SqlValue>,
}

impl FilterWhere {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<column> <op> $n`
    pub fn compare(&mut self, column: &str, op: &str, value: impl Into<SqlValue>) -> &mut Self {
        let placeholder = self.param(value.into());
        self.conditions.push(format!("{} {} {}", column, op, placeholder));
        self
    }

    /// Case-insensitive substring match, the value is wrapped in `%` wildcards.
    pub fn ilike_contains(&mut self, column: &str, needle: &str) -> &mut Self {
        self.compare(column, "ILIKE", format!("%{}%", needle))
    }

    /// A fixed condition that binds nothing.
    pub fn raw(&mut self, condition: impl Into<String>) -> &mut Self {
        self.conditions.push(condition.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.param_values
    }

    /// Joined conditions (without the `WHERE` keyword) and the bound values.
    /// The clause is empty when no condition was added.
    pub fn generate(self) -> (String, Vec<SqlValue>) {
        (self.conditions.join(" AND "), self.param_values)
    }

    fn param(&mut self, value: SqlValue) -> String {
        self.param_values.push(value);
        format!("${}", self.param_values.len())
    }
}
