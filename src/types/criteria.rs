use crate::types::SqlValue;

/// A raw SQL boolean expression plus the values bound to its `$n` placeholders.
///
/// The placeholder count is not checked against `values`; a mismatch is
/// reported by the server when the statement executes.
///
/// Values are sent in binary and must suit the placeholder's type: integers
/// and floats are widened or narrowed to fit, but a `Text` value bound to a
/// numeric or date placeholder is rejected rather than coerced. Cast the
/// placeholder (`id = $1::text::int`) or bind the matching variant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WhereCriteria {
    pub clause: String,
    pub values: Vec<SqlValue>,
}

impl WhereCriteria {
    pub fn new(clause: impl Into<String>) -> Self {
        Self {
            clause: clause.into(),
            values: Vec::new(),
        }
    }

    /// Bind the next placeholder value.
    pub fn bind<V: Into<SqlValue>>(mut self, value: V) -> Self {
        self.values.push(value.into());
        self
    }
}

/// Criteria for a select: projection, filter, ordering and paging.
/// Empty vectors mean "not specified".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectCriteria {
    pub columns: Vec<String>,
    pub where_criteria: Option<WhereCriteria>,
    pub order_by: Vec<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

impl SelectCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn where_(mut self, criteria: WhereCriteria) -> Self {
        self.where_criteria = Some(criteria);
        self
    }

    pub fn order_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.order_by = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }
}
