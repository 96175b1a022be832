mod column;
mod where_clause;

pub use column::{column_clause, table_clause};
pub use where_clause::WhereClause;
