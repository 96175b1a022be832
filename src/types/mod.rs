mod criteria;
mod options;
mod row;
mod schema;
mod sql_value;

pub use criteria::{SelectCriteria, WhereCriteria};
pub use options::{
    AddColumnOptions, AddIndexOptions, AddTableOptions, DropColumnOptions, DropForeignKeyOptions,
    DropIndexOptions, DropTableOptions,
};
pub use row::{DataObject, RawQueryResult};
pub use schema::{
    ColumnAttributes, DataType, ForeignKeyAttributes, IndexAttributes, ReferentialAction,
    TableAttributes,
};
pub use sql_value::SqlValue;
