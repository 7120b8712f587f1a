//! Message table model: raw rows, derived rows and the cleaned table

mod derived;
mod row;
mod value;


pub use derived::{CleanedTable, DerivedRow, DerivedTable, Features, SentimentClass};
pub use row::{RawTable, Row, RowId, SchemaError};
pub use value::Value;

pub use row::columns;
