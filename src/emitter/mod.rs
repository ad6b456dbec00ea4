//! SQL emitter (verb module)
//!
//! Compiles a validated model into GeoPackage SQL statement blocks.

mod sql;

pub use sql::{emit_sql, table_columns, Column, ColumnKind, EmittedSql, Z_INDEX_TRIGGER_KEYS};
