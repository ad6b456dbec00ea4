//! themepack - Compile thematic OSM layer documents to GeoPackage SQL
//!
//! This library provides:
//! - Parsing and validation of user-authored theme documents (YAML)
//! - A frozen, always-valid model with read accessors (themes, slugs,
//!   geometry types, key unions, table names)
//! - Safe validation of user-supplied SQL `where` filters against a
//!   restricted boolean grammar
//! - Deterministic emission of the CREATE/INSERT and catalog/spatial-index
//!   statement blocks that build a thematic GeoPackage
//!
//! # Architecture
//!
//! **Noun modules** (data structures):
//! - `model/` - the validated document (ThemeSelection, Theme, GeometryType)
//!
//! **Verb modules** (transformations):
//! - `parser/` - YAML text → ThemeSelection (single fail-fast validation pass)
//! - `filter/` - `where` clause → referenced columns, or rejection
//! - `emitter/` - ThemeSelection → SQL statement blocks
//!
//! # Example
//!
//! ```
//! use themepack::{parse_str, emit_sql};
//!
//! let selection = parse_str(
//!     "Cafes:\n  select:\n    - amenity\n    - name\n  where: amenity = 'cafe'\n",
//! )
//! .unwrap();
//! assert_eq!(selection.table_names()[0], "cafes_points");
//!
//! let emitted = emit_sql(&selection);
//! assert!(emitted.create[0].starts_with("CREATE TABLE cafes_points("));
//! ```

pub mod emitter;
pub mod error;
pub mod filter;
pub mod model;
pub mod parser;
pub mod slug;

// Re-export commonly used types
pub use emitter::{emit_sql, table_columns, Column, ColumnKind, EmittedSql, Z_INDEX_TRIGGER_KEYS};
pub use error::ValidateError;
pub use filter::{FilterError, FilterValidator, SqlValidator};
pub use model::{GeometryType, ParseGeometryTypeError, Theme, ThemeSelection};
pub use parser::{parse_file, parse_str, parse_str_with, RESERVED_THEME_NAMES};
pub use slug::slugify;
