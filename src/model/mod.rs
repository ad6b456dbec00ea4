//! Validated document model (nouns)
//!
//! These types are the output of document validation and the input to SQL
//! emission. All construction goes through the parser, so a model in hand is
//! always wholly valid.

mod geometry;
mod selection;
mod theme;

pub use geometry::{GeometryType, ParseGeometryTypeError};
pub use selection::ThemeSelection;
pub use theme::Theme;
