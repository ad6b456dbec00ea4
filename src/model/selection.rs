//! The frozen document model

use std::collections::BTreeSet;

use super::geometry::GeometryType;
use super::theme::Theme;

/// A fully validated theme document.
///
/// Only document validation constructs one, and nothing mutates it
/// afterwards, so holding a `ThemeSelection` is proof that every theme in it
/// passed every check. There is no partial model: validation either returns
/// a complete `ThemeSelection` or an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSelection {
    themes: Vec<Theme>,
}

impl ThemeSelection {
    pub(crate) fn new(themes: Vec<Theme>) -> Self {
        ThemeSelection { themes }
    }

    /// Themes in document order.
    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    /// Theme names in document order.
    pub fn theme_names(&self) -> Vec<&str> {
        self.themes.iter().map(|theme| theme.name()).collect()
    }

    /// Look up a theme by its document name.
    pub fn get_theme(&self, name: &str) -> Option<&Theme> {
        self.themes.iter().find(|theme| theme.name() == name)
    }

    /// Table-name prefixes in document order.
    pub fn slugs(&self) -> Vec<&str> {
        self.themes.iter().map(|theme| theme.slug()).collect()
    }

    /// Every table the document compiles to: themes in document order,
    /// geometry types in fixed order within each theme.
    pub fn table_names(&self) -> Vec<String> {
        self.themes
            .iter()
            .flat_map(|theme| {
                theme
                    .geometry_types()
                    .into_iter()
                    .map(move |geometry| theme.table_name(geometry))
            })
            .collect()
    }

    /// Sorted, deduplicated union of every key the document touches: each
    /// theme's selected keys plus the columns its filter references.
    ///
    /// With `Some(geometry)` the union covers only themes that produce a
    /// table for that geometry type.
    pub fn key_union(&self, geometry: Option<GeometryType>) -> Vec<String> {
        let mut keys = BTreeSet::new();
        for theme in &self.themes {
            if let Some(geometry) = geometry {
                if !theme.includes_geometry(geometry) {
                    continue;
                }
            }
            keys.extend(theme.selected_keys().iter().cloned());
            keys.extend(theme.filter_keys().iter().cloned());
        }
        keys.into_iter().collect()
    }

    /// Number of themes in the document.
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    /// Whether the document contains no themes.
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}
