//! A single validated theme

use std::collections::BTreeSet;

use super::geometry::GeometryType;

/// One validated theme: a named set of OSM keys with an optional row filter
/// and an optional geometry-type subset.
///
/// Only document validation constructs a `Theme`, so every accessor can
/// assume the invariants hold: the name is legal and unreserved, the key
/// list is non-empty with every key well-formed, the filter passed
/// validation, and the slug was computed from the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub(crate) name: String,
    pub(crate) slug: String,
    pub(crate) selected_keys: Vec<String>,
    pub(crate) where_clause: Option<String>,
    pub(crate) types: Option<BTreeSet<GeometryType>>,
    pub(crate) filter_keys: BTreeSet<String>,
}

impl Theme {
    /// Theme name exactly as written in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Table-name prefix derived from the name at validation time.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Selected OSM keys in document order.
    pub fn selected_keys(&self) -> &[String] {
        &self.selected_keys
    }

    /// Row filter for the generated INSERT: the `where` clause as written,
    /// or the always-true clause `1` when the theme has none.
    pub fn filter_clause(&self) -> &str {
        self.where_clause.as_deref().unwrap_or("1")
    }

    /// Geometry types this theme produces tables for, in fixed order
    /// (points, lines, polygons).
    ///
    /// A theme without a `types` entry produces all three. An explicit empty
    /// list produces none.
    pub fn geometry_types(&self) -> Vec<GeometryType> {
        match &self.types {
            Some(set) => set.iter().copied().collect(),
            None => GeometryType::ALL.to_vec(),
        }
    }

    /// Whether this theme produces a table for the given geometry type.
    pub fn includes_geometry(&self, geometry: GeometryType) -> bool {
        match &self.types {
            Some(set) => set.contains(&geometry),
            None => true,
        }
    }

    /// Columns referenced by the `where` clause. Empty when the theme has no
    /// filter.
    pub fn filter_keys(&self) -> &BTreeSet<String> {
        &self.filter_keys
    }

    /// Name of the table this theme compiles to for one geometry type.
    pub fn table_name(&self, geometry: GeometryType) -> String {
        format!("{}_{}", self.slug, geometry)
    }

    /// Human-readable description of the theme, suitable for shipping
    /// alongside an export: the filter criteria, the selected keys with
    /// their OSM wiki pages, and the OpenStreetMap attribution notice.
    pub fn readme(&self) -> String {
        let keys: Vec<String> = self
            .selected_keys
            .iter()
            .map(|key| format!("{0} http://wiki.openstreetmap.org/wiki/Key:{0}", key))
            .collect();
        format!(
            "This theme includes features matching the filter:\n\n\
             {criteria}\n\n\
             This theme includes the following OpenStreetMap keys:\n\n\
             {keys}\n\n\
             (c) OpenStreetMap contributors.\n\n\
             This file is made available under the Open Database License: \
             http://opendatacommons.org/licenses/odbl/1.0/. Any rights in individual \
             contents of the database are licensed under the Database Contents License: \
             http://opendatacommons.org/licenses/dbcl/1.0/\n",
            criteria = self.filter_clause(),
            keys = keys.join("\n"),
        )
    }
}
