//! SQL emitter
//!
//! Compiles a validated model into the statement blocks that build a
//! thematic GeoPackage: one CREATE-and-populate block per (theme, geometry
//! type) table, and one catalog/spatial-index block per table. Emission
//! never fails: the model already passed validation, so an inconsistency
//! here is a programming error, not a runtime condition.

use crate::model::{GeometryType, Theme, ThemeSelection};

/// Keys whose selection makes a table carry a derived `z_index` rendering
/// order column. Fixed domain list, consulted against `select` only.
pub const Z_INDEX_TRIGGER_KEYS: [&str; 5] = ["highway", "railway", "bridge", "tunnel", "layer"];

/// How a column ended up in a theme table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// OSM identifier column copied from the source table
    FeatureId,
    /// A selected OSM tag key
    Tag,
    /// The derived rendering-order column
    ZIndex,
}

/// One column of a compiled theme table.
///
/// The same value renders both as a CREATE definition and as an INSERT
/// reference, so the two lists cannot disagree in content or order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    /// Rendering in the CREATE TABLE column list. Tag keys are quoted
    /// because they may contain spaces or colons.
    pub fn definition(&self) -> String {
        match self.kind {
            ColumnKind::FeatureId => format!("{} TEXT", self.name),
            ColumnKind::Tag => format!("\"{}\" TEXT", self.name),
            ColumnKind::ZIndex => format!("{} INTEGER(4) DEFAULT 0", self.name),
        }
    }

    /// Rendering in the INSERT column and select lists.
    pub fn reference(&self) -> String {
        match self.kind {
            ColumnKind::FeatureId => self.name.clone(),
            ColumnKind::Tag | ColumnKind::ZIndex => format!("\"{}\"", self.name),
        }
    }
}

/// The compiled output: parallel statement-block lists with one entry in
/// each per (theme, geometry type) table, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedSql {
    pub create: Vec<String>,
    pub index: Vec<String>,
}

/// Compile every table of the selection, themes in document order and
/// geometry types in fixed order within each theme.
pub fn emit_sql(selection: &ThemeSelection) -> EmittedSql {
    let mut create = Vec::new();
    let mut index = Vec::new();
    for theme in selection.themes() {
        for geometry in theme.geometry_types() {
            let table = theme.table_name(geometry);
            let columns = table_columns(theme, geometry);
            create.push(create_table_block(
                &table,
                geometry,
                &columns,
                theme.filter_clause(),
            ));
            index.push(format!(
                "{}{}",
                catalog_block(&table, geometry),
                spatial_index_block(&table)
            ));
        }
    }
    EmittedSql { create, index }
}

/// Column list of one compiled table: the geometry type's identifier
/// columns, then the theme's selected keys, then `z_index` when a trigger
/// key was selected.
pub fn table_columns(theme: &Theme, geometry: GeometryType) -> Vec<Column> {
    let mut columns: Vec<Column> = geometry
        .id_columns()
        .iter()
        .map(|name| Column {
            name: name.to_string(),
            kind: ColumnKind::FeatureId,
        })
        .collect();
    for key in theme.selected_keys() {
        columns.push(Column {
            name: key.clone(),
            kind: ColumnKind::Tag,
        });
    }
    if needs_z_index(theme) {
        columns.push(Column {
            name: "z_index".to_string(),
            kind: ColumnKind::ZIndex,
        });
    }
    columns
}

fn needs_z_index(theme: &Theme) -> bool {
    theme
        .selected_keys()
        .iter()
        .any(|key| Z_INDEX_TRIGGER_KEYS.contains(&key.as_str()))
}

// ---------------------------------------------------------------------------
// Statement builders
// ---------------------------------------------------------------------------

/// CREATE TABLE plus the INSERT ... SELECT that populates it from the
/// ogr2ogr source table. The filter is always parenthesized so operator
/// precedence cannot leak across the clause boundary.
fn create_table_block(
    table: &str,
    geometry: GeometryType,
    columns: &[Column],
    filter: &str,
) -> String {
    let definitions: Vec<String> = columns
        .iter()
        .map(|column| format!("  {}", column.definition()))
        .collect();
    let references = columns
        .iter()
        .map(Column::reference)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE {table}(\n  fid INTEGER PRIMARY KEY AUTOINCREMENT,\n  geom {wkt},\n{definitions}\n);\nINSERT INTO {table}(geom, {references}) SELECT geom, {references} FROM {source} WHERE ({filter});\n",
        wkt = geometry.wkt_type(),
        definitions = definitions.join(",\n"),
        source = geometry.source_table(),
    )
}

/// GeoPackage catalog registration: the gpkg_contents row and the
/// gpkg_geometry_columns row for one table.
fn catalog_block(table: &str, geometry: GeometryType) -> String {
    format!(
        "INSERT INTO gpkg_contents (table_name, data_type, identifier, srs_id) VALUES ('{table}', 'features', '{table}', '4326');\nINSERT INTO gpkg_geometry_columns VALUES ('{table}', 'geom', '{wkt}', '4326', '0', '0');\n",
        wkt = geometry.wkt_type(),
    )
}

/// Spatial index construction. The index works on the engine's native
/// geometry, so the packed GeoPackage blob is unpacked first and repacked
/// after the index exists.
fn spatial_index_block(table: &str) -> String {
    format!(
        "UPDATE '{table}' SET geom=GeomFromGPB(geom);\nSELECT gpkgAddSpatialIndex('{table}', 'geom');\nUPDATE '{table}' SET geom=AsGPB(geom);\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_str;
    use pretty_assertions::assert_eq;

    fn single_theme(yaml: &str) -> ThemeSelection {
        parse_str(yaml).unwrap()
    }

    // -- unit: columns --------------------------------------------------------

    #[test]
    fn test_columns_points() {
        let selection = single_theme("Cafes:\n  select:\n    - amenity\n    - name\n");
        let theme = selection.get_theme("Cafes").unwrap();
        let columns = table_columns(theme, GeometryType::Points);
        let names: Vec<&str> = columns.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["osm_id", "amenity", "name"]);
        assert_eq!(columns[0].kind(), ColumnKind::FeatureId);
        assert_eq!(columns[1].kind(), ColumnKind::Tag);
    }

    #[test]
    fn test_columns_polygons_carry_both_ids() {
        let selection = single_theme("Buildings:\n  select:\n    - building\n");
        let theme = selection.get_theme("Buildings").unwrap();
        let columns = table_columns(theme, GeometryType::Polygons);
        let names: Vec<&str> = columns.iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["osm_id", "osm_way_id", "building"]);
    }

    #[test]
    fn test_z_index_appended_for_trigger_key() {
        for trigger in Z_INDEX_TRIGGER_KEYS {
            let selection = single_theme(&format!("Layer:\n  select:\n    - {}\n", trigger));
            let theme = selection.get_theme("Layer").unwrap();
            let columns = table_columns(theme, GeometryType::Lines);
            let last = columns.last().unwrap();
            assert_eq!(last.name(), "z_index");
            assert_eq!(last.kind(), ColumnKind::ZIndex);
        }
    }

    #[test]
    fn test_z_index_ignores_filter_keys() {
        // highway appears only in the filter, not in select
        let selection = single_theme(
            "Bridges:\n  select:\n    - name\n  where: highway IS NOT NULL\n",
        );
        let theme = selection.get_theme("Bridges").unwrap();
        let columns = table_columns(theme, GeometryType::Lines);
        assert!(columns.iter().all(|c| c.name() != "z_index"));
    }

    #[test]
    fn test_column_renderings() {
        let selection = single_theme("Roads:\n  select:\n    - highway\n");
        let theme = selection.get_theme("Roads").unwrap();
        let columns = table_columns(theme, GeometryType::Lines);
        assert_eq!(columns[0].definition(), "osm_id TEXT");
        assert_eq!(columns[0].reference(), "osm_id");
        assert_eq!(columns[1].definition(), "\"highway\" TEXT");
        assert_eq!(columns[1].reference(), "\"highway\"");
        assert_eq!(columns[2].definition(), "z_index INTEGER(4) DEFAULT 0");
        assert_eq!(columns[2].reference(), "\"z_index\"");
    }

    // -- unit: create blocks --------------------------------------------------

    #[test]
    fn test_create_block_exact() {
        let selection = single_theme(
            "Cafes And Restaurants:\n  select:\n    - amenity\n    - name\n  where: amenity='cafe'\n  types:\n    - points\n",
        );
        let emitted = emit_sql(&selection);
        assert_eq!(emitted.create.len(), 1);
        assert_eq!(
            emitted.create[0],
            "CREATE TABLE cafes_and_restaurants_points(\n\
             \x20 fid INTEGER PRIMARY KEY AUTOINCREMENT,\n\
             \x20 geom POINT,\n\
             \x20 osm_id TEXT,\n\
             \x20 \"amenity\" TEXT,\n\
             \x20 \"name\" TEXT\n\
             );\n\
             INSERT INTO cafes_and_restaurants_points(geom, osm_id, \"amenity\", \"name\") \
             SELECT geom, osm_id, \"amenity\", \"name\" FROM points WHERE (amenity='cafe');\n"
        );
    }

    #[test]
    fn test_create_block_z_index() {
        let selection = single_theme(
            "Railways:\n  select:\n    - railway\n  types:\n    - lines\n",
        );
        let emitted = emit_sql(&selection);
        let block = &emitted.create[0];
        assert!(block.contains("  \"railway\" TEXT,\n  z_index INTEGER(4) DEFAULT 0\n);"));
        assert!(block.contains("(geom, osm_id, \"railway\", \"z_index\")"));
        assert!(block.contains("SELECT geom, osm_id, \"railway\", \"z_index\" FROM lines"));
    }

    #[test]
    fn test_default_filter_parenthesized() {
        let selection = single_theme("Rivers:\n  select:\n    - waterway\n  types:\n    - lines\n");
        let emitted = emit_sql(&selection);
        assert!(emitted.create[0].ends_with("FROM lines WHERE (1);\n"));
    }

    #[test]
    fn test_create_and_insert_lists_agree() {
        let selection = single_theme(
            "Transport:\n  select:\n    - highway\n    - railway\n    - name\n",
        );
        let theme = selection.get_theme("Transport").unwrap();
        for geometry in GeometryType::ALL {
            let columns = table_columns(theme, geometry);
            let references = columns
                .iter()
                .map(Column::reference)
                .collect::<Vec<_>>()
                .join(", ");
            let block = create_table_block(
                &theme.table_name(geometry),
                geometry,
                &columns,
                theme.filter_clause(),
            );
            // The reference list appears verbatim in both INSERT positions
            assert_eq!(block.matches(&references).count(), 2);
        }
    }

    // -- unit: index blocks ---------------------------------------------------

    #[test]
    fn test_index_block_exact() {
        let selection = single_theme(
            "Cafes:\n  select:\n    - amenity\n  types:\n    - points\n",
        );
        let emitted = emit_sql(&selection);
        assert_eq!(emitted.index.len(), 1);
        assert_eq!(
            emitted.index[0],
            "INSERT INTO gpkg_contents (table_name, data_type, identifier, srs_id) \
             VALUES ('cafes_points', 'features', 'cafes_points', '4326');\n\
             INSERT INTO gpkg_geometry_columns VALUES ('cafes_points', 'geom', 'POINT', '4326', '0', '0');\n\
             UPDATE 'cafes_points' SET geom=GeomFromGPB(geom);\n\
             SELECT gpkgAddSpatialIndex('cafes_points', 'geom');\n\
             UPDATE 'cafes_points' SET geom=AsGPB(geom);\n"
        );
    }

    #[test]
    fn test_index_block_wkt_per_geometry() {
        let selection = single_theme("Land:\n  select:\n    - landuse\n");
        let emitted = emit_sql(&selection);
        assert!(emitted.index[0].contains("'land_points', 'geom', 'POINT'"));
        assert!(emitted.index[1].contains("'land_lines', 'geom', 'MULTILINESTRING'"));
        assert!(emitted.index[2].contains("'land_polygons', 'geom', 'MULTIPOLYGON'"));
    }

    // -- emission order -------------------------------------------------------

    #[test]
    fn test_emission_order() {
        let selection = single_theme(
            "Second First:\n  select:\n    - name\n  types:\n    - polygons\n    - points\nRoads:\n  select:\n    - highway\n  types:\n    - lines\n",
        );
        let emitted = emit_sql(&selection);
        assert_eq!(emitted.create.len(), 3);
        assert!(emitted.create[0].starts_with("CREATE TABLE second_first_points("));
        assert!(emitted.create[1].starts_with("CREATE TABLE second_first_polygons("));
        assert!(emitted.create[2].starts_with("CREATE TABLE roads_lines("));
        assert_eq!(emitted.create.len(), emitted.index.len());
    }

    #[test]
    fn test_empty_types_theme_emits_nothing() {
        let selection = single_theme(
            "Hidden:\n  select:\n    - name\n  types: []\nVisible:\n  select:\n    - name\n  types:\n    - points\n",
        );
        let emitted = emit_sql(&selection);
        assert_eq!(emitted.create.len(), 1);
        assert!(emitted.create[0].starts_with("CREATE TABLE visible_points("));
    }

    #[test]
    fn test_source_tables() {
        let selection = single_theme("Everything:\n  select:\n    - name\n");
        let emitted = emit_sql(&selection);
        assert!(emitted.create[0].contains("FROM points WHERE"));
        assert!(emitted.create[1].contains("FROM lines WHERE"));
        assert!(emitted.create[2].contains("FROM multipolygons WHERE"));
    }
}
