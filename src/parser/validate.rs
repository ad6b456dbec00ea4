//! Document validation
//!
//! A single pass over the generic YAML value tree. Checks run in a fixed
//! order per theme and the first violation anywhere aborts the whole
//! document, so a returned model is wholly valid and an error always points
//! at exactly one problem.

use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use serde_yaml::{Mapping, Value};

use crate::error::ValidateError;
use crate::filter::FilterValidator;
use crate::model::{GeometryType, Theme, ThemeSelection};
use crate::slug::slugify;

/// Theme names that would collide with the ogr2ogr source tables or with
/// the boundary layers shipped alongside an export.
pub const RESERVED_THEME_NAMES: [&str; 6] = [
    "points",
    "lines",
    "multipolygons",
    "boundary",
    "multilinestrings",
    "other_relations",
];

/// Table-name prefixes owned by the GeoPackage catalog and its spatial
/// index triggers.
const RESERVED_PREFIXES: [&str; 2] = ["gpkg_", "rtree_"];

/// Column names the emitter generates itself. A selected key with one of
/// these names would render the same identifier twice in the CREATE, which
/// SQLite refuses (identifier comparison is case-insensitive, quoted or
/// not).
const GENERATED_COLUMN_NAMES: [&str; 5] = ["fid", "geom", "osm_id", "osm_way_id", "z_index"];

static THEME_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_ ]+$").unwrap());
static OSM_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9 _:]+$").unwrap());

/// Validate a raw document against the given filter validator and freeze
/// the model.
///
/// Per theme, in document order: name legality, name reservation, body
/// shape, `select` presence and shape, per-key grammar, `where` shape,
/// filter validity, `types`. After the loop, derived table prefixes are
/// checked for emptiness and collisions.
pub fn validate(
    yaml: &str,
    validator: &dyn FilterValidator,
) -> Result<ThemeSelection, ValidateError> {
    let root: Value = serde_yaml::from_str(yaml)?;
    let mapping = match root {
        Value::Mapping(mapping) => mapping,
        Value::Sequence(_) => {
            return Err(ValidateError::Schema(
                "document must be a mapping, not a sequence".to_string(),
            ))
        }
        _ => return Err(ValidateError::Schema("document must be a mapping".to_string())),
    };

    let mut themes = Vec::with_capacity(mapping.len());
    for (key, body) in &mapping {
        let name = key.as_str().ok_or_else(|| {
            ValidateError::Schema("theme name must be a string".to_string())
        })?;
        check_theme_name(name)?;

        let body = body.as_mapping().ok_or_else(|| {
            ValidateError::Schema(format!("theme '{}' must be a mapping", name))
        })?;

        let selected_keys = validate_select(name, body)?;
        let where_clause = validate_where(name, body)?;
        let filter_keys = match &where_clause {
            Some(clause) => {
                validator
                    .validate(clause)
                    .map_err(|err| ValidateError::Filter {
                        theme: name.to_string(),
                        errors: err.errors,
                    })?
            }
            None => BTreeSet::new(),
        };
        let types = validate_types(name, body)?;

        themes.push(Theme {
            name: name.to_string(),
            slug: slugify(name),
            selected_keys,
            where_clause,
            types,
            filter_keys,
        });
    }

    check_slugs(&themes)?;
    Ok(ThemeSelection::new(themes))
}

fn check_theme_name(name: &str) -> Result<(), ValidateError> {
    if !THEME_NAME_RE.is_match(name) {
        return Err(ValidateError::Schema(format!(
            "theme name '{}' may only contain letters, numbers, underscores and spaces",
            name
        )));
    }
    if RESERVED_THEME_NAMES.contains(&name) {
        return Err(ValidateError::Schema(format!(
            "theme name '{}' is reserved",
            name
        )));
    }
    for prefix in RESERVED_PREFIXES {
        if name.starts_with(prefix) {
            return Err(ValidateError::Schema(format!(
                "theme name '{}' starts with the reserved prefix '{}'",
                name, prefix
            )));
        }
    }
    Ok(())
}

fn validate_select(name: &str, body: &Mapping) -> Result<Vec<String>, ValidateError> {
    let select = body.get("select").ok_or_else(|| {
        ValidateError::Schema(format!("theme '{}' must have a 'select' list", name))
    })?;
    let entries = select.as_sequence().ok_or_else(|| {
        ValidateError::Schema(format!(
            "'select' in theme '{}' must be a list of keys (e.g. '- amenity')",
            name
        ))
    })?;
    if entries.is_empty() {
        return Err(ValidateError::Schema(format!(
            "'select' in theme '{}' must not be empty",
            name
        )));
    }

    let mut keys: Vec<String> = Vec::with_capacity(entries.len());
    for entry in entries {
        let key = entry.as_str().ok_or_else(|| {
            ValidateError::Schema(format!("OSM key in theme '{}' must be a string", name))
        })?;
        if key.is_empty() {
            return Err(ValidateError::Schema(format!(
                "empty OSM key in theme '{}'",
                name
            )));
        }
        if !OSM_KEY_RE.is_match(key) {
            return Err(ValidateError::Schema(format!(
                "invalid OSM key '{}' in theme '{}'",
                key, name
            )));
        }
        if GENERATED_COLUMN_NAMES
            .iter()
            .any(|generated| generated.eq_ignore_ascii_case(key))
        {
            return Err(ValidateError::Schema(format!(
                "key '{}' in theme '{}' collides with a generated column",
                key, name
            )));
        }
        if keys.iter().any(|existing| existing.eq_ignore_ascii_case(key)) {
            return Err(ValidateError::Schema(format!(
                "duplicate key '{}' in theme '{}' select list",
                key, name
            )));
        }
        keys.push(key.to_string());
    }
    Ok(keys)
}

fn validate_where(name: &str, body: &Mapping) -> Result<Option<String>, ValidateError> {
    match body.get("where") {
        None => Ok(None),
        Some(value) => {
            let clause = value.as_str().ok_or_else(|| {
                ValidateError::Schema(format!("'where' in theme '{}' must be a string", name))
            })?;
            Ok(Some(clause.to_string()))
        }
    }
}

fn validate_types(
    name: &str,
    body: &Mapping,
) -> Result<Option<BTreeSet<GeometryType>>, ValidateError> {
    let types = match body.get("types") {
        None => return Ok(None),
        Some(value) => value,
    };
    let entries = types.as_sequence().ok_or_else(|| {
        ValidateError::Schema(format!(
            "'types' in theme '{}' must be a list of geometry types",
            name
        ))
    })?;

    let mut set = BTreeSet::new();
    for entry in entries {
        let value = entry.as_str().ok_or_else(|| {
            ValidateError::Schema(format!(
                "geometry type in theme '{}' must be a string",
                name
            ))
        })?;
        let geometry = value.parse::<GeometryType>().map_err(|_| {
            ValidateError::Schema(format!(
                "unknown geometry type '{}' in theme '{}'; valid options: points, lines, polygons",
                value, name
            ))
        })?;
        set.insert(geometry);
    }
    Ok(Some(set))
}

/// Table prefixes are derived from names, so distinct themes can still
/// collide after slugging. Colliding or empty prefixes would silently
/// overwrite tables at load time, so both fail validation.
fn check_slugs(themes: &[Theme]) -> Result<(), ValidateError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for theme in themes {
        if theme.slug().is_empty() {
            return Err(ValidateError::Schema(format!(
                "theme name '{}' slugs to an empty table prefix",
                theme.name()
            )));
        }
        if let Some(first) = seen.insert(theme.slug(), theme.name()) {
            return Err(ValidateError::Schema(format!(
                "theme names '{}' and '{}' collide on table prefix '{}'",
                first,
                theme.name(),
                theme.slug()
            )));
        }
    }
    Ok(())
}
