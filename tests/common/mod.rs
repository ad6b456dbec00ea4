//! Shared test utilities for integration tests

use themepack::{emit_sql, parser, EmittedSql, ThemeSelection};

/// Load a test fixture from the tests/test_data directory
pub fn load_fixture(name: &str) -> ThemeSelection {
    let path = format!("tests/test_data/{}", name);
    parser::parse_file(&path)
        .unwrap_or_else(|e| panic!("Failed to load test data {}: {}", name, e))
}

/// Run the full pipeline: document text -> emitted SQL
#[allow(dead_code)]
pub fn compile_document(yaml: &str) -> EmittedSql {
    let selection =
        parser::parse_str(yaml).unwrap_or_else(|e| panic!("Failed to parse document: {}", e));
    emit_sql(&selection)
}

/// Find the create block for one table, panicking when there is none
#[allow(dead_code)]
pub fn create_block<'a>(emitted: &'a EmittedSql, table: &str) -> &'a str {
    let header = format!("CREATE TABLE {}(", table);
    emitted
        .create
        .iter()
        .find(|block| block.starts_with(&header))
        .unwrap_or_else(|| panic!("No create block for table {}", table))
}

/// Count the SQL statements in a block (one per line ending in ';')
#[allow(dead_code)]
pub fn count_statements(block: &str) -> usize {
    block
        .lines()
        .filter(|line| line.trim_end().ends_with(';'))
        .count()
}

// =============================================================================
// Debug Utilities
// =============================================================================

/// Print every emitted block for debugging
#[allow(dead_code)]
pub fn debug_blocks(emitted: &EmittedSql) {
    for (i, block) in emitted.create.iter().enumerate() {
        println!("create[{}]:\n{}", i, block);
    }
    for (i, block) in emitted.index.iter().enumerate() {
        println!("index[{}]:\n{}", i, block);
    }
}
