use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use themepack::{emit_sql, parse_file, GeometryType, ThemeSelection};

#[derive(Parser)]
#[command(name = "themepack-demo")]
#[command(about = "Validate theme documents and preview the GeoPackage SQL they compile to")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a theme document and summarize the resulting model
    Validate {
        /// Path to the theme document (YAML)
        file: PathBuf,
    },
    /// List the tables a document compiles to
    Tables {
        /// Path to the theme document (YAML)
        file: PathBuf,
    },
    /// Print the union of OSM keys the document touches
    Keys {
        /// Path to the theme document (YAML)
        file: PathBuf,
        /// Restrict to themes that produce this geometry type (points, lines, polygons)
        #[arg(long)]
        geometry: Option<String>,
    },
    /// Print the SQL statement blocks for every table
    Sql {
        /// Path to the theme document (YAML)
        file: PathBuf,
        /// Print the catalog and spatial index blocks instead of the create blocks
        #[arg(long)]
        index: bool,
    },
    /// Print the README text for one theme
    Readme {
        /// Path to the theme document (YAML)
        file: PathBuf,
        /// Theme name as written in the document
        theme: String,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Validate { file } => handle_validate(&file),
        Commands::Tables { file } => handle_tables(&file),
        Commands::Keys { file, geometry } => handle_keys(&file, geometry.as_deref()),
        Commands::Sql { file, index } => handle_sql(&file, index),
        Commands::Readme { file, theme } => handle_readme(&file, &theme),
    }
}

fn load(file: &Path) -> anyhow::Result<ThemeSelection> {
    let selection = parse_file(file)?;
    Ok(selection)
}

fn handle_validate(file: &Path) -> anyhow::Result<()> {
    let selection = load(file)?;

    println!("document is valid: {} theme(s)", selection.len());
    for theme in selection.themes() {
        let types = theme
            .geometry_types()
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "  {name}: {keys} key(s), filter: {filter}, types: {types}",
            name = theme.name(),
            keys = theme.selected_keys().len(),
            filter = theme.filter_clause(),
        );
    }
    Ok(())
}

fn handle_tables(file: &Path) -> anyhow::Result<()> {
    let selection = load(file)?;

    for table in selection.table_names() {
        println!("{table}");
    }
    Ok(())
}

fn handle_keys(file: &Path, geometry: Option<&str>) -> anyhow::Result<()> {
    let selection = load(file)?;
    let geometry = match geometry {
        Some(value) => Some(value.parse::<GeometryType>()?),
        None => None,
    };

    for key in selection.key_union(geometry) {
        println!("{key}");
    }
    Ok(())
}

fn handle_sql(file: &Path, index: bool) -> anyhow::Result<()> {
    let selection = load(file)?;
    let emitted = emit_sql(&selection);

    let blocks = if index { &emitted.index } else { &emitted.create };
    for block in blocks {
        print!("{block}");
    }
    Ok(())
}

fn handle_readme(file: &Path, theme: &str) -> anyhow::Result<()> {
    let selection = load(file)?;
    let theme = selection
        .get_theme(theme)
        .with_context(|| format!("no theme named '{theme}' in the document"))?;

    print!("{}", theme.readme());
    Ok(())
}
