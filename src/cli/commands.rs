//! Command dispatch: thin wrappers turning CLI arguments into library calls.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, instrument};
use walkdir::WalkDir;

use crate::arena::Forest;
use crate::builder::{BuildOptions, ForestBuilder};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::config::{self, Settings};
use crate::convert::ForestDump;
use crate::errors::{ForestError, ForestResult};
use crate::label;
use crate::model::Relationship;
use crate::parser::DumpParser;
use crate::render::{render_forest_text, RenderOptions};
use crate::select::select_file_with_suffix;

pub fn execute_command(cli: &Cli, settings: &Settings) -> ForestResult<()> {
    match &cli.command {
        Some(Commands::Tree {
            path,
            relationships,
            track,
            styled,
        }) => _tree(path, relationships, track, *styled, settings),
        Some(Commands::Branches {
            path,
            relationships,
        }) => _branches(path, relationships),
        Some(Commands::Leaves {
            path,
            relationships,
        }) => _leaves(path, relationships),
        Some(Commands::Edges { path }) => _edges(path),
        Some(Commands::Export {
            path,
            relationships,
        }) => _export(path, relationships),
        Some(Commands::Select { dir }) => _select(dir.as_deref(), settings),
        Some(Commands::Config { command }) => _config(command),
        Some(Commands::Info) => _info(),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Ok(()),
    }
}

fn build_options(relationships: &[String]) -> BuildOptions {
    BuildOptions::default()
        .with_relationships(relationships.iter().map(|r| Relationship::new(r.as_str())))
}

/// Collect relation files: a single file as-is, a directory scanned for
/// `.rel` files in path order.
fn collect_rel_files(path: &Path) -> ForestResult<Vec<PathBuf>> {
    if !path.exists() {
        return Err(ForestError::FileNotFound(path.to_path_buf()));
    }
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().map_or(false, |ext| ext == "rel"))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(ForestError::NoInput(path.to_path_buf()));
    }
    Ok(files)
}

/// Parse and build every relation file. Independent builds are pure, so they
/// run on the rayon pool; output order stays deterministic.
fn build_forests(path: &Path, relationships: &[String]) -> ForestResult<Vec<(PathBuf, Forest)>> {
    let files = collect_rel_files(path)?;
    debug!(files = files.len(), "building forests");
    let parser = DumpParser::new();

    files
        .par_iter()
        .map(|file| -> ForestResult<(PathBuf, Forest)> {
            let dump = parser.parse_file(file)?;
            let forest = ForestBuilder::with_options(build_options(relationships))
                .build(&dump.edges)?;
            Ok((file.clone(), forest))
        })
        .collect()
}

#[instrument(skip(settings))]
fn _tree(
    path: &Path,
    relationships: &[String],
    track: &[String],
    styled: bool,
    settings: &Settings,
) -> ForestResult<()> {
    let forests = build_forests(path, relationships)?;
    let multiple = forests.len() > 1;

    for (file, forest) in &forests {
        let mut options = RenderOptions::default()
            .with_relationships(track.iter().map(|t| Relationship::new(t.as_str())));
        options.section_indent = settings.display.section_indent;
        if styled {
            options.label = Some(label::level_styled());
        }

        let text = render_forest_text(forest, &options);
        if multiple {
            output::header(&file.display());
        }
        if text.is_empty() {
            output::detail("(empty forest)");
        } else {
            print!("{}", text);
        }
        if multiple {
            println!();
        }
    }
    Ok(())
}

#[instrument]
fn _branches(path: &Path, relationships: &[String]) -> ForestResult<()> {
    let forests = build_forests(path, relationships)?;
    for (_, forest) in &forests {
        for branch in forest.branches() {
            println!("{}", branch.join(" <- "));
        }
    }
    Ok(())
}

#[instrument]
fn _leaves(path: &Path, relationships: &[String]) -> ForestResult<()> {
    let forests = build_forests(path, relationships)?;
    for (_, forest) in &forests {
        for leaf in forest.leaf_labels() {
            println!("{}", leaf);
        }
    }
    Ok(())
}

#[instrument]
fn _edges(path: &Path) -> ForestResult<()> {
    let files = collect_rel_files(path)?;
    let parser = DumpParser::new();
    for file in &files {
        let dump = parser.parse_file(file)?;
        for edge in &dump.edges {
            println!(
                "{}: {} -> {}",
                edge.relationship,
                label::default_label(&edge.from),
                label::default_label(&edge.to),
            );
        }
    }
    Ok(())
}

#[instrument]
fn _export(path: &Path, relationships: &[String]) -> ForestResult<()> {
    let forests = build_forests(path, relationships)?;
    let dumps: Vec<ForestDump> = forests.iter().map(|(_, f)| ForestDump::from(f)).collect();
    let json = if dumps.len() == 1 {
        serde_json::to_string_pretty(&dumps[0])?
    } else {
        serde_json::to_string_pretty(&dumps)?
    };
    println!("{}", json);
    Ok(())
}

#[instrument(skip(settings))]
fn _select(dir: Option<&Path>, settings: &Settings) -> ForestResult<()> {
    let dir = dir.unwrap_or_else(|| Path::new("."));
    match select_file_with_suffix(dir, ".rel") {
        Some(file) => {
            println!("Selected: {}", file.display());
            _tree(&file, &[], &[], false, settings)
        }
        None => {
            output::warning("no relation file selected");
            Ok(())
        }
    }
}

fn _config(command: &ConfigCommands) -> ForestResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load()?;
            output::info(&toml::to_string_pretty(&settings).unwrap_or_default());
            Ok(())
        }
        ConfigCommands::Init { global } => {
            let path = if *global {
                config::global_config_path()
                    .ok_or_else(|| ForestError::FileNotFound(PathBuf::from("$XDG_CONFIG_HOME")))?
            } else {
                config::local_config_path()
            };
            if path.exists() {
                output::warning(&format!("config already exists: {}", path.display()));
                return Ok(());
            }
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).map_err(|e| ForestError::Io {
                        path: parent.to_path_buf(),
                        source: e,
                    })?;
                }
            }
            fs::write(&path, Settings::template()).map_err(|e| ForestError::Io {
                path: path.clone(),
                source: e,
            })?;
            output::action("created", &path.display());
            Ok(())
        }
        ConfigCommands::Path => {
            if let Some(global) = config::global_config_path() {
                println!("global: {}", global.display());
            }
            println!("local: {}", config::local_config_path().display());
            Ok(())
        }
    }
}

fn _info() -> ForestResult<()> {
    use clap::CommandFactory;
    if let Some(author) = Cli::command().get_author() {
        println!("AUTHOR: {}", author);
    }
    if let Some(version) = Cli::command().get_version() {
        println!("VERSION: {}", version);
    }
    Ok(())
}

fn _completion(shell: clap_complete::Shell) -> ForestResult<()> {
    use clap::CommandFactory;
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
    Ok(())
}
