//! pbxkit CLI
//!
//! Inspect, normalize and edit Xcode project files.

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use pbxkit::{GroupAddingOptions, PbxProj, Reference, SourceTree, XcodeProj};
use pbxkit_cli::output::{format_count, format_duration, Status};
use pbxkit_core::config::Config;
use pbxkit_core::error::{exit_codes, Error, ErrorCode};
use pbxkit_telemetry::{TelemetryConfig, Timer};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pbxkit")]
#[command(about = "Read, normalize and edit Xcode project files")]
#[command(version)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the .xcodeproj bundle
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    /// Increase output verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode the project and write it back in Xcode's canonical form
    Dump {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify that the project round-trips and its references resolve
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the project's targets
    Targets {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the source files compiled by a target
    Files {
        /// Target name
        #[arg(short, long)]
        target: String,
    },

    /// Add a group path (e.g. Sources/Feature) under the main group
    #[command(name = "add-group")]
    AddGroup {
        /// Slash-separated group path
        path: String,
        /// Create groups without a backing folder
        #[arg(long)]
        without_folder: bool,
    },

    /// Add a file to a group, and optionally to a target's sources phase
    #[command(name = "add-file")]
    AddFile {
        /// File to add
        file: PathBuf,
        /// Group path under the main group; missing groups are created
        #[arg(short, long)]
        group: Option<String>,
        /// Target whose sources phase receives the file
        #[arg(short, long)]
        target: Option<String>,
        /// Source tree of the new file reference (<group>, SOURCE_ROOT, <absolute>, ...)
        #[arg(long)]
        source_tree: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        owo_colors::set_override(false);
    }

    let config = match Config::load(cli.config.as_deref().and_then(Path::to_str)) {
        Ok(config) => config,
        Err(e) => {
            Status::report(&e);
            std::process::exit(e.exit_code());
        }
    };

    pbxkit_telemetry::init_with_config(TelemetryConfig {
        log_level: pbxkit_telemetry::level_for_verbosity(
            &config.schema.logging.level,
            cli.verbose,
            cli.quiet,
        ),
        json: config.schema.logging.json,
        ..Default::default()
    })?;

    let project = match resolve_project(cli.project, &config) {
        Ok(project) => project,
        Err(e) => {
            Status::report(&e);
            std::process::exit(e.exit_code());
        }
    };

    let editing = &config.schema.editing;
    let exit_code = match cli.command {
        Commands::Dump { output } => finish(run_dump(&project, output.as_deref())),
        Commands::Check { json } => finish(run_check(&project, json, cli.quiet)),
        Commands::Targets { json } => finish(run_targets(&project, json)),
        Commands::Files { target } => finish(run_files(&project, &target)),
        Commands::AddGroup { path, without_folder } => finish(run_add_group(
            &project,
            &path,
            without_folder || editing.without_folder,
        )),
        Commands::AddFile { file, group, target, source_tree } => {
            let source_tree = SourceTree::parse(source_tree.as_deref().unwrap_or(&editing.source_tree));
            finish(run_add_file(
                &project,
                &file,
                group.as_deref(),
                target.as_deref(),
                source_tree,
                editing.without_folder,
            ))
        }
    };

    std::process::exit(exit_code);
}

/// Report a failed command and turn it into an exit code
fn finish(result: pbxkit_core::Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            Status::report(&e);
            e.exit_code()
        }
    }
}

/// `--project`, then `[general] project`, then the only bundle in the current directory
fn resolve_project(explicit: Option<PathBuf>, config: &Config) -> pbxkit_core::Result<PathBuf> {
    if let Some(path) = explicit.or_else(|| config.schema.general.project.as_ref().map(PathBuf::from)) {
        return Ok(path);
    }
    find_project(&std::env::current_dir()?)
}

fn find_project(dir: &Path) -> pbxkit_core::Result<PathBuf> {
    let mut bundles: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir() && path.extension().is_some_and(|ext| ext == "xcodeproj"))
        .collect();
    bundles.sort();

    match bundles.len() {
        1 => Ok(bundles.remove(0)),
        0 => Err(Error::file_not_found(dir.join("*.xcodeproj"))
            .with_suggestion("Pass --project or set [general] project in .pbxkit.toml")),
        n => Err(Error::new(
            ErrorCode::InvalidPath,
            format!("Found {} projects in {}", n, dir.display()),
        )
        .with_suggestion("Pass --project to choose one")),
    }
}

fn open(path: &Path) -> pbxkit_core::Result<XcodeProj> {
    let timer = Timer::start("open");
    let project = XcodeProj::open(path)
        .map_err(|e| Error::from(e).with_context(format!("While opening {}", path.display())))?;
    let elapsed = timer.stop();
    tracing::debug!(elapsed = %format_duration(elapsed), "Project loaded");
    Ok(project)
}

fn main_group(project: &XcodeProj) -> pbxkit_core::Result<Reference> {
    project.pbxproj.main_group().cloned().ok_or_else(|| {
        Error::decode(format!(
            "Root object {} is not a PBXProject",
            project.pbxproj.root_object
        ))
    })
}

fn run_dump(path: &Path, output: Option<&Path>) -> pbxkit_core::Result<i32> {
    let project = open(path)?;
    let text = project.pbxproj.encode();

    match output {
        Some(output) => {
            fs::write(output, &text)?;
            Status::success(&format!("Wrote {}", output.display()));
        }
        None => print!("{}", text),
    }
    Ok(exit_codes::SUCCESS)
}

#[derive(Debug, Serialize)]
struct CheckReport {
    objects: usize,
    fixed_point: bool,
    canonical: bool,
    dangling: Vec<DanglingEdge>,
}

#[derive(Debug, Serialize)]
struct DanglingEdge {
    owner: String,
    attribute: &'static str,
    target: String,
}

fn check(project: &XcodeProj, source: &str) -> pbxkit_core::Result<CheckReport> {
    let first = project.pbxproj.encode();
    let second = PbxProj::from_bytes(first.as_bytes())?.encode();

    let dangling = project
        .pbxproj
        .objects
        .dangling_references()
        .into_iter()
        .map(|(owner, attribute, target)| DanglingEdge {
            owner: owner.into_string(),
            attribute,
            target: target.into_string(),
        })
        .collect();

    Ok(CheckReport {
        objects: project.pbxproj.objects.len(),
        fixed_point: first == second,
        canonical: first == source,
        dangling,
    })
}

fn run_check(path: &Path, json: bool, quiet: bool) -> pbxkit_core::Result<i32> {
    let project = open(path)?;
    let source = fs::read_to_string(XcodeProj::pbxproj_path(&project.path))?;
    let report = check(&project, &source)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !quiet {
        Status::info(&format!(
            "Decoded {}",
            format_count(report.objects, "object", "objects")
        ));
        if report.canonical {
            Status::success("File is in canonical form");
        } else {
            Status::warning("File differs from canonical form (run `pbxkit dump` to normalize)");
        }
        for edge in &report.dangling {
            Status::warning(&format!(
                "{} {} -> {} does not resolve",
                edge.owner, edge.attribute, edge.target
            ));
        }
    }

    if !report.fixed_point {
        let err = Error::new(ErrorCode::RoundTripMismatch, "Re-encoding is not a fixed point");
        return Err(err.with_suggestion("Please report this project file as a bug"));
    }
    if !report.dangling.is_empty() {
        return Err(Error::new(
            ErrorCode::DanglingReference,
            format!(
                "{} do not resolve",
                format_count(report.dangling.len(), "reference", "references")
            ),
        ));
    }
    if !json && !quiet {
        Status::success("Project is consistent");
    }
    Ok(exit_codes::SUCCESS)
}

#[derive(Debug, Serialize)]
struct TargetRow {
    reference: String,
    name: String,
    kind: &'static str,
    product_type: Option<String>,
    build_phases: usize,
}

fn run_targets(path: &Path, json: bool) -> pbxkit_core::Result<i32> {
    let project = open(path)?;
    let objects = &project.pbxproj.objects;
    let rows: Vec<TargetRow> = objects
        .targets()
        .map(|(reference, target)| TargetRow {
            reference: reference.to_string(),
            name: target.name.clone(),
            kind: objects.get(reference).map_or("", |o| o.kind().isa()),
            product_type: target.product_type.as_ref().map(|t| t.identifier().to_string()),
            build_phases: target.build_phases.len(),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(exit_codes::SUCCESS);
    }

    Status::header("Targets");
    for row in &rows {
        let detail = match &row.product_type {
            Some(product_type) => format!("{} {}", row.kind, product_type),
            None => row.kind.to_string(),
        };
        Status::item(&row.name.bold().to_string(), Some(detail.as_str()));
    }
    println!();
    println!("Total: {}", format_count(rows.len(), "target", "targets"));
    Ok(exit_codes::SUCCESS)
}

fn run_files(path: &Path, target_name: &str) -> pbxkit_core::Result<i32> {
    let project = open(path)?;
    let source_root = project.source_root();
    let objects = &project.pbxproj.objects;

    let targets = objects.targets_named(target_name);
    let Some((_, target)) = targets.first() else {
        return Err(Error::new(
            ErrorCode::TargetNotFound,
            format!("No target named {}", target_name),
        )
        .with_suggestion("Run `pbxkit targets` to list target names"));
    };

    let files = objects.source_files(target);
    for (reference, element) in &files {
        let label = element.display_name().unwrap_or(reference.as_str());
        let resolved = objects
            .full_path(reference, &source_root)
            .map(|p| p.display().to_string());
        Status::item(label, Some(resolved.as_deref().unwrap_or("(unresolved)")));
    }
    println!();
    println!("Total: {}", format_count(files.len(), "file", "files"));
    Ok(exit_codes::SUCCESS)
}

fn run_add_group(path: &Path, group_path: &str, without_folder: bool) -> pbxkit_core::Result<i32> {
    let mut project = open(path)?;
    let main_group = main_group(&project)?;

    let chain = project.pbxproj.objects.add_group(
        group_path,
        &main_group,
        GroupAddingOptions { without_folder },
    )?;
    project.save()?;

    for (reference, group) in &chain {
        Status::item(reference, group.element.display_name());
    }
    Status::success(&format!("Group {} is in place", group_path));
    Ok(exit_codes::SUCCESS)
}

fn run_add_file(
    path: &Path,
    file: &Path,
    group: Option<&str>,
    target: Option<&str>,
    source_tree: SourceTree,
    without_folder: bool,
) -> pbxkit_core::Result<i32> {
    let mut project = open(path)?;
    let source_root = project.source_root();
    let mut group_ref = main_group(&project)?;
    let objects = &mut project.pbxproj.objects;

    if let Some(group) = group {
        let chain = objects.add_group(group, &group_ref, GroupAddingOptions { without_folder })?;
        if let Some((last, _)) = chain.into_iter().last() {
            group_ref = last;
        }
    }

    let file_ref = objects.add_file(file, &group_ref, source_tree, &source_root)?;
    Status::success(&format!("Added {} ({})", file.display(), file_ref));

    if let Some(target) = target {
        let target_ref = objects
            .targets_named(target)
            .first()
            .map(|(reference, _)| (*reference).clone())
            .ok_or_else(|| {
                Error::new(ErrorCode::TargetNotFound, format!("No target named {}", target))
            })?;
        match objects.add_build_file(&target_ref, &file_ref)? {
            Some(build_file) => {
                Status::success(&format!("Compiled by {} ({})", target, build_file))
            }
            None => Status::warning(&format!(
                "Target {} has no sources phase; file was not added to a build phase",
                target
            )),
        }
    }

    project.save()?;
    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_project_single_bundle() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("App.xcodeproj")).unwrap();
        fs::create_dir(dir.path().join("Sources")).unwrap();
        let found = find_project(dir.path()).unwrap();
        assert_eq!(found, dir.path().join("App.xcodeproj"));
    }

    #[test]
    fn test_find_project_none_or_many() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            find_project(dir.path()).unwrap_err().code,
            ErrorCode::FileNotFound
        );

        fs::create_dir(dir.path().join("A.xcodeproj")).unwrap();
        fs::create_dir(dir.path().join("B.xcodeproj")).unwrap();
        assert_eq!(
            find_project(dir.path()).unwrap_err().code,
            ErrorCode::InvalidPath
        );
    }

    #[test]
    fn test_check_report() {
        let dir = TempDir::new().unwrap();
        let bundle = dir.path().join("Demo.xcodeproj");
        fs::create_dir(&bundle).unwrap();
        fs::write(
            bundle.join("project.pbxproj"),
            "{ objects = { G_1 = {isa = PBXGroup; children = (FR_GONE); sourceTree = \"<group>\"; }; P_1 = {isa = PBXProject; buildConfigurationList = CL_GONE; mainGroup = G_1; }; }; rootObject = P_1; }",
        )
        .unwrap();

        let project = XcodeProj::open(&bundle).unwrap();
        let report = check(&project, "").unwrap();
        assert_eq!(report.objects, 2);
        assert!(report.fixed_point);
        assert!(!report.canonical);
        let targets: Vec<&str> = report.dangling.iter().map(|e| e.target.as_str()).collect();
        assert_eq!(targets, vec!["FR_GONE", "CL_GONE"]);
    }
}
