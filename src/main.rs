//! typelink CLI - cross-file type resolution for C# source trees

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use typelink::{analyze, write_corpus, AnalyzerConfig};

#[derive(Parser)]
#[command(name = "typelink")]
#[command(about = "Resolve type references across the files of a C# project")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract and resolve every C# file under ROOT
    Analyze {
        /// Source root
        root: PathBuf,
        /// Write per-file JSON and summary.json to this directory
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Resolve references on the rayon thread pool
        #[arg(long)]
        parallel: bool,
        /// Skip files whose relative path matches this glob (repeatable)
        #[arg(long, value_name = "GLOB")]
        exclude: Vec<String>,
        #[command(flatten)]
        imports: ImportArgs,
    },
    /// Show how a type name resolves against the analyzed ROOT
    Inspect {
        /// Source root
        root: PathBuf,
        /// Raw type name, as it would appear in a declaration
        #[arg(long = "type", value_name = "NAME")]
        type_name: String,
    },
    /// List the files FILE depends on, level by level
    Deps {
        /// Source root
        root: PathBuf,
        /// Relative path of the starting file
        #[arg(long, value_name = "PATH")]
        file: String,
        /// How many levels of dependencies to follow
        #[arg(long, default_value_t = 1)]
        levels: usize,
        #[command(flatten)]
        imports: ImportArgs,
    },
}

/// File dependency flags, applied on top of `typelink.json`
#[derive(Args)]
struct ImportArgs {
    /// `using A.B` only matches A.B and its child namespaces
    #[arg(long)]
    strict_usings: bool,
    /// Drop dependencies found only through a `using`
    #[arg(long)]
    skip_using_only: bool,
    /// Never link to files whose name contains this text (repeatable, case-insensitive)
    #[arg(long, value_name = "TEXT")]
    exclude_filename: Vec<String>,
}

impl ImportArgs {
    fn apply(self, config: &mut AnalyzerConfig) {
        config.imports.strict_usings |= self.strict_usings;
        config.imports.skip_using_only |= self.skip_using_only;
        config
            .imports
            .exclude_filename_patterns
            .extend(self.exclude_filename);
    }
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct DependencyLevel<'a> {
    level: usize,
    files: Vec<&'a str>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            root,
            out,
            parallel,
            exclude,
            imports,
        } => run_analyze(&root, out, parallel, exclude, imports),
        Commands::Inspect { root, type_name } => run_inspect(&root, &type_name),
        Commands::Deps {
            root,
            file,
            levels,
            imports,
        } => run_deps(&root, &file, levels, imports),
    }
}

/// RUST_LOG wins unless -v asks for debug output. Logs go to stderr so
/// `inspect` output stays pipeable.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(format!("{}=debug", env!("CARGO_CRATE_NAME")))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("{}=info", env!("CARGO_CRATE_NAME"))))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(root: &Path) -> Result<AnalyzerConfig> {
    AnalyzerConfig::load(root)
        .with_context(|| format!("Failed to load configuration for {}", root.display()))
}

fn run_analyze(
    root: &Path,
    out: Option<PathBuf>,
    parallel: bool,
    exclude: Vec<String>,
    imports: ImportArgs,
) -> Result<()> {
    let mut config = load_config(root)?;
    config.parallel_resolution |= parallel;
    config.exclude.extend(exclude);
    imports.apply(&mut config);
    if out.is_some() {
        config.out_dir = out;
    }

    let analysis = analyze(root, &config)?;

    if let Some(out_dir) = &config.out_dir {
        write_corpus(&analysis.corpus, out_dir)?;
    }

    let report = &analysis.report;
    info!(
        "{} files, {} types indexed, {}/{} base types and {}/{} member types resolved, {} body bindings inferred, {} file imports",
        report.files,
        report.indexed_types,
        report.propagation.resolved_base_types,
        report.propagation.base_types,
        report.propagation.resolved_member_references,
        report.propagation.member_references,
        report.inferred_bindings,
        report.imports,
    );
    Ok(())
}

fn run_inspect(root: &Path, type_name: &str) -> Result<()> {
    let config = load_config(root)?;
    let analysis = analyze(root, &config)?;
    let verdict = analysis.inspect(type_name);

    println!(
        "{}",
        serde_json::to_string_pretty(&verdict).context("Failed to serialize verdict")?
    );
    Ok(())
}

fn run_deps(root: &Path, file: &str, levels: usize, imports: ImportArgs) -> Result<()> {
    let mut config = load_config(root)?;
    imports.apply(&mut config);
    let analysis = analyze(root, &config)?;

    let file = file.replace('\\', "/");
    let found = analysis.dependencies(&file, levels).with_context(|| {
        format!("{} is not an analyzed source file under {}", file, root.display())
    })?;
    let listing: Vec<DependencyLevel> = found
        .iter()
        .enumerate()
        .map(|(index, records)| DependencyLevel {
            level: index + 1,
            files: records.iter().map(|r| r.path.as_str()).collect(),
        })
        .collect();

    println!(
        "{}",
        serde_json::to_string_pretty(&listing).context("Failed to serialize dependencies")?
    );
    Ok(())
}
