use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use indexmap::IndexMap;

use jdspec_core::GeneratedFile;
use jdspec_core::config::{self, CONFIG_FILE_NAME, JdspecConfig, OutputFormat};
use jdspec_core::emit::{self, EmitOptions};
use jdspec_core::load::{FileSource, ScannerSource, SpecSource};
use jdspec_core::parse::spec::Swagger;
use jdspec_core::transform::ref_rewrite::{self, MODEL_DIR};
use jdspec_core::transform::{self, TransformOptions, Transformed};

#[derive(Parser)]
#[command(
    name = "jdspec",
    about = "Rewrite a scanned Swagger spec into per-service and per-model jdcloud documents",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write service/ and model/ documents
    Generate {
        #[command(flatten)]
        source: SourceArgs,

        /// Root directory receiving service/ and model/
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Encoding of the written documents
        #[arg(long)]
        format: Option<FormatArg>,

        /// Don't prettify JSON output
        #[arg(long)]
        compact: bool,
    },

    /// Show how a spec would be split, without writing anything
    Inspect {
        #[command(flatten)]
        source: SourceArgs,

        /// Output format
        #[arg(long, default_value = "yaml")]
        format: FormatArg,
    },

    /// Initialize a new jdspec configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Where the spec comes from and how it is annotated.
#[derive(Args)]
struct SourceArgs {
    /// Seed spec for the scanner, or the already-scanned spec (YAML or JSON)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Run this scanner (`<scanner> generate spec ...`) instead of reading --input as-is
    #[arg(long)]
    scanner: Option<String>,

    /// Base path the scanner starts from
    #[arg(short, long)]
    base_path: Option<String>,

    /// Build tags passed to the scanner
    #[arg(short, long)]
    tags: Option<String>,

    /// Include models annotated with swagger:model
    #[arg(short = 'm', long)]
    scan_models: bool,

    /// Vendor module stamped on every definition
    #[arg(short = 'j', long = "XJdcloudModule", visible_alias = "module")]
    module: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Yaml,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => OutputFormat::Yaml,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            source,
            output,
            format,
            compact,
        } => cmd_generate(source, output, format, compact),

        Commands::Inspect { source, format } => cmd_inspect(source, format),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "jdspec", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<JdspecConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

/// Layer command-line flags over the config file.
fn apply_source_args(cfg: &mut JdspecConfig, args: SourceArgs) {
    if let Some(input) = args.input {
        cfg.input = Some(input.to_string_lossy().into_owned());
    }
    if let Some(scanner) = args.scanner {
        cfg.scan.scanner = Some(scanner);
    }
    if let Some(base_path) = args.base_path {
        cfg.scan.base_path = base_path;
    }
    if let Some(tags) = args.tags {
        cfg.scan.tags = tags;
    }
    if args.scan_models {
        cfg.scan.scan_models = true;
    }
    if let Some(module) = args.module {
        cfg.module = Some(module);
    }
}

fn load_spec(cfg: &JdspecConfig) -> Result<Swagger> {
    let input = cfg.input.as_deref().map(Path::new);

    let spec = match &cfg.scan.scanner {
        Some(program) => ScannerSource::new(program, &cfg.scan, input).load()?,
        None => {
            let input = input.context(
                "no input spec: pass --input, set `input` in .jdspec.yaml, or configure a scanner",
            )?;
            FileSource::new(input).load()?
        }
    };
    Ok(spec)
}

fn run_pipeline(cfg: &JdspecConfig) -> Result<Transformed> {
    log::debug!("effective config: {cfg:?}");
    let spec = load_spec(cfg)?;
    let transformed = transform::transform_with_options(spec, &TransformOptions::from(cfg))?;
    Ok(transformed)
}

/// Write generated files to disk under the given base directory.
fn write_files(base: &Path, files: &[GeneratedFile]) -> Result<()> {
    for file in files {
        let path = base.join(&file.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        fs::write(&path, &file.content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        eprintln!("  wrote {}", path.display());
    }
    Ok(())
}

fn cmd_generate(
    source: SourceArgs,
    output: Option<PathBuf>,
    format: Option<FormatArg>,
    compact: bool,
) -> Result<()> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    apply_source_args(&mut cfg, source);
    if let Some(output) = output {
        cfg.output = output.to_string_lossy().into_owned();
    }
    if let Some(format) = format {
        cfg.format = format.into();
    }
    if compact {
        cfg.compact = true;
    }

    let transformed = run_pipeline(&cfg)?;
    let files = emit::render(&transformed.partitions, &EmitOptions::from(&cfg))?;

    let output_dir = PathBuf::from(&cfg.output);
    write_files(&output_dir, &files)?;

    eprintln!(
        "Generated {} service and {} model documents in {}",
        transformed.partitions.services.len(),
        transformed.partitions.models.len(),
        output_dir.display()
    );
    if !transformed.report.is_clean() {
        eprintln!(
            "  warning: {} response reference(s) could not be resolved",
            transformed.report.unresolved.len()
        );
    }
    Ok(())
}

fn cmd_inspect(source: SourceArgs, format: FormatArg) -> Result<()> {
    let mut cfg = try_load_config()?.unwrap_or_default();
    apply_source_args(&mut cfg, source);

    let transformed = run_pipeline(&cfg)?;
    let summary = build_inspect_summary(&transformed, &EmitOptions::from(&cfg))?;

    match format {
        FormatArg::Yaml => {
            let yaml = serde_yaml_ng::to_string(&summary)?;
            print!("{}", yaml);
        }
        FormatArg::Json => {
            let json = serde_json::to_string_pretty(&summary)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn build_inspect_summary(
    transformed: &Transformed,
    options: &EmitOptions,
) -> Result<serde_json::Value> {
    let ext = options.format.extension();

    let mut services = IndexMap::new();
    for (bucket, doc) in &transformed.partitions.services {
        let mut tree = serde_json::to_value(doc)?;
        ref_rewrite::rewrite_refs(&mut tree, &options.ref_base, ext);
        services.insert(
            format!("{}/{bucket}.{ext}", emit::SERVICE_DIR),
            serde_json::json!({
                "paths": doc.paths.keys().collect::<Vec<_>>(),
                "models": ref_rewrite::referenced_models(&tree),
            }),
        );
    }

    let models: IndexMap<String, Vec<&String>> = transformed
        .partitions
        .models
        .iter()
        .map(|(model, doc)| {
            (
                format!("{MODEL_DIR}/{model}.{ext}"),
                doc.definitions.keys().collect(),
            )
        })
        .collect();

    let unresolved: Vec<serde_json::Value> = transformed
        .report
        .unresolved
        .iter()
        .map(|u| {
            serde_json::json!({
                "method": u.method.as_str(),
                "path": u.path,
                "response": u.name,
            })
        })
        .collect();

    Ok(serde_json::json!({
        "services": services,
        "models": models,
        "unresolved": unresolved,
    }))
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
