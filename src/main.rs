//! rolecolor CLI - Behavioral role profiling for professional documents
//!
//! A command-line interface for role scoring with:
//! - Model2Vec embeddings (or an offline hashing model)
//! - Human and JSON output formats
//! - Configuration file support
//! - JSON export of analyses and per-sentence scores

use std::io::{stdout, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rolecolor::cli::{
    create_formatter, export_sentence_scores, save_analysis, Cli, CliOutputFormat, Commands,
    OutputFormat, RoleColorConfig,
};
use rolecolor::{EmbeddingModel, HashingModel, Model2VecEmbedder, RoleColorPipeline};

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Quiet by default - only show errors unless explicitly verbose
    let filter = if cli.verbose { "debug" } else { "error" };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let config_path = cli.config.clone().unwrap_or_else(RoleColorConfig::default_path);
    let config = RoleColorConfig::load_from(config_path.clone());

    match cli.command {
        Commands::Analyze {
            file,
            format,
            json,
            sentences,
            output,
            export_sentences,
            hashing_model,
            model,
            temperature,
            no_color,
        } => {
            let options = AnalyzeOptions {
                file,
                format: resolve_format(json, format, &config),
                show_sentences: sentences || config.output.show_sentences,
                output,
                export_sentences,
                hashing_model: hashing_model || config.model.use_hashing_model,
                model_id: model.unwrap_or_else(|| config.model.model_id.clone()),
                temperature,
                use_color: config.output.color && !no_color,
            };
            handle_analyze(options, config)?;
        }

        Commands::Roles { json } => {
            handle_roles(json, &config)?;
        }

        Commands::Config {
            get,
            set,
            list,
            reset,
            path,
        } => {
            handle_config(get, set, list, reset, path, config_path)?;
        }
    }

    Ok(())
}

fn resolve_format(
    json: bool,
    format: Option<CliOutputFormat>,
    config: &RoleColorConfig,
) -> OutputFormat {
    if json {
        return OutputFormat::Json;
    }
    match format {
        Some(f) => f.into(),
        None => config
            .output
            .default_format
            .parse()
            .unwrap_or(OutputFormat::Human),
    }
}

// =============================================================================
// Analyze Handler
// =============================================================================

struct AnalyzeOptions {
    file: Option<PathBuf>,
    format: OutputFormat,
    show_sentences: bool,
    output: Option<PathBuf>,
    export_sentences: Option<PathBuf>,
    hashing_model: bool,
    model_id: String,
    temperature: Option<f64>,
    use_color: bool,
}

fn read_input(file: Option<&Path>) -> anyhow::Result<String> {
    match file {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

fn load_model(
    hashing_model: bool,
    model_id: &str,
    config: &RoleColorConfig,
) -> anyhow::Result<Arc<dyn EmbeddingModel>> {
    if hashing_model {
        return Ok(Arc::new(HashingModel::with_dims(config.model.hashing_dims)));
    }

    let local = Path::new(model_id);
    let loaded = if local.exists() {
        Model2VecEmbedder::from_path(local)
    } else {
        Model2VecEmbedder::from_pretrained(model_id)
    };
    let embedder = loaded.with_context(|| {
        format!(
            "Failed to load embedding model '{}' (use --hashing-model to run offline)",
            model_id
        )
    })?;

    Ok(Arc::new(embedder))
}

fn handle_analyze(options: AnalyzeOptions, mut config: RoleColorConfig) -> anyhow::Result<()> {
    let text = read_input(options.file.as_deref())?;

    if let Some(t) = options.temperature {
        config.scoring.temperature = t;
    }

    let roles = config.role_set().context("Invalid role configuration")?;
    let model = load_model(options.hashing_model, &options.model_id, &config)?;
    let pipeline = RoleColorPipeline::new(model, roles, config.to_scoring_config())
        .context("Failed to initialize role scorer")?;

    let analysis = pipeline.analyze(&text).context("Scoring failed")?;

    let use_color = options.use_color && options.format == OutputFormat::Human;
    let formatter = create_formatter(options.format, use_color);
    let mut stdout = stdout();
    formatter.format_analysis(&analysis, options.show_sentences, &mut stdout)?;

    if let Some(path) = options.output {
        save_analysis(&path, &analysis)?;
        eprintln!("Saved analysis to {}", path.display());
    }

    if let Some(path) = options.export_sentences {
        match export_sentence_scores(&path, &analysis.scoring)? {
            Some(written) => eprintln!("Exported sentence scores to {}", written.display()),
            None => eprintln!("No sentence scores to export (document too short)"),
        }
    }

    Ok(())
}

// =============================================================================
// Roles Handler
// =============================================================================

fn handle_roles(json: bool, config: &RoleColorConfig) -> anyhow::Result<()> {
    let roles = config.role_set().context("Invalid role configuration")?;
    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let formatter = create_formatter(format, config.output.color);
    formatter.format_roles(&roles, &mut stdout())?;
    Ok(())
}

// =============================================================================
// Config Handler
// =============================================================================

fn handle_config(
    get: Option<String>,
    set: Option<String>,
    list: bool,
    reset: bool,
    path: bool,
    config_path: PathBuf,
) -> anyhow::Result<()> {
    if path {
        println!("{}", config_path.display());
        return Ok(());
    }

    if reset {
        let default_cfg = RoleColorConfig::default();
        default_cfg.save_to(config_path.clone())?;
        println!("Configuration reset to defaults.");
        println!("Saved to: {}", config_path.display());
        return Ok(());
    }

    let mut config = RoleColorConfig::load_from(config_path.clone());

    if let Some(key) = get {
        return match config.get(&key) {
            Some(value) => {
                println!("{}", value);
                Ok(())
            }
            None => Err(anyhow::anyhow!("Unknown configuration key: {}", key)),
        };
    }

    if let Some(kv) = set {
        let (key, value) = kv
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("Invalid format. Use: --set key=value"))?;

        config.set(key, value)?;
        config.save_to(config_path.clone())?;
        println!("Set {} = {}", key, value);
        return Ok(());
    }

    if list {
        println!("Current configuration:");
        println!();
        for (key, value) in config.list() {
            println!("  {} = {}", key, value);
        }
        if !config.roles.is_empty() {
            println!("  roles = {} custom", config.roles.len());
        }
        println!();
        println!("Config file: {}", config_path.display());
        return Ok(());
    }

    // Default: show usage
    println!("Configuration commands:");
    println!("  rolecolor config --list            Show all settings");
    println!("  rolecolor config --get <key>       Get a setting");
    println!("  rolecolor config --set <key>=<val> Set a setting");
    println!("  rolecolor config --reset           Reset to defaults");
    println!("  rolecolor config --path            Show config file path");

    Ok(())
}
