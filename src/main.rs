//! CLI for MART mutant configuration generation and mutant classification

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use mutation_config_rust::descriptor::{
    candidate_mutants, classify_mutants, load_duplicates, load_mutant_infos, Duplicates,
};
use mutation_config_rust::report::print_operators;
use mutation_config_rust::{
    ClassificationReport, Config, ConfigSerializer, GenerationReport, Granularity,
    OperatorClassifier, RuleSynthesizer, SelectiveKind, Settings, Taxonomy,
};

#[derive(Parser)]
#[command(name = "mutation-config-rust")]
#[command(author, version, about = "Mutant configuration generator for MART", long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the mutant configuration file
    Generate {
        /// Output configuration file
        #[arg(short, long, default_value = "mconf.txt")]
        output: PathBuf,

        /// Settings file (defaults to built-in literals)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Do not write the comment header
        #[arg(long)]
        no_header: bool,
    },

    /// Classify a single rule name
    Classify {
        /// Rule name, e.g. 'ADD$@1$@2$!SUB$@2$@1$'
        rule: String,

        /// Granularity: -1 (all ancestors) or 1..=5
        #[arg(short, long, default_value_t = 3, allow_negative_numbers = true)]
        level: i32,

        /// Also report membership in a selective-mutation set (OFFUTT)
        #[arg(short, long)]
        selective: Option<String>,
    },

    /// Classify the mutants listed in a mutantsInfos.json descriptor
    Mutants {
        /// mutantsInfos.json
        infos: PathBuf,

        /// Duplicates file; listed duplicates are left out
        #[arg(short, long)]
        duplicates: Option<PathBuf>,

        /// Granularity: 1..=5
        #[arg(short, long, default_value_t = 3)]
        level: i32,

        /// Print the per-mutant classes as JSON instead of a report
        #[arg(long)]
        json: bool,
    },

    /// List the registered operators
    Operators,

    /// Show example settings file
    Example,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            output,
            config,
            no_header,
        } => generate(&output, config.as_deref(), no_header, cli.verbose),

        Commands::Classify {
            rule,
            level,
            selective,
        } => classify(&rule, level, selective.as_deref()),

        Commands::Mutants {
            infos,
            duplicates,
            level,
            json,
        } => mutants(&infos, duplicates.as_deref(), level, json),

        Commands::Operators => Taxonomy::standard()
            .map(|t| print_operators(&t))
            .map_err(Into::into),

        Commands::Example => {
            print!("{}", Config::example());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn generate(output: &Path, config: Option<&Path>, no_header: bool, verbose: bool) -> Result<()> {
    let settings = match config {
        Some(path) => {
            println!("{}", "Loading settings...".dimmed());
            Config::load(path)?.settings
        }
        None => Settings::default(),
    };

    let started = Instant::now();
    let taxonomy = Taxonomy::build(&settings).context("invalid operator taxonomy")?;
    let rules = RuleSynthesizer::new(&taxonomy)
        .synthesize()
        .context("rule synthesis failed")?;

    let serializer = if no_header {
        ConfigSerializer::new().without_header()
    } else {
        ConfigSerializer::new()
    };
    serializer.write_to(&rules, output)?;

    GenerationReport::new(&rules, started.elapsed()).print(verbose);
    println!();
    println!("{} Written to {}", "✓".green().bold(), output.display());
    Ok(())
}

fn classify(rule: &str, level: i32, selective: Option<&str>) -> Result<()> {
    let taxonomy = Taxonomy::standard()?;
    let classifier = OperatorClassifier::new(&taxonomy);
    let granularity = Granularity::try_from(level)?;

    for class in classifier.classify(rule, granularity)? {
        println!("{}", class);
    }

    if let Some(kind) = selective {
        let kind: SelectiveKind = kind.parse()?;
        match classifier.selective_label(rule, kind)? {
            Some(label) => println!("{} {} ({})", "✓".green(), kind, label),
            None => println!("{} not in {}", "✗".red(), kind),
        }
    }
    Ok(())
}

fn mutants(infos_path: &Path, duplicates: Option<&Path>, level: i32, json: bool) -> Result<()> {
    let granularity = Granularity::try_from(level)?;
    if granularity == Granularity::AllAncestors {
        anyhow::bail!("level -1 yields several classes per mutant; use 1..=5");
    }

    let infos = load_mutant_infos(infos_path)?;
    let duplicates = match duplicates {
        Some(path) => load_duplicates(path)?,
        None => Duplicates::new(),
    };
    let ids = candidate_mutants(&infos, &duplicates);

    let taxonomy = Taxonomy::standard()?;
    let classifier = OperatorClassifier::new(&taxonomy);
    let classes = classify_mutants(&classifier, &infos, &ids, granularity)
        .with_context(|| format!("classifying mutants of {}", infos_path.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&classes)?);
    } else {
        ClassificationReport::new(&classes, level).print();
    }
    Ok(())
}
