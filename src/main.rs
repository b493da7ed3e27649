use clap::{Parser, Subcommand};
use parasol_compiler::{BuildConfig, Compiler, merge_sources};
use std::path::PathBuf;

use anyhow::Context;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "parasol")]
#[command(about = "Parasol parallel-coordinates page compiler", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a JSON build description into an HTML page.
    Build {
        #[arg(long)]
        config: PathBuf,

        /// Overrides the output named in the config.
        #[arg(short = 'o', long)]
        out: Option<PathBuf>,
    },

    /// Join CSV files column-wise and print each source's header list.
    Merge {
        #[arg(short = 'o', long)]
        out: PathBuf,

        #[arg(required = true)]
        sources: Vec<PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Build { config, out } => {
            // 1) Parse the description and replay it through the setters.
            let cfg = BuildConfig::from_file(&config)?;
            let mut compiler = Compiler::new();
            cfg.apply(&mut compiler)
                .with_context(|| format!("apply {}", config.display()))?;

            // 2) Build (merges sources when plots read different files).
            let report = match out {
                Some(path) => compiler.build_to(&path)?,
                None => compiler.build()?,
            };
            if let Some(merged) = &report.dataset.merged {
                println!("Wrote {}", merged.display());
            }
            println!("Wrote {}", report.document.display());
        }
        Commands::Merge { out, sources } => {
            let merged = merge_sources(&sources, &out)?;
            println!("{}", serde_json::to_string_pretty(&merged.headers)?);
            println!("Wrote {}", merged.path.display());
        }
    }

    Ok(())
}
