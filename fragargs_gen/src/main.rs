use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod cmds;

#[derive(Parser)]
#[command(name = "fragargs-gen")]
#[command(about = "Builder and injector generation for annotated Android fragments", long_about = None)]
struct Cli {
    /* Enable debug logging (overridden by RUST_LOG) */
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /* Class model YAML files */
    #[arg(short = 'f', long = "files", value_name = "FILE", required = true)]
    files: Vec<PathBuf>,

    /* Include directories for imported model files */
    #[arg(short = 'i', long = "include-dir", value_name = "DIR")]
    include_dirs: Vec<PathBuf>,

    /* Processor options YAML file */
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /* Processor option, e.g. -A fragmentArgsLib=true */
    #[arg(short = 'A', value_name = "KEY[=VALUE]")]
    options: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /* Generate builder classes and the dispatch class */
    Codegen {
        #[command(flatten)]
        input: InputArgs,

        /* Library mode: do not generate the dispatch class */
        #[arg(long = "library")]
        library: bool,

        /* Output directory for generated sources */
        #[arg(
            short = 'o',
            long = "output",
            value_name = "DIR",
            default_value = "generated"
        )]
        output_dir: PathBuf,
    },

    /* Analyze class models and print the controller models */
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /* Print the models as JSON */
        #[arg(long = "json")]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match cli.command {
        Commands::Codegen {
            input,
            library,
            output_dir,
        } => {
            cmds::codegen::run(
                input.files,
                input.include_dirs,
                input.config,
                input.options,
                library,
                output_dir,
            )?;
        }

        Commands::Analyze { input, json } => {
            cmds::analyze::run(
                input.files,
                input.include_dirs,
                input.config,
                input.options,
                json,
            )?;
        }
    }

    Ok(())
}
