use cinspect_gen::cmds;
use cinspect_gen::cmds::analyze::AnalyzeFormat;
use cinspect_gen::config::{CodegenOverrides, CodegenSettings, GeneratorConfig};
use cinspect_gen::{BackendKind, RedeclarationPolicy};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "cinspect")]
#[command(about = "Generate debug printers and ImGui editors for C structs", long_about = None)]
struct Cli {
    /* Enable verbose output (debug logging and resolved struct dumps) */
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /* Generate printer and editor sources for structs marked for generation */
    Codegen {
        /* Descriptor files or glob patterns */
        #[arg(value_name = "INPUT")]
        inputs: Vec<String>,

        /* Output directory; artifacts are printed to stdout when omitted */
        #[arg(short = 'o', long = "output", value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /* Backends to run */
        #[arg(short = 'b', long = "backend", value_enum)]
        backend: Option<BackendKind>,

        /* What to do when a struct name is declared twice */
        #[arg(long = "on-redeclare", value_enum)]
        on_redeclare: Option<RedeclarationPolicy>,

        /* Recursion bound generated printers fall back to */
        #[arg(long = "max-depth", value_name = "N")]
        max_depth: Option<u32>,

        /* YAML configuration file; flags override its values */
        #[arg(short = 'c', long = "config", value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /* Show the resolved struct table, dependencies and generation order */
    Analyze {
        /* Descriptor files or glob patterns */
        #[arg(value_name = "INPUT")]
        inputs: Vec<String>,

        /* Report format */
        #[arg(long = "format", value_enum, default_value = "text")]
        format: AnalyzeFormat,

        /* What to do when a struct name is declared twice */
        #[arg(long = "on-redeclare", value_enum, default_value = "warn")]
        on_redeclare: RedeclarationPolicy,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Codegen {
            inputs,
            output_dir,
            backend,
            on_redeclare,
            max_depth,
            config,
        } => {
            let file = config.as_deref().map(GeneratorConfig::load).transpose()?;
            let overrides = CodegenOverrides {
                output_dir,
                backends: backend,
                on_redeclare,
                max_depth_default: max_depth,
            };
            let settings = CodegenSettings::resolve(overrides, file)?;
            cmds::codegen::run(inputs, settings, cli.verbose)?;
        }

        Commands::Analyze {
            inputs,
            format,
            on_redeclare,
        } => {
            cmds::analyze::run(inputs, format, on_redeclare, cli.verbose)?;
        }
    }

    Ok(())
}
