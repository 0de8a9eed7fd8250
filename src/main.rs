use clap::Parser;
use rico_dataset::cli::commands::{cmd_convert, cmd_summary};
use rico_dataset::cli::config::{Cli, Commands, ConvertOverrides, build_convert_settings, load_config};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Convert {
            combined_dir,
            annotations_dir,
            names,
            vectors,
            output,
            visualize,
            trace,
        } => {
            let overrides = ConvertOverrides {
                combined_dir: combined_dir.as_deref(),
                annotations_dir: annotations_dir.as_deref(),
                names: names.as_deref(),
                vectors: vectors.as_deref(),
                output: output.as_deref(),
                visualize: visualize.as_deref(),
                trace: trace.as_deref(),
            };
            let settings = build_convert_settings(&config, &overrides);
            cmd_convert(&settings)?;
        }
        Commands::Summary { dataset } => {
            let dir = dataset.as_deref().unwrap_or(&config.output.dir);
            cmd_summary(dir)?;
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise the `-v` count picks the level.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}
