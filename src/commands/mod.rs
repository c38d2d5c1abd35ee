use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use firebot::{DecodeMode, SimConfig};
use tracing_subscriber::EnvFilter;

mod run;
mod world;

use run::run_simulation;
use world::{run_config, run_show};

#[derive(Parser)]
#[command(
    name = "firebot",
    version,
    about = "Firefighter robot grid world driven by an external decision process",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the sense/act loop against a decision process
    Run {
        #[command(flatten)]
        world: WorldArgs,
        /// Named pipe (or plain file) used for both directions
        #[arg(long, default_value = "tube", conflicts_with = "stdio")]
        pipe: PathBuf,
        /// Exchange messages over stdin/stdout instead of a pipe
        #[arg(long, default_value_t = false)]
        stdio: bool,
        /// Draw the grid and logbook on stderr after every tick
        #[arg(long, default_value_t = false)]
        render: bool,
        /// Write the final world snapshot as JSON to this path
        #[arg(long, value_name = "PATH")]
        snapshot: Option<PathBuf>,
    },
    /// Print the default world configuration as JSON
    Config,
    /// Render the initial world and its sensor readings, or a saved snapshot
    Show {
        #[command(flatten)]
        world: WorldArgs,
        /// Render a world snapshot written by `run --snapshot` instead
        #[arg(long, value_name = "PATH", conflicts_with = "config")]
        snapshot: Option<PathBuf>,
    },
}

#[derive(Args, Clone, Debug, Default)]
pub struct WorldArgs {
    /// JSON world configuration (defaults to the classic 10x10 world)
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Maximum number of fires burning at once (unbounded if omitted)
    #[arg(short = 'm', long)]
    pub max_fires: Option<usize>,
    /// RNG seed for reproducible fire placement
    #[arg(long)]
    pub seed: Option<u64>,
    /// How inbound action lists are decoded
    #[arg(long, value_enum)]
    pub decode: Option<DecodeMode>,
}

impl WorldArgs {
    /// Loads the configuration file (if any) and applies flag overrides.
    pub fn resolve(&self) -> Result<SimConfig, String> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path).map_err(|e| e.to_string())?,
            None => SimConfig::default(),
        };
        if let Some(max) = self.max_fires {
            config.max_fires = Some(max);
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(decode) = self.decode {
            config.decode = decode;
        }
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

pub fn run() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(err) = dispatch(cli.command) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn dispatch(command: Command) -> Result<(), String> {
    match command {
        Command::Run {
            world,
            pipe,
            stdio,
            render,
            snapshot,
        } => run_simulation(&world, pipe, stdio, render, snapshot),
        Command::Config => run_config(),
        Command::Show { world, snapshot } => run_show(&world, snapshot),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "firebot",
            "run",
            "--max-fires",
            "2",
            "--seed",
            "4",
            "--decode",
            "strict",
            "--stdio",
        ])
        .unwrap();
        let Command::Run { world, stdio, .. } = cli.command else {
            panic!("expected run");
        };
        assert!(stdio);
        let config = world.resolve().unwrap();
        assert_eq!(config.max_fires, Some(2));
        assert_eq!(config.seed, Some(4));
        assert_eq!(config.decode, DecodeMode::Strict);
    }

    #[test]
    fn pipe_and_stdio_conflict() {
        let parsed = Cli::try_parse_from(["firebot", "run", "--pipe", "x", "--stdio"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn show_accepts_a_saved_snapshot() {
        let cli = Cli::try_parse_from(["firebot", "show", "--snapshot", "out/world.json"]).unwrap();
        let Command::Show { snapshot, .. } = cli.command else {
            panic!("expected show");
        };
        assert_eq!(snapshot, Some(PathBuf::from("out/world.json")));

        let parsed = Cli::try_parse_from(["firebot", "show", "--snapshot", "a", "--config", "b"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn zero_cap_with_seeded_fire_is_rejected() {
        let args = WorldArgs {
            max_fires: Some(0),
            ..WorldArgs::default()
        };
        assert!(args.resolve().is_err());
    }
}
