//! fbkeys - On-screen keyboard for Linux framebuffer consoles
//!
//! Draws a five-row keyboard directly into the framebuffer, reads an
//! absolute touch device and types through a uinput virtual keyboard.
//!
//! # Usage
//!
//! ```bash
//! # Auto-detect the touchscreen, rotation from the console
//! fbkeys
//!
//! # Explicit devices, keyboard on top, rotated clockwise
//! fbkeys run -d /dev/input/event2 --framebuffer /dev/fb1 -r 1 --anchor top
//!
//! # Inspect the layout for a 480x800 panel
//! fbkeys geometry --width 480 --height 800 --json
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fbkeys::cli::{CliResult, ConfigArgs, DevicesArgs, GeometryArgs, RunArgs};

/// fbkeys - On-screen keyboard for Linux framebuffer consoles
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Arguments for the default `run` command
    #[command(flatten)]
    run: RunArgs,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the keyboard and type through a virtual input device
    Run(RunArgs),
    /// Resolve the keyboard geometry for a screen size
    Geometry(GeometryArgs),
    /// List input devices
    Devices(DevicesArgs),
    /// Show or write the configuration file
    Config(ConfigArgs),
}

impl Commands {
    fn execute(&self) -> CliResult<()> {
        match self {
            Self::Run(args) => args.execute(),
            Self::Geometry(args) => args.execute(),
            Self::Devices(args) => args.execute(),
            Self::Config(args) => args.execute(),
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if verbose > 0 {
        tracing_subscriber::EnvFilter::new(filter)
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into())
    };
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Some(command) => command.execute(),
        None => cli.run.execute(),
    };

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code.code());
    }
}
