use std::path::PathBuf;

use clap::Parser;

/// Open the best available shell in a running docker container
#[derive(Parser)]
#[command(name = "dsh", version = dsh::LONG_VERSION)]
pub struct Cli {
    /// The loglevel to operate on (0 = warn, 1 = info, 2 = debug, * = trace)
    #[arg(long = "loglevel", short = 'v', default_value_t = 0)]
    pub loglevel: u8,

    /// The docker binary to use [searched in PATH]
    #[arg(long)]
    pub docker: Option<PathBuf>,

    /// Run this command (resolved with `which` in the container) instead of a shell
    #[arg(long, short)]
    pub command: Option<String>,

    /// The ID or name of the container, lists all running containers if omitted
    pub query: Option<String>,
}

impl Cli {
    /// Maps `--loglevel` onto `RUST_LOG` unless it is already set and sets up the logger
    pub fn init_logging(&self) {
        if std::env::var("RUST_LOG").is_err() {
            match &self.loglevel {
                0 => std::env::set_var("RUST_LOG", "warn"),
                1 => std::env::set_var("RUST_LOG", "info"),
                2 => std::env::set_var("RUST_LOG", "debug"),
                _ => std::env::set_var("RUST_LOG", "trace"),
            }
        }
        pretty_env_logger::init();
    }
}
