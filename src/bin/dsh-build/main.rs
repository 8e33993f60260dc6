use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use dsh::{
    config::{BuildConfigFile, BuildSettings},
    env::{exit_code, HostEnvironment},
    error::{Error, ErrorExt},
    invoker::{BuildCommand, Invoker},
    util::signal::SignalDispatcher,
    vcs::Git,
};

mod config;
use config::BuildConfig;

fn run(signal_dispatcher: &SignalDispatcher, cli: BuildConfig) -> Result<i32, Error> {
    let context = || "Running the build".to_string();

    let environment = HostEnvironment::new(cli.workdir.clone());
    let invoker = Invoker::new(&environment, signal_dispatcher);

    // If the `--exec` flag is passed, run a custom command line, else build normally
    if let Some(line) = &cli.exec {
        let status = invoker.run_shell(line).e_context(context)?;
        return Ok(exit_code(&status));
    }

    let settings: BuildSettings = BuildConfigFile::load(cli.config.as_deref(), &cli.workdir)
        .e_context(context)?
        .merge(cli.overrides())
        .into();

    let info = Git::new(cli.workdir.clone())
        .build_info(settings.strict)
        .e_context(context)?;

    let command = BuildCommand::new(info, &settings);

    if cli.dry_run {
        invoker.print(&command);
        return Ok(0);
    }

    let status = invoker.run(&command).e_context(context)?;
    Ok(exit_code(&status))
}

fn main() {
    // Parse command line arguments
    let cli = BuildConfig::parse();

    if std::env::var("RUST_LOG").is_err() {
        match &cli.loglevel {
            0 => std::env::set_var("RUST_LOG", "warn"),
            1 => std::env::set_var("RUST_LOG", "info"),
            2 => std::env::set_var("RUST_LOG", "debug"),
            _ => std::env::set_var("RUST_LOG", "trace"),
        }
    }
    pretty_env_logger::init();

    let dispatcher = Arc::new(SignalDispatcher::default());
    let dsp_clone = dispatcher.clone();
    if let Err(e) = ctrlc::set_handler(move || dsp_clone.handle()) {
        log::warn!("Unable to install the interrupt handler: {e}");
    }

    let code = match run(&dispatcher, cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            1
        }
    };

    std::process::exit(code);
}
