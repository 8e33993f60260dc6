use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use dsh::{
    docker::{choose_container, select_shell, Container, Docker, DockerError},
    env::{exit_code, Environment, HostEnvironment},
    error::{Error, ErrorExt, ErrorType},
    util::signal::SignalDispatcher,
    GIT_COMMIT_HASH, VERSION,
};
use log::debug;

mod cli;
use cli::Cli;

/// Finds the container to attach to, asking the user if there are several candidates
/// # Returns
/// `None` if there is nothing to attach to, the reason has been reported already
fn select_container(docker: &Docker, query: Option<&str>) -> Result<Option<Container>, Error> {
    let containers = match query {
        None => {
            let containers = docker.running_containers()?;
            if containers.is_empty() {
                println!("There are no running containers.");
                return Ok(None);
            }
            containers
        }
        Some(query) => {
            let containers = docker.find_containers(query)?;
            if containers.is_empty() {
                println!("Could not find container matching '{}'.", query);
                return Ok(None);
            } else if containers.len() > 1 {
                println!("Multiple containers found for '{}'.", query);
            }
            containers
        }
    };

    if let [container] = containers.as_slice() {
        return Ok(Some(container.clone()));
    }

    let chosen = choose_container(
        &containers,
        &mut std::io::stdin().lock(),
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );

    match chosen {
        Ok(container) => {
            println!();
            Ok(Some(container.clone()))
        }
        Err(Error {
            error: ErrorType::Docker(DockerError::NoChoice),
            ..
        }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Finds the command to run in `container`: the requested one or the most preferred shell
fn select_command(
    docker: &Docker,
    container: &Container,
    requested: Option<&str>,
) -> Result<Option<String>, Error> {
    if let Some(requested) = requested {
        let command = docker.find_command(container, requested)?;
        if command.is_none() {
            println!("Could not find '{}' in {}.", requested, container.id);
        }
        return Ok(command);
    }

    let shell = match docker.find_shells(container) {
        Ok(shells) => select_shell(&shells).map(str::to_string),
        Err(e) => {
            debug!("{e}");
            None
        }
    };

    if shell.is_none() {
        println!("Could not find shell for {}.", container.id);
    }

    Ok(shell)
}

fn run(signal_dispatcher: &SignalDispatcher, cli: Cli) -> Result<i32, Error> {
    let context = || "Attaching to a container".to_string();

    debug!("dsh {} ({})", VERSION, GIT_COMMIT_HASH);

    let docker = match &cli.docker {
        Some(program) => Docker::new(program.clone()),
        None => Docker::locate()?,
    };

    let container = match select_container(&docker, cli.query.as_deref()).e_context(context)? {
        Some(container) => container,
        None => return Ok(1),
    };

    let command = match select_command(&docker, &container, cli.command.as_deref())
        .e_context(context)?
    {
        Some(command) => command,
        None => return Ok(1),
    };

    println!(
        "Running {} in {} ({}).",
        command, container.name, container.id
    );

    let workdir = std::env::current_dir().e_context(context)?;
    let environment = HostEnvironment::new(workdir);
    let status = environment
        .execute(&docker.exec(&container, &command), signal_dispatcher)
        .e_context(context)?;

    Ok(exit_code(&status))
}

fn main() {
    let cli = Cli::parse();
    cli.init_logging();

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
