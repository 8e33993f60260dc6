use std::{
    path::PathBuf,
    process::{Command, ExitStatus},
};

use log::{debug, warn};

use crate::{
    error::{Error, ErrorExt},
    util::signal::SignalDispatcher,
};

use super::{Environment, EnvironmentExecutable, Invocation};

/// The shell used for `Invocation::Shell` command lines
const HOST_SHELL: &str = "sh";

/// Represents the host system the tools are running on
///
/// Executables inherit the standard streams and the environment of the current process,
/// shell command lines are run through `sh -c`.
pub struct HostEnvironment {
    /// The directory executables run in
    workdir: PathBuf,
}

impl HostEnvironment {
    /// Creates a new host environment running executables in `workdir`
    /// # Arguments
    /// * `workdir` - The default working directory for executables
    pub fn new(workdir: PathBuf) -> Self {
        Self { workdir }
    }

    /// Constructs the `Command` that runs `executable` on the host
    fn command(&self, executable: &dyn EnvironmentExecutable) -> Command {
        let mut command = match executable.get_invocation() {
            Invocation::Shell(line) => {
                let mut command = Command::new(HOST_SHELL);
                command.arg("-c").arg(line);
                command
            }
            Invocation::Program { program, args } => {
                let mut command = Command::new(program);
                command.args(args);
                command
            }
        };

        command
            .current_dir(&self.workdir)
            .envs(executable.get_env_variables());

        command
    }
}

impl Environment for HostEnvironment {
    fn execute(
        &self,
        executable: &dyn EnvironmentExecutable,
        signal_dispatcher: &SignalDispatcher,
    ) -> Result<ExitStatus, Error> {
        let name = executable.get_name();
        let mut command = self.command(executable);

        debug!(
            "Running '{}', executing command '{}' with following arguments:",
            name,
            command.get_program().to_string_lossy()
        );
        for arg in command.get_args() {
            debug!(" - {}", arg.to_string_lossy());
        }

        debug!("Following environment variables:");
        for env in command.get_envs() {
            if let Some(value) = env.1 {
                debug!(
                    " - {} = '{}'",
                    env.0.to_string_lossy(),
                    value.to_string_lossy()
                )
            }
        }

        let mut child = command.spawn().e_context(|| {
            format!(
                "Spawning '{}' for '{}'",
                command.get_program().to_string_lossy(),
                name
            )
        })?;

        // The terminal delivers the interrupt to the child as well, stay around for its status
        let handler_name = name.clone();
        let _guard = signal_dispatcher.add_handler(Box::new(move || {
            warn!("Interrupt received, waiting for '{}' to exit", handler_name)
        }));

        let status = child
            .wait()
            .e_context(|| format!("Waiting for '{}' to exit", name))?;

        debug!("Command exited with {}", status);

        Ok(status)
    }
}

/// Maps an exit status onto the exit code the current process should exit with
///
/// Processes killed by a signal map to `128 + signal` on unix, everything else without a code to `1`.
/// # Arguments
/// * `status` - The exit status to convert
pub fn exit_code(status: &ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
