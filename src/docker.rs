//! Talking to the docker CLI to find containers and the shells inside them

use std::{
    collections::BTreeMap,
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{Command, Output},
};

use log::debug;

use crate::{
    env::{EnvironmentExecutable, Invocation},
    error::{Error, ErrorExt, ErrorType, Throwable},
};

mod container;
pub use container::*;

mod prompt;
pub use prompt::*;

mod shell;
pub use shell::*;

/// The name of the docker binary to search for in `PATH`
const DOCKER_BINARY: &str = "docker";

/// A handle to the docker command line client
pub struct Docker {
    /// The docker binary
    program: PathBuf,
}

impl Docker {
    /// Creates a handle using the docker binary at `program`
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    /// Searches the `PATH` for the docker binary
    /// # Errors
    /// `DockerError::NotFound` if there is no docker binary in `PATH`
    pub fn locate() -> Result<Self, Error> {
        Self::locate_in(&std::env::var_os("PATH").unwrap_or_default())
    }

    /// Searches the directories of the `PATH`-style list `path` for an executable docker binary
    ///
    /// Entries that are not executable files get skipped.
    /// # Arguments
    /// * `path` - The directories to search, separated like `PATH`
    pub fn locate_in(path: &OsStr) -> Result<Self, Error> {
        let context = || "Locating the docker binary".to_string();

        let binary = format!("{}{}", DOCKER_BINARY, std::env::consts::EXE_SUFFIX);

        match std::env::split_paths(path)
            .map(|dir| dir.join(&binary))
            .find(|candidate| is_executable(candidate))
        {
            Some(program) => {
                debug!("Using docker at {}", program.to_string_lossy());
                Ok(Self::new(program))
            }
            None => Err(DockerError::NotFound.throw(context())),
        }
    }

    /// Lists all running containers
    pub fn running_containers(&self) -> Result<Vec<Container>, Error> {
        let output = self
            .run_checked(&["ps", "--format", PS_FORMAT])
            .e_context(|| "Listing running containers".to_string())?;

        Ok(parse_containers(&output))
    }

    /// Lists the running containers whose `field` matches `query` (`docker ps --filter <field>=<query>`)
    /// # Arguments
    /// * `field` - The filter to use, e.g. `id` or `name`
    /// * `query` - The value to filter for
    pub fn find_containers_by_field(
        &self,
        field: &str,
        query: &str,
    ) -> Result<Vec<Container>, Error> {
        let filter = format!("{}={}", field, query);
        let output = self
            .run_checked(&["ps", "--format", PS_FORMAT, "--filter", &filter])
            .e_context(|| format!("Searching containers with {}", filter))?;

        Ok(parse_containers(&output))
    }

    /// Finds running containers matching `query`, trying the ID first and the name second
    pub fn find_containers(&self, query: &str) -> Result<Vec<Container>, Error> {
        let containers = self.find_containers_by_field("id", query)?;
        if !containers.is_empty() {
            return Ok(containers);
        }

        self.find_containers_by_field("name", query)
    }

    /// Lists the shells installed in `container` by reading its `/etc/shells`
    pub fn find_shells(&self, container: &Container) -> Result<Vec<String>, Error> {
        let output = self
            .run_checked(&["exec", &container.id, "cat", "/etc/shells"])
            .e_context(|| format!("Reading /etc/shells of {}", container.id))?;

        Ok(parse_shells(&output))
    }

    /// Resolves `command` to its path inside `container` using `which`
    /// # Returns
    /// `None` if `which` fails or prints nothing
    pub fn find_command(
        &self,
        container: &Container,
        command: &str,
    ) -> Result<Option<String>, Error> {
        let output = self
            .run(&["exec", &container.id, "which", command])
            .e_context(|| format!("Searching '{}' in {}", command, container.id))?;

        if !output.status.success() {
            debug!(
                "'which {}' in {} exited with {}",
                command, container.id, output.status
            );
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let first = stdout
            .trim()
            .lines()
            .next()
            .map(str::trim)
            .unwrap_or_default();

        Ok(if first.is_empty() {
            None
        } else {
            Some(first.to_string())
        })
    }

    /// Creates the executable that runs `command` interactively in `container`
    pub fn exec(&self, container: &Container, command: &str) -> DockerExec {
        DockerExec {
            program: self.program.clone().into_os_string(),
            container: container.clone(),
            command: command.to_string(),
        }
    }

    /// Runs docker with `args`, capturing its output
    fn run(&self, args: &[&str]) -> Result<Output, Error> {
        debug!("Running 'docker {}'", args.join(" "));

        Command::new(&self.program)
            .args(args)
            .output()
            .e_context(|| format!("Running '{}'", self.program.to_string_lossy()))
    }

    /// Runs docker with `args`, returning its standard output if it succeeded
    fn run_checked(&self, args: &[&str]) -> Result<String, Error> {
        let output = self.run(args)?;

        if !output.status.success() {
            return Err(DockerError::CommandFailed {
                command: format!("docker {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .throw(format!("Running 'docker {}'", args[0])));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Whether `path` is a file the current user may execute
fn is_executable(path: &Path) -> bool {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => return false,
    };

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        metadata.permissions().mode() & 0o111 != 0
    }

    #[cfg(not(unix))]
    {
        let _ = metadata;
        true
    }
}

/// Runs a command interactively inside a container: `docker exec -it <id> <command>`
pub struct DockerExec {
    program: OsString,
    container: Container,
    command: String,
}

impl EnvironmentExecutable for DockerExec {
    fn get_name(&self) -> String {
        format!("{} in {}", self.command, self.container.name)
    }

    fn get_env_variables(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    fn get_invocation(&self) -> Invocation {
        Invocation::program(
            self.program.clone(),
            [
                OsString::from("exec"),
                OsString::from("-it"),
                OsString::from(&self.container.id),
                OsString::from(&self.command),
            ],
        )
    }
}

/// An error that originated from talking to docker
#[derive(Debug)]
pub enum DockerError {
    /// There is no docker binary
    NotFound,
    /// A docker command exited unsuccessfully
    CommandFailed { command: String, stderr: String },
    /// The input ended before a valid choice was made
    NoChoice,
}

impl<T> ErrorExt<T> for Result<T, DockerError> {
    fn e_context<F: Fn() -> String>(self, context: F) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::new_context(ErrorType::Docker(e), context())),
        }
    }
}

impl Throwable for DockerError {
    fn throw(self, context: String) -> Error {
        Error::new_context(ErrorType::Docker(self), context)
    }
}

impl std::fmt::Display for DockerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "'docker' not found."),
            Self::CommandFailed { command, stderr } => {
                write!(f, "'{}' failed: {}", command, stderr)
            }
            Self::NoChoice => write!(f, "No container has been chosen"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exec_attaches_interactively() {
        let docker = Docker::new("/usr/bin/docker".into());
        let container = Container {
            id: "3f4e8a1b2c3d".into(),
            image: "nginx".into(),
            name: "web".into(),
        };

        let exec = docker.exec(&container, "/bin/bash");
        assert_eq!(
            exec.get_invocation().to_string(),
            "/usr/bin/docker exec -it 3f4e8a1b2c3d /bin/bash"
        );
        assert_eq!(exec.get_name(), "/bin/bash in web");
    }

    #[cfg(unix)]
    #[test]
    fn locate_skips_docker_files_without_execute_permission() {
        use std::os::unix::fs::PermissionsExt;

        let stray = tempfile::tempdir().unwrap();
        let real = tempfile::tempdir().unwrap();
        for (dir, mode) in [(&stray, 0o644), (&real, 0o755)] {
            let binary = dir.path().join("docker");
            std::fs::write(&binary, "#!/bin/sh\n").unwrap();
            std::fs::set_permissions(&binary, std::fs::Permissions::from_mode(mode)).unwrap();
        }

        let path = std::env::join_paths([stray.path(), real.path()]).unwrap();
        let docker = Docker::locate_in(&path).unwrap();

        let container = Container {
            id: "1111".into(),
            image: "nginx".into(),
            name: "web".into(),
        };
        let expected = real.path().join("docker");
        assert!(docker
            .exec(&container, "/bin/sh")
            .get_invocation()
            .to_string()
            .starts_with(&*expected.to_string_lossy()));

        let only_stray = std::env::join_paths([stray.path()]).unwrap();
        assert!(Docker::locate_in(&only_stray).is_err());
    }
}
