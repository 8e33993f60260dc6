//! Environment structures to represent different environments for actions to take place

mod hostenv;
pub use hostenv::*;

use std::{collections::BTreeMap, ffi::OsString, fmt::Display};

use crate::{error::Error, util::signal::SignalDispatcher, util::string::quote_arg};

mod customexec;
pub use customexec::*;

/// An environment that can execute `EnvironmentExecutables`
pub trait Environment {
    /// Executes a `EnvironmentExecutable` in the environment
    /// # Arguments
    /// * `executable` - A reference to the executable to execute
    /// * `signal_dispatcher` - A reference to the `SignalDispatcher` to register signals for the executed process
    fn execute(
        &self,
        executable: &dyn EnvironmentExecutable,
        signal_dispatcher: &SignalDispatcher,
    ) -> Result<std::process::ExitStatus, Error>;
}

/// An executable that can be executed in a `Environment`
pub trait EnvironmentExecutable {
    /// Returns the name of the executable to ease identification
    fn get_name(&self) -> String;

    /// Returns the environment variables to pass in addition to the inherited ones
    fn get_env_variables(&self) -> BTreeMap<String, String>;

    /// Returns what to execute in the environment
    fn get_invocation(&self) -> Invocation;
}

/// The ways an executable can be started
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// A command line handed to the host shell (`sh -c`) verbatim
    Shell(String),
    /// A program started directly with an argument vector, no shell involved
    Program {
        program: OsString,
        args: Vec<OsString>,
    },
}

impl Invocation {
    /// Creates a direct program invocation
    /// # Arguments
    /// * `program` - The program to run
    /// * `args` - The arguments to pass, each one exactly one argument
    pub fn program<P, I, A>(program: P, args: I) -> Self
    where
        P: Into<OsString>,
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        Self::Program {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl Display for Invocation {
    /// Renders the invocation as a command line a POSIX shell would run the same way
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shell(line) => write!(f, "{}", line),
            Self::Program { program, args } => {
                write!(f, "{}", quote_arg(&program.to_string_lossy()))?;
                for arg in args {
                    write!(f, " {}", quote_arg(&arg.to_string_lossy()))?;
                }
                Ok(())
            }
        }
    }
}

/// Renders the full command line of `executable`, prefixed with its environment variables
/// # Arguments
/// * `executable` - The executable to render
pub fn command_line(executable: &dyn EnvironmentExecutable) -> String {
    let mut line = String::new();
    for (key, value) in executable.get_env_variables() {
        line.push_str(&format!("{}={} ", key, quote_arg(&value)));
    }
    line.push_str(&executable.get_invocation().to_string());
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_invocations_quote_multi_word_arguments() {
        let inv = Invocation::program("go", ["build", "-ldflags", "-w -s"]);
        assert_eq!(inv.to_string(), "go build -ldflags \"-w -s\"");
    }

    #[test]
    fn shell_invocations_render_verbatim() {
        let inv = Invocation::Shell("echo $HOME && true".to_string());
        assert_eq!(inv.to_string(), "echo $HOME && true");
    }

    #[test]
    fn command_line_prefixes_environment() {
        let mut env = BTreeMap::new();
        env.insert("B".to_string(), "two words".to_string());
        env.insert("A".to_string(), "1".to_string());
        let exec = CustomExecutable::new("make".to_string(), env);

        assert_eq!(command_line(&exec), "A=1 B=\"two words\" make");
    }
}
