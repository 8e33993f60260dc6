//! Queries the version control system for the information stamped into builds

use std::{path::PathBuf, process::Command};

use log::{debug, warn};

use crate::{
    error::{Error, ErrorExt, ErrorType, Throwable},
    util::string::last_line,
};

/// The version control information a build gets stamped with
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildInfo {
    /// The latest tag, empty if there are no tags
    pub version: String,
    /// The full hash of the `HEAD` commit, empty outside of a repository
    pub commit: String,
}

/// A handle to query `git` in a working directory
pub struct Git {
    /// The `git` program to invoke
    program: PathBuf,
    /// The working directory to query
    workdir: PathBuf,
}

impl Git {
    /// Creates a new handle querying the repository `workdir` is in
    /// # Arguments
    /// * `workdir` - The directory to run `git` in
    pub fn new(workdir: PathBuf) -> Self {
        Self {
            program: "git".into(),
            workdir,
        }
    }

    /// Returns the latest tag: the last line of `git tag`, trimmed
    ///
    /// `git tag` lists in lexical order, an empty string means there are no tags.
    pub fn latest_tag(&self) -> Result<String, Error> {
        let output = self.query(&["tag"])?;
        Ok(last_line(&output).to_string())
    }

    /// Returns the full hash of the current `HEAD` commit, trimmed
    pub fn head_commit(&self) -> Result<String, Error> {
        let output = self.query(&["rev-parse", "HEAD"])?;
        Ok(output.trim().to_string())
    }

    /// Collects the `BuildInfo` for the working directory
    ///
    /// In tolerant mode, failing queries are logged and yield empty values, which
    /// still get embedded into the build. In strict mode, failing queries and empty values are errors.
    /// # Arguments
    /// * `strict` - Whether missing information is a hard failure
    pub fn build_info(&self, strict: bool) -> Result<BuildInfo, Error> {
        let context = || {
            format!(
                "Collecting build information in {}",
                self.workdir.to_string_lossy()
            )
        };

        let version = Self::tolerate(self.latest_tag(), strict, "version").e_context(context)?;
        let commit = Self::tolerate(self.head_commit(), strict, "commit").e_context(context)?;

        if strict {
            if version.is_empty() {
                return Err(VcsError::NoTags.throw(context()));
            }
            if commit.is_empty() {
                return Err(VcsError::NoCommit.throw(context()));
            }
        } else if version.is_empty() {
            warn!("No tags found, the version will be empty");
        }

        debug!("Build information: version '{}', commit '{}'", version, commit);

        Ok(BuildInfo { version, commit })
    }

    /// In tolerant mode, turns a failed query into an empty value
    fn tolerate(res: Result<String, Error>, strict: bool, what: &str) -> Result<String, Error> {
        match res {
            Ok(v) => Ok(v),
            Err(e) if !strict => {
                warn!("Unable to determine the {what}, using an empty value: {e}");
                Ok(String::new())
            }
            Err(e) => Err(e),
        }
    }

    /// Runs `git` with `args`, returning its standard output
    fn query(&self, args: &[&str]) -> Result<String, Error> {
        let context = || format!("Running 'git {}'", args.join(" "));

        debug!(
            "Running 'git {}' in {}",
            args.join(" "),
            self.workdir.to_string_lossy()
        );

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .e_context(context)?;

        if !output.status.success() {
            return Err(VcsError::QueryFailed {
                command: format!("git {}", args.join(" ")),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .throw(context()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// An error that originated from querying the version control system
#[derive(Debug)]
pub enum VcsError {
    /// A query exited unsuccessfully
    QueryFailed { command: String, stderr: String },
    /// The repository has no tags to derive a version from
    NoTags,
    /// There is no `HEAD` commit to stamp
    NoCommit,
}

impl<T> ErrorExt<T> for Result<T, VcsError> {
    fn e_context<F: Fn() -> String>(self, context: F) -> Result<T, Error> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(Error::new_context(ErrorType::Vcs(e), context())),
        }
    }
}

impl Throwable for VcsError {
    fn throw(self, context: String) -> Error {
        Error::new_context(ErrorType::Vcs(self), context)
    }
}

impl std::fmt::Display for VcsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QueryFailed { command, stderr } => {
                write!(f, "'{}' failed: {}", command, stderr)
            }
            Self::NoTags => write!(f, "The repository has no tags"),
            Self::NoCommit => write!(f, "There is no HEAD commit"),
        }
    }
}
