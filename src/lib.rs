//! This crate provides the `dsh` docker shell picker and the `dsh-build` tool that stamps
//! release builds with version control information

/// The version (latest tag) this binary was stamped with
pub const VERSION: &str = env!("DSH_VERSION");

/// The commit hash of the commit this binary was built from
pub const GIT_COMMIT_HASH: &str = env!("DSH_COMMIT");

/// The name of the configuration file `dsh-build` looks for in its working directory
pub static CONFIG_FILE: &str = "dsh-build.toml";

/// The version string reported by `--version`: `<version> (<commit>)`
pub const LONG_VERSION: &str = concat!(env!("DSH_VERSION"), " (", env!("DSH_COMMIT"), ")");

pub mod config;
pub mod docker;
pub mod env;
pub mod error;
pub mod invoker;
pub mod util;
pub mod vcs;
