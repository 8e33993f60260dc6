//! Configuration for `dsh-build`, layered from defaults, the configuration file and the command line

use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::{
    error::{Error, ErrorExt},
    invoker::Toolchain,
    util::parse::{parse_toml, parse_toml_if_exists},
    CONFIG_FILE,
};

/// The package the link-time variables live in by default
pub const DEFAULT_PACKAGE: &str = "main";

/// The contents of a `dsh-build.toml` file, every key is optional
///
/// The command line produces one of these as well, so both layers merge the same way.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BuildConfigFile {
    /// The toolchain to build with
    pub toolchain: Option<Toolchain>,
    /// Overrides the program of the toolchain
    pub compiler: Option<String>,
    /// The package for the link-time variables
    pub package: Option<String>,
    /// Whether to strip symbols and debug information
    pub strip: Option<bool>,
    /// Whether missing version control information is a hard failure
    pub strict: Option<bool>,
}

impl BuildConfigFile {
    /// Loads the configuration file
    ///
    /// An explicitly passed file has to exist, the default `dsh-build.toml` in `workdir` is optional.
    /// # Arguments
    /// * `path` - The explicitly requested file, if any
    /// * `workdir` - The directory to search the default file in
    pub fn load(path: Option<&Path>, workdir: &Path) -> Result<Self, Error> {
        let config = match path {
            Some(path) => {
                debug!("Loading configuration from {}", path.to_string_lossy());
                parse_toml(path)?
            }
            None => {
                let path = Self::default_path(workdir);
                let config = parse_toml_if_exists(&path)
                    .e_context(|| "Loading the default configuration file".to_string())?;
                match config {
                    Some(config) => {
                        debug!("Loaded configuration from {}", path.to_string_lossy());
                        config
                    }
                    None => Self::default(),
                }
            }
        };

        Ok(config)
    }

    /// Returns the path the default configuration file is expected at
    pub fn default_path(workdir: &Path) -> PathBuf {
        workdir.join(CONFIG_FILE)
    }

    /// Layers `other` on top of `self`, values set in `other` win
    /// # Arguments
    /// * `other` - The overriding layer
    pub fn merge(self, other: BuildConfigFile) -> Self {
        Self {
            toolchain: other.toolchain.or(self.toolchain),
            compiler: other.compiler.or(self.compiler),
            package: other.package.or(self.package),
            strip: other.strip.or(self.strip),
            strict: other.strict.or(self.strict),
        }
    }
}

/// The resolved settings a build runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    pub toolchain: Toolchain,
    pub compiler: Option<String>,
    pub package: String,
    pub strip: bool,
    pub strict: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            toolchain: Toolchain::default(),
            compiler: None,
            package: DEFAULT_PACKAGE.to_string(),
            strip: true,
            strict: false,
        }
    }
}

impl From<BuildConfigFile> for BuildSettings {
    fn from(value: BuildConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            toolchain: value.toolchain.unwrap_or(defaults.toolchain),
            compiler: value.compiler,
            package: value.package.unwrap_or(defaults.package),
            strip: value.strip.unwrap_or(defaults.strip),
            strict: value.strict.unwrap_or(defaults.strict),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_overrides_file_values() {
        let file: BuildConfigFile = toml::from_str(
            r#"
            toolchain = "cargo"
            package = "github.com/example/dsh/build"
            strip = false
            "#,
        )
        .unwrap();

        let cli = BuildConfigFile {
            strip: Some(true),
            compiler: Some("false".to_string()),
            ..Default::default()
        };

        let settings = BuildSettings::from(file.merge(cli));
        assert_eq!(
            settings,
            BuildSettings {
                toolchain: Toolchain::Cargo,
                compiler: Some("false".to_string()),
                package: "github.com/example/dsh/build".to_string(),
                strip: true,
                strict: false,
            }
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<BuildConfigFile>("target = \"wasm\"").is_err());
    }

    #[test]
    fn missing_default_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BuildConfigFile::load(None, dir.path()).unwrap();

        assert_eq!(BuildSettings::from(config), BuildSettings::default());
    }

    #[test]
    fn default_file_is_picked_up_from_the_workdir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            BuildConfigFile::default_path(dir.path()),
            "strict = true\n",
        )
        .unwrap();

        let config = BuildConfigFile::load(None, dir.path()).unwrap();
        assert_eq!(config.strict, Some(true));
    }

    #[test]
    fn explicit_file_has_to_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        assert!(BuildConfigFile::load(Some(&missing), dir.path()).is_err());
    }
}
