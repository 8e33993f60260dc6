use std::collections::BTreeMap;

use crate::env::{EnvironmentExecutable, Invocation};

/// An executable that hands an arbitrary command line to the host shell
pub struct CustomExecutable {
    /// The command line to execute
    pub program: String,
    /// The environment variables
    pub env_vars: BTreeMap<String, String>,
}

impl CustomExecutable {
    /// Creates a new custom executable, executing the supplied command line
    /// # Arguments
    /// * `program` - The command line to execute
    /// * `env_vars` - The environment variables to use
    pub fn new(program: String, env_vars: BTreeMap<String, String>) -> Self {
        Self { program, env_vars }
    }
}

impl EnvironmentExecutable for CustomExecutable {
    fn get_env_variables(&self) -> BTreeMap<String, String> {
        self.env_vars.clone()
    }

    fn get_invocation(&self) -> Invocation {
        Invocation::Shell(self.program.clone())
    }

    fn get_name(&self) -> String {
        "Run shell".to_string()
    }
}
