use std::path::PathBuf;

/// Default working directory for Terraform, relative to the bundle directory.
pub const DEFAULT_WORKING_DIR: &str = "terraform";

/// Terraform client version installed by `build`.
pub const DEFAULT_CLIENT_VERSION: &str = "1.0.4";

/// File used to initialize terraform providers during build. Empty means the
/// whole working directory is used.
pub const DEFAULT_INIT_FILE: &str = "";

pub const DEFAULT_TERRAFORM_PATH: &str = "terraform";

/// Name of the generated variable file, relative to the working directory.
pub const DEFAULT_VAR_FILE: &str = "terraform.tfvars.json";

/// Where the host orchestrator collects step outputs.
pub const DEFAULT_OUTPUTS_DIR: &str = "/cnab/app/porter/outputs";

/// Environment variable terraform reads its log verbosity from.
pub const TF_LOG_ENV: &str = "TF_LOG";

#[derive(Debug, Clone, PartialEq)]
pub struct MixinConfig {
    pub working_dir: String,
    pub client_version: String,
    pub init_file: String,
    pub terraform_path: String,
    pub var_file: String,
    pub outputs_dir: PathBuf,
    pub debug: bool,
}

impl Default for MixinConfig {
    fn default() -> Self {
        Self {
            working_dir: DEFAULT_WORKING_DIR.to_string(),
            client_version: DEFAULT_CLIENT_VERSION.to_string(),
            init_file: DEFAULT_INIT_FILE.to_string(),
            terraform_path: DEFAULT_TERRAFORM_PATH.to_string(),
            var_file: DEFAULT_VAR_FILE.to_string(),
            outputs_dir: PathBuf::from(DEFAULT_OUTPUTS_DIR),
            debug: false,
        }
    }
}
