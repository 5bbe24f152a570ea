//! Dockerfile lines that put terraform into the bundle image.

use serde::Deserialize;

use crate::config::MixinConfig;
use crate::error::MixinError;

// Other top-level keys (the bundle's actions) are ignored.
#[derive(Debug, Default, Deserialize)]
struct BuildInput {
    #[serde(default)]
    config: Option<BuildConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct BuildConfig {
    client_version: Option<String>,
    working_dir: Option<String>,
    init_file: Option<String>,
}

/// Applies the mixin `config` block of the build payload on top of `config`.
/// An empty payload leaves the configuration untouched.
pub fn apply_build_payload(mut config: MixinConfig, payload: &[u8]) -> Result<MixinConfig, MixinError> {
    if payload.iter().all(u8::is_ascii_whitespace) {
        return Ok(config);
    }

    let input: BuildInput = serde_yaml::from_slice(payload)?;
    if let Some(overrides) = input.config {
        if let Some(version) = overrides.client_version.filter(|v| !v.is_empty()) {
            config.client_version = version;
        }
        if let Some(dir) = overrides.working_dir.filter(|d| !d.is_empty()) {
            config.working_dir = dir;
        }
        if let Some(file) = overrides.init_file {
            config.init_file = file;
        }
    }
    Ok(config)
}

pub fn dockerfile_lines(config: &MixinConfig) -> String {
    let version = &config.client_version;
    let dir = config.working_dir.trim_end_matches('/');
    let archive = format!("terraform_{}_linux_amd64.zip", version);

    let mut lines = vec![
        "RUN apt-get update && apt-get install -y --no-install-recommends wget unzip ca-certificates && rm -rf /var/lib/apt/lists/*".to_string(),
        format!(
            "RUN wget -q https://releases.hashicorp.com/terraform/{version}/{archive} && \\\n    unzip {archive} -d /usr/bin && \\\n    rm {archive}"
        ),
    ];

    if config.init_file.is_empty() {
        lines.push(format!("COPY {dir}/ $BUNDLE_DIR/{dir}/"));
    } else {
        lines.push(format!("COPY {dir}/{} $BUNDLE_DIR/{dir}/", config.init_file));
    }
    lines.push(format!("RUN cd $BUNDLE_DIR/{dir} && terraform init -backend=false"));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dockerfile_lines_defaults() {
        let lines = dockerfile_lines(&MixinConfig::default());
        assert!(lines.contains(
            "wget -q https://releases.hashicorp.com/terraform/1.0.4/terraform_1.0.4_linux_amd64.zip"
        ));
        assert!(lines.contains("unzip terraform_1.0.4_linux_amd64.zip -d /usr/bin"));
        assert!(lines.contains("COPY terraform/ $BUNDLE_DIR/terraform/\n"));
        assert!(lines.ends_with("RUN cd $BUNDLE_DIR/terraform && terraform init -backend=false\n"));
    }

    #[test]
    fn test_dockerfile_lines_with_init_file() {
        let config = MixinConfig {
            working_dir: "infra/".to_string(),
            init_file: "providers.tf".to_string(),
            ..Default::default()
        };
        let lines = dockerfile_lines(&config);
        assert!(lines.contains("COPY infra/providers.tf $BUNDLE_DIR/infra/\n"));
        assert!(!lines.contains("COPY infra/ "));
        assert!(lines.contains("RUN cd $BUNDLE_DIR/infra && terraform init -backend=false"));
    }

    #[test]
    fn test_apply_build_payload_overrides() {
        let payload = b"config:\n  clientVersion: 1.5.7\n  workingDir: infra\n  initFile: providers.tf\n";
        let config = apply_build_payload(MixinConfig::default(), payload).unwrap();
        assert_eq!(config.client_version, "1.5.7");
        assert_eq!(config.working_dir, "infra");
        assert_eq!(config.init_file, "providers.tf");
    }

    #[test]
    fn test_apply_build_payload_empty_keeps_defaults() {
        let config = apply_build_payload(MixinConfig::default(), b"").unwrap();
        assert_eq!(config, MixinConfig::default());

        let config = apply_build_payload(MixinConfig::default(), b"config: {}\n").unwrap();
        assert_eq!(config, MixinConfig::default());
    }

    #[test]
    fn test_apply_build_payload_rejects_unknown_keys() {
        let result = apply_build_payload(MixinConfig::default(), b"config:\n  version: 1.2.3\n");
        assert!(matches!(result, Err(MixinError::Parse(_))));
    }
}
