use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const ENV_TOKEN: &str = "KB_AUTH_TOKEN";
pub const ENV_DEPLOY_CONFIG: &str = "KB_DEPLOYMENT_CONFIG";
pub const SERVICE_SECTION: &str = "kb_spades";

/// Service endpoints read from the deployment config file.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub workspace_url: String,
    pub shock_url: String,
    pub handle_url: String,
    /// External assembler runner, optional: only success-path invocations need it.
    pub spades_runner: Option<PathBuf>,
}

impl DeployConfig {
    /// Reads the file named by `KB_DEPLOYMENT_CONFIG` and parses the
    /// `[kb_spades]` section.
    pub fn from_env() -> Result<Self> {
        let path = env::var(ENV_DEPLOY_CONFIG)
            .map_err(|_| Error::Config(format!("{} is not set", ENV_DEPLOY_CONFIG)))?;
        Self::from_file(Path::new(&path), SERVICE_SECTION)
    }

    pub fn from_file(path: &Path, section: &str) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read deployment config {:?}: {}", path, e))
        })?;
        Self::from_ini_str(&text, section)
    }

    pub fn from_ini_str(text: &str, section: &str) -> Result<Self> {
        let items = parse_ini_section(text, section)
            .ok_or_else(|| Error::Config(format!("section [{}] not found", section)))?;
        let required = |key: &str| -> Result<String> {
            items
                .get(key)
                .cloned()
                .ok_or_else(|| Error::Config(format!("missing key `{}` in section [{}]", key, section)))
        };
        Ok(DeployConfig {
            workspace_url: required("workspace-url")?,
            shock_url: required("shock-url")?,
            handle_url: required("handle-service-url")?,
            spades_runner: items.get("spades-runner").map(PathBuf::from),
        })
    }
}

/// Reads the auth token from `KB_AUTH_TOKEN`.
pub fn auth_token() -> Result<String> {
    env::var(ENV_TOKEN).map_err(|_| Error::Config(format!("{} is not set", ENV_TOKEN)))
}

/// Minimal INI reader: `[section]` headers, `key = value` or `key: value`
/// lines, `#`/`;` comments. Returns None when the section never appears.
fn parse_ini_section(text: &str, section: &str) -> Option<HashMap<String, String>> {
    let mut items: HashMap<String, String> = HashMap::new();
    let mut in_section = false;
    let mut seen = false;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_section = line[1..line.len() - 1].trim() == section;
            seen = seen || in_section;
            continue;
        }
        if !in_section {
            continue;
        }
        let (key, value) = match line.find(|c| c == '=' || c == ':').map(|at| line.split_at(at)) {
            Some((key, rest)) => (key, &rest[1..]),
            None => continue,
        };
        items.insert(key.trim().to_string(), value.trim().to_string());
    }

    if seen {
        Some(items)
    } else {
        None
    }
}
