//! Unified configuration for the add-forge-now client.
//!
//! Settings are read from `afn.toml` and layered: file → environment → CLI.
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! base_url = "https://archive.softwareheritage.org"
//! timeout_secs = 30
//!
//! [auth]
//! api_token = "..."
//! csrf_token = "..."
//!
//! [endpoints]
//! request_get = "/api/1/add-forge/request/{id}/get/"
//! request_update = "/api/1/add-forge/request/{id}/update/"
//! request_create = "/api/1/add-forge/request/create/"
//! list_datatables = "/add-forge/request/list/datatables/"
//! transitions = ""
//!
//! [display]
//! page_size = 10
//! date_format = "%Y-%m-%d %H:%M"
//!
//! [logging]
//! level = "info"
//! format = "pretty"
//! ```
//!
//! The file is looked up at `--config`, then `$AFN_CONFIG`, then
//! `<config dir>/afn/afn.toml`. A missing file means defaults.

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::moderation::format::is_valid_date_format;

pub const ENV_CONFIG: &str = "AFN_CONFIG";
pub const ENV_BASE_URL: &str = "AFN_BASE_URL";
pub const ENV_API_TOKEN: &str = "AFN_API_TOKEN";
pub const ENV_CSRF_TOKEN: &str = "AFN_CSRF_TOKEN";

/// Placeholder substituted with the request id in endpoint templates.
const ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-call timeout in seconds; 0 disables it
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://archive.softwareheritage.org".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthSection {
    /// Bearer token sent with every call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,
    /// Value of the `X-CSRFToken` header sent with state-changing calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
}

/// Endpoint path templates, relative to `server.base_url`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsSection {
    #[serde(default = "default_request_get")]
    pub request_get: String,
    #[serde(default = "default_request_update")]
    pub request_update: String,
    #[serde(default = "default_request_create")]
    pub request_create: String,
    #[serde(default = "default_list_datatables")]
    pub list_datatables: String,
    /// Optional endpoint publishing the transition table; empty means the
    /// compiled table is used
    #[serde(default)]
    pub transitions: String,
}

fn default_request_get() -> String {
    "/api/1/add-forge/request/{id}/get/".to_string()
}

fn default_request_update() -> String {
    "/api/1/add-forge/request/{id}/update/".to_string()
}

fn default_request_create() -> String {
    "/api/1/add-forge/request/create/".to_string()
}

fn default_list_datatables() -> String {
    "/add-forge/request/list/datatables/".to_string()
}

impl Default for EndpointsSection {
    fn default() -> Self {
        Self {
            request_get: default_request_get(),
            request_update: default_request_update(),
            request_create: default_request_create(),
            list_datatables: default_list_datatables(),
            transitions: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySection {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// chrono format string used for every timestamp
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_page_size() -> u32 {
    10
}

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            date_format: default_date_format(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    /// Default filter when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Contents of `afn.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AfnToml {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub auth: AuthSection,
    #[serde(default)]
    pub endpoints: EndpointsSection,
    #[serde(default)]
    pub display: DisplaySection,
    #[serde(default)]
    pub logging: LoggingSection,
}

impl AfnToml {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse afn.toml")
    }

    /// Load the file at `path`, or defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize afn.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the configuration and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        match Url::parse(&self.server.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => warnings.push(format!(
                "server.base_url uses unsupported scheme '{}'",
                url.scheme()
            )),
            Err(e) => warnings.push(format!(
                "Invalid server.base_url '{}': {}",
                self.server.base_url, e
            )),
        }

        for (name, template) in [
            ("request_get", &self.endpoints.request_get),
            ("request_update", &self.endpoints.request_update),
        ] {
            if !template.contains(ID_PLACEHOLDER) {
                warnings.push(format!(
                    "endpoints.{} '{}' has no {} placeholder",
                    name, template, ID_PLACEHOLDER
                ));
            }
        }

        if !is_valid_date_format(&self.display.date_format) {
            warnings.push(format!(
                "display.date_format '{}' is not a valid chrono format; using '{}'",
                self.display.date_format, DEFAULT_DATE_FORMAT
            ));
        }

        if self.display.page_size == 0 {
            warnings.push("display.page_size must be at least 1".to_string());
        }

        if self.auth.csrf_token.is_none() {
            warnings.push(
                "auth.csrf_token is not set; status updates may be refused by the server"
                    .to_string(),
            );
        }

        warnings
    }
}

/// Default location of the config file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("afn").join("afn.toml"))
}

/// Resolve which config file to read: CLI → env → default location.
pub fn resolve_config_path(cli_path: Option<&Path>) -> Option<PathBuf> {
    cli_path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os(ENV_CONFIG).map(PathBuf::from))
        .or_else(default_config_path)
}

/// Effective configuration: `afn.toml` merged with environment and CLI.
#[derive(Debug, Clone)]
pub struct AfnConfig {
    /// Path the file was (or would be) read from
    pub path: Option<PathBuf>,
    pub toml: AfnToml,
    /// CLI override for the base URL
    pub cli_base_url: Option<String>,
    /// CLI override: debug logging
    pub verbose: bool,
}

impl AfnConfig {
    /// Load from the resolved location, falling back to defaults.
    pub fn load(cli_path: Option<&Path>) -> Result<Self> {
        let path = resolve_config_path(cli_path);
        let toml = match &path {
            Some(p) => AfnToml::load_or_default(p)?,
            None => AfnToml::default(),
        };
        Ok(Self {
            path,
            toml,
            cli_base_url: None,
            verbose: false,
        })
    }

    /// Wrap an already parsed file.
    pub fn from_toml(toml: AfnToml) -> Self {
        Self {
            path: None,
            toml,
            cli_base_url: None,
            verbose: false,
        }
    }

    pub fn with_cli_args(mut self, base_url: Option<String>, verbose: bool) -> Self {
        self.cli_base_url = base_url;
        self.verbose = verbose;
        self
    }

    /// Base URL (CLI → env → file).
    pub fn base_url(&self) -> String {
        self.cli_base_url
            .clone()
            .or_else(|| std::env::var(ENV_BASE_URL).ok())
            .unwrap_or_else(|| self.toml.server.base_url.clone())
    }

    /// API token (env → file).
    pub fn api_token(&self) -> Option<String> {
        std::env::var(ENV_API_TOKEN)
            .ok()
            .or_else(|| self.toml.auth.api_token.clone())
    }

    /// CSRF token (env → file).
    pub fn csrf_token(&self) -> Option<String> {
        std::env::var(ENV_CSRF_TOKEN)
            .ok()
            .or_else(|| self.toml.auth.csrf_token.clone())
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.toml.server.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn page_size(&self) -> u32 {
        self.toml.display.page_size.max(1)
    }

    /// Configured date format, or the default when chrono rejects it.
    pub fn date_format(&self) -> &str {
        let format = &self.toml.display.date_format;
        if is_valid_date_format(format) {
            format
        } else {
            DEFAULT_DATE_FORMAT
        }
    }

    /// Default tracing filter directive.
    pub fn log_level(&self) -> &str {
        if self.verbose {
            "debug"
        } else {
            &self.toml.logging.level
        }
    }

    pub fn log_format(&self) -> LogFormat {
        self.toml.logging.format
    }

    /// Resolved endpoint URLs.
    pub fn endpoints(&self) -> Result<Endpoints> {
        Endpoints::new(&self.base_url(), &self.toml.endpoints)
    }

    /// Validate configuration and return warnings.
    pub fn validate(&self) -> Vec<String> {
        self.toml.validate()
    }
}

/// Endpoint templates resolved against a base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
    request_get: String,
    request_update: String,
    request_create: String,
    list_datatables: String,
    transitions: Option<String>,
}

impl Endpoints {
    pub fn new(base_url: &str, templates: &EndpointsSection) -> Result<Self> {
        let base = Url::parse(base_url)
            .with_context(|| format!("Invalid base URL '{}'", base_url))?;
        let transitions = Some(templates.transitions.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Ok(Self {
            base,
            request_get: templates.request_get.clone(),
            request_update: templates.request_update.clone(),
            request_create: templates.request_create.clone(),
            list_datatables: templates.list_datatables.clone(),
            transitions,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn join(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .with_context(|| format!("Invalid endpoint path '{}'", path))
    }

    fn join_with_id(&self, template: &str, id: i64) -> Result<Url> {
        self.join(&template.replace(ID_PLACEHOLDER, &id.to_string()))
    }

    pub fn request_get(&self, id: i64) -> Result<Url> {
        self.join_with_id(&self.request_get, id)
    }

    pub fn request_update(&self, id: i64) -> Result<Url> {
        self.join_with_id(&self.request_update, id)
    }

    pub fn request_create(&self) -> Result<Url> {
        self.join(&self.request_create)
    }

    pub fn list_datatables(&self) -> Result<Url> {
        self.join(&self.list_datatables)
    }

    /// `None` when the server does not publish its transition table.
    pub fn transitions(&self) -> Option<Result<Url>> {
        self.transitions.as_deref().map(|path| self.join(path))
    }
}
