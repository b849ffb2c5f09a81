use anyhow::{bail, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::paths::home_dir::resolve_home_dir;

/// DSN used by `--mock` and by tests.
pub const IN_MEMORY_DSN: &str = "sqlite::memory:";

const HOME_SUBDIR: &str = ".crm";
const ENV_PREFIX: &str = "APP__";

/// Server configuration: typed sections plus one free-form entry per module.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: Option<DatabaseConfig>,
    /// `None` falls back to [`default_logging_config`].
    pub logging: Option<LoggingConfig>,
    /// Extra `<module>.yaml` files, merged into `modules`.
    #[serde(default)]
    pub modules_dir: Option<String>,
    #[serde(default)]
    pub modules: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Absolute after loading; empty selects `$HOME/.crm`.
    #[serde(default)]
    pub home_dir: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Per-request timeout in seconds; 0 disables it.
    #[serde(default)]
    pub timeout_sec: u64,
}

impl ServerConfig {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse()
            .with_context(|| format!("invalid listen address '{raw}'"))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        (self.timeout_sec > 0).then(|| Duration::from_secs(self.timeout_sec))
    }

    pub fn home_path(&self) -> &Path {
        Path::new(&self.home_dir)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// `sqlite://<path>` (relative to `home_dir`) or `sqlite::memory:`.
    pub url: String,
    #[serde(default = "default_max_conns")]
    pub max_conns: u32,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    pub fn in_memory() -> Self {
        Self {
            url: IN_MEMORY_DSN.to_string(),
            max_conns: 1,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        let url = self.url.trim();
        url.eq_ignore_ascii_case(IN_MEMORY_DSN) || url.eq_ignore_ascii_case("sqlite://:memory:")
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

/// Subsystem name → logging settings. Key "default" catches everything else.
pub type LoggingConfig = HashMap<String, Section>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Section {
    pub console_level: String, // "info", "debug", "error", "off"
    pub file: String,          // empty disables the file sink
    #[serde(default)]
    pub file_level: String,
    #[serde(default)]
    pub max_backups: Option<usize>,
    #[serde(default)]
    pub max_size_mb: Option<u64>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

fn default_max_conns() -> u32 {
    10
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            home_dir: String::new(),
            host: default_host(),
            port: default_port(),
            timeout_sec: 0,
        }
    }
}

pub fn default_logging_config() -> LoggingConfig {
    let section = Section {
        console_level: "info".to_string(),
        file: "logs/crm.log".to_string(),
        file_level: "debug".to_string(),
        max_backups: Some(3),
        max_size_mb: Some(100),
    };
    HashMap::from([("default".to_string(), section)])
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            database: Some(DatabaseConfig {
                url: "sqlite://database/crm.db".to_string(),
                max_conns: default_max_conns(),
                busy_timeout_ms: default_busy_timeout_ms(),
            }),
            logging: Some(default_logging_config()),
            modules_dir: None,
            modules: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Server defaults, then the YAML file, then `APP__*` variables
    /// (`APP__SERVER__PORT=9000`). Sections absent from both stay `None`.
    pub fn load_layered<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();
        if !config_path.is_file() {
            bail!("config file not found: {}", config_path.display());
        }

        let skeleton = AppConfig {
            database: None,
            logging: None,
            ..AppConfig::default()
        };
        let mut config: AppConfig = Figment::from(Serialized::defaults(skeleton))
            .merge(Yaml::file(config_path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load {}", config_path.display()))?;

        if let Some(dir) = config.modules_dir.clone() {
            for (name, value) in read_module_files(Path::new(&dir))? {
                config.modules.insert(name, value);
            }
        }
        config.finish()
    }

    /// `load_layered` when a path is given, built-in defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_layered(path),
            None => Self::default().finish(),
        }
    }

    fn finish(mut self) -> Result<Self> {
        let configured = Some(self.server.home_dir.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_owned);
        let home: PathBuf = resolve_home_dir(configured, HOME_SUBDIR, true)
            .context("Failed to resolve server.home_dir")?;
        self.server.home_dir = home.to_string_lossy().to_string();
        Ok(self)
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize config to YAML")
    }

    /// Typed view of `modules.<name>`; a missing entry yields `T::default()`.
    pub fn module_config<T>(&self, name: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        self.modules
            .get(name)
            .map(|raw| serde_json::from_value(raw.clone()))
            .transpose()
            .with_context(|| format!("Invalid configuration for module '{name}'"))
            .map(Option::unwrap_or_default)
    }

    /// Port, verbosity and `--mock` (in-memory database) overrides.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(port) = args.port {
            self.server.port = port;
        }
        if args.mock {
            self.database = Some(DatabaseConfig::in_memory());
        }

        let level = match args.verbose {
            0 => return,
            1 => "debug",
            _ => "trace",
        };
        let logging = self.logging.get_or_insert_with(default_logging_config);
        if let Some(section) = logging.get_mut("default") {
            section.console_level = level.to_string();
        }
    }
}

/// Command line arguments relevant to configuration.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config: Option<String>,
    pub port: Option<u16>,
    pub print_config: bool,
    pub verbose: u8,
    pub mock: bool,
}

/// `<stem>.yaml` / `<stem>.yml` files in `dir`, sorted by file name.
/// A missing directory contributes nothing.
fn read_module_files(dir: &Path) -> Result<Vec<(String, serde_json::Value)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && is_yaml(p))
        .collect();
    paths.sort();

    paths
        .into_iter()
        .filter_map(|path| {
            let stem = path.file_stem()?.to_str()?.to_owned();
            Some((stem, path))
        })
        .map(|(stem, path)| -> Result<(String, serde_json::Value)> {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let yaml: serde_yaml::Value = serde_yaml::from_str(&raw)
                .with_context(|| format!("Invalid YAML in {}", path.display()))?;
            Ok((stem, serde_json::to_value(yaml)?))
        })
        .collect()
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
}
