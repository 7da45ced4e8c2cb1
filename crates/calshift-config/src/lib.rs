use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use calshift_core::{Cadence, CalendarError, DeltaParts, Recurrence, RecurrenceRule};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

const APP_DIR: &str = "calshift";
const CONFIG_FILENAME: &str = "config.toml";

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub rules: Vec<NamedRule>,
}

impl AppConfig {
    pub fn rule(&self, name: &str) -> Option<&NamedRule> {
        self.rules.iter().find(|rule| rule.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedRule {
    pub name: String,
    pub rule: RecurrenceRule<NaiveDateTime>,
}

impl NamedRule {
    pub fn occurrences(&self) -> Recurrence<NaiveDateTime> {
        self.rule.iter()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("rule name is required")]
    EmptyRuleName,
    #[error("duplicate rule name: {0}")]
    DuplicateRule(String),
    #[error("rule {0}: one of cadence or freq is required")]
    MissingFrequency(String),
    #[error("rule {0}: cadence and freq are mutually exclusive")]
    AmbiguousFrequency(String),
    #[error("rule {0}: freq must not be zero")]
    ZeroFrequency(String),
    #[error("rule {0}: end or count is required")]
    UnboundedRule(String),
    #[error("rule {rule}: rolling_day is not supported for {cadence} cadence")]
    RollingDayUnsupported { rule: String, cadence: Cadence },
    #[error("rule {rule}: invalid timestamp {value:?}: expected YYYY-MM-DD or YYYY-MM-DD HH:MM[:SS]")]
    InvalidTimestamp { rule: String, value: String },
    #[error("rule {rule}: {source}")]
    InvalidRule {
        rule: String,
        #[source]
        source: CalendarError,
    },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    rules: Vec<RuleFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    name: String,
    start: String,
    end: Option<String>,
    count: Option<u32>,
    rolling_day: Option<u32>,
    cadence: Option<Cadence>,
    freq: Option<DeltaParts>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => {
            debug!(path = %path.display(), "config missing, using defaults");
            Ok(AppConfig::default())
        }
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

pub fn parse_str(contents: &str, path: &Path) -> Result<AppConfig> {
    let parsed: ConfigFile = toml::from_str(contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    build_config(parsed)
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_str(&contents, path)?;
    debug!(path = %path.display(), rules = config.rules.len(), "config loaded");
    Ok(Some(config))
}

fn build_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut seen = HashSet::new();
    let mut rules = Vec::with_capacity(parsed.rules.len());

    for file in parsed.rules {
        let rule = build_rule(file)?;
        if !seen.insert(rule.name.clone()) {
            return Err(ConfigError::DuplicateRule(rule.name));
        }
        rules.push(rule);
    }

    Ok(AppConfig { rules })
}

fn build_rule(file: RuleFile) -> Result<NamedRule> {
    let name = file.name.trim().to_string();
    if name.is_empty() {
        return Err(ConfigError::EmptyRuleName);
    }

    let freq = match (file.cadence, file.freq) {
        (Some(_), Some(_)) => return Err(ConfigError::AmbiguousFrequency(name)),
        (None, None) => return Err(ConfigError::MissingFrequency(name)),
        (Some(cadence), None) => {
            if file.rolling_day.is_some() && !cadence.supports_rolling_day() {
                return Err(ConfigError::RollingDayUnsupported {
                    rule: name,
                    cadence,
                });
            }
            cadence.unit()
        }
        (None, Some(parts)) => parts
            .build()
            .map_err(|source| invalid_rule(&name, source))?,
    };
    if freq.is_zero() {
        return Err(ConfigError::ZeroFrequency(name));
    }
    if file.end.is_none() && file.count.is_none() {
        return Err(ConfigError::UnboundedRule(name));
    }

    let start = parse_point(&name, &file.start)?;
    let mut rule = RecurrenceRule::new(freq, start);
    if let Some(end) = file.end.as_deref() {
        rule = rule.until(parse_point(&name, end)?);
    }
    if let Some(count) = file.count {
        rule = rule.with_count(count);
    }
    if let Some(day) = file.rolling_day {
        rule = rule
            .with_rolling_day(day)
            .map_err(|source| invalid_rule(&name, source))?;
    }

    Ok(NamedRule { name, rule })
}

fn invalid_rule(name: &str, source: CalendarError) -> ConfigError {
    ConfigError::InvalidRule {
        rule: name.to_string(),
        source,
    }
}

fn parse_point(rule: &str, raw: &str) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();
    let invalid = || ConfigError::InvalidTimestamp {
        rule: rule.to_string(),
        value: raw.to_string(),
    };

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).ok_or_else(invalid);
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(invalid)
}
