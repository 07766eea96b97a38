use bura_ai::Difficulty;
use bura_engine::state::DEFAULT_MATCH_TARGET;
use serde::{Deserialize, Serialize};
use std::fs;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub match_target: u32,
    pub difficulty: Difficulty,
    pub turn_timeout_secs: u64,
    /// Bots wait out their thinking delay before moving.
    pub pace: bool,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub match_target: ValueSource,
    pub difficulty: ValueSource,
    pub turn_timeout_secs: ValueSource,
    pub pace: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            match_target: ValueSource::Default,
            difficulty: ValueSource::Default,
            turn_timeout_secs: ValueSource::Default,
            pace: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            match_target: DEFAULT_MATCH_TARGET,
            difficulty: Difficulty::Medium,
            turn_timeout_secs: bura_session::DEFAULT_TURN_TIMEOUT.as_secs(),
            pace: true,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => f.write_str(msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Resolves defaults, then the `BURA_CONFIG` TOML file, then `BURA_*`
/// environment variables, remembering where each value came from.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("BURA_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.match_target {
            cfg.match_target = v;
            sources.match_target = ValueSource::File;
        }
        if let Some(v) = f.difficulty {
            cfg.difficulty = v;
            sources.difficulty = ValueSource::File;
        }
        if let Some(v) = f.turn_timeout_secs {
            cfg.turn_timeout_secs = v;
            sources.turn_timeout_secs = ValueSource::File;
        }
        if let Some(v) = f.pace {
            cfg.pace = v;
            sources.pace = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("BURA_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(target) = std::env::var("BURA_TARGET")
        && !target.is_empty()
    {
        cfg.match_target = target
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid match target".into()))?;
        sources.match_target = ValueSource::Env;
    }
    if let Ok(diff) = std::env::var("BURA_DIFFICULTY")
        && !diff.is_empty()
    {
        cfg.difficulty = diff
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("{}", e)))?;
        sources.difficulty = ValueSource::Env;
    }
    if let Ok(secs) = std::env::var("BURA_TURN_TIMEOUT_SECS")
        && !secs.is_empty()
    {
        cfg.turn_timeout_secs = secs
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid turn timeout".into()))?;
        sources.turn_timeout_secs = ValueSource::Env;
    }
    if let Ok(pace) = std::env::var("BURA_PACE")
        && !pace.is_empty()
    {
        cfg.pace = parse_bool(&pace).ok_or_else(|| ConfigError::Invalid("Invalid pace".into()))?;
        sources.pace = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    match_target: Option<u32>,
    #[serde(default)]
    difficulty: Option<Difficulty>,
    #[serde(default)]
    turn_timeout_secs: Option<u64>,
    #[serde(default)]
    pace: Option<bool>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.match_target == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: match_target must be >=1".into(),
        ));
    }
    if cfg.turn_timeout_secs == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: turn_timeout_secs must be >=1".into(),
        ));
    }
    Ok(())
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
