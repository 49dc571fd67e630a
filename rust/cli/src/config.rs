use serde::{Deserialize, Serialize};
use std::fs;
use std::time::Duration;

use deckring_engine::game::{DEFAULT_GRACE_PERIOD, DEFAULT_PACE, GameConfig};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub pace_ms: u64,
    pub grace_ms: u64,
    /// `None` lets the game run until someone wins.
    pub time_limit_ms: Option<u64>,
    pub output_dir: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub pace_ms: ValueSource,
    pub grace_ms: ValueSource,
    pub time_limit_ms: ValueSource,
    pub output_dir: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            pace_ms: ValueSource::Default,
            grace_ms: ValueSource::Default,
            time_limit_ms: ValueSource::Default,
            output_dir: ValueSource::Default,
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
            pace_ms: DEFAULT_PACE.as_millis() as u64,
            grace_ms: DEFAULT_GRACE_PERIOD.as_millis() as u64,
            time_limit_ms: None,
            output_dir: ".".into(),
        }
    }
}

impl Config {
    /// Engine parameters for a game with `players` players.
    pub fn game_config(&self, players: usize) -> GameConfig {
        let mut game = GameConfig::new(players)
            .with_pace(Duration::from_millis(self.pace_ms))
            .with_grace_period(Duration::from_millis(self.grace_ms));
        if let Some(limit) = self.time_limit_ms {
            game = game.with_time_limit(Duration::from_millis(limit));
        }
        if let Some(seed) = self.seed {
            game = game.with_seed(seed);
        }
        game
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
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("DECKRING_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.pace_ms {
            cfg.pace_ms = v;
            sources.pace_ms = ValueSource::File;
        }
        if let Some(v) = f.grace_ms {
            cfg.grace_ms = v;
            sources.grace_ms = ValueSource::File;
        }
        if let Some(v) = f.time_limit_ms {
            cfg.time_limit_ms = limit_from(v);
            sources.time_limit_ms = ValueSource::File;
        }
        if let Some(v) = f.output_dir {
            cfg.output_dir = v;
            sources.output_dir = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("DECKRING_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(parse_env("DECKRING_SEED", &seed)?);
        sources.seed = ValueSource::Env;
    }
    if let Ok(pace) = std::env::var("DECKRING_PACE_MS")
        && !pace.is_empty()
    {
        cfg.pace_ms = parse_env("DECKRING_PACE_MS", &pace)?;
        sources.pace_ms = ValueSource::Env;
    }
    if let Ok(grace) = std::env::var("DECKRING_GRACE_MS")
        && !grace.is_empty()
    {
        cfg.grace_ms = parse_env("DECKRING_GRACE_MS", &grace)?;
        sources.grace_ms = ValueSource::Env;
    }
    if let Ok(limit) = std::env::var("DECKRING_TIME_LIMIT_MS")
        && !limit.is_empty()
    {
        cfg.time_limit_ms = limit_from(parse_env("DECKRING_TIME_LIMIT_MS", &limit)?);
        sources.time_limit_ms = ValueSource::Env;
    }
    if let Ok(dir) = std::env::var("DECKRING_OUTPUT_DIR")
        && !dir.is_empty()
    {
        cfg.output_dir = dir;
        sources.output_dir = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    pace_ms: Option<u64>,
    #[serde(default)]
    grace_ms: Option<u64>,
    #[serde(default)]
    time_limit_ms: Option<u64>,
    #[serde(default)]
    output_dir: Option<String>,
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.grace_ms == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: grace_ms must be >0".into(),
        ));
    }
    if cfg.output_dir.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "Invalid configuration: output_dir must not be empty".into(),
        ));
    }
    Ok(())
}

// 0 disables the limit.
fn limit_from(ms: u64) -> Option<u64> {
    (ms > 0).then_some(ms)
}

fn parse_env(name: &str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("Invalid {}: {}", name, value)))
}
