// src/config.rs

//! Manages server configuration: loading, defaults, and validation.

use std::fs;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// One step of the saturating adjacency-score table.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjacencyTier {
    /// Minimum group size that earns this tier.
    pub size: usize,
    pub points: u32,
}

/// Scoring tables and fixed bonuses of the game itself.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GameRules {
    /// Saturating tiers for same-color adjacency groups, ascending by size.
    #[serde(default = "default_adjacency_tiers")]
    pub adjacency_tiers: Vec<AdjacencyTier>,
    /// Points per count of matched personal-goal cells; index 0 = one match.
    #[serde(default = "default_personal_goal_tiers")]
    pub personal_goal_tiers: Vec<u32>,
    /// Shared-goal scoring ladder for a two-player session.
    #[serde(default = "default_ladder_two")]
    pub common_ladder_two: Vec<u32>,
    /// Shared-goal scoring ladder for a three-player session.
    #[serde(default = "default_ladder_three")]
    pub common_ladder_three: Vec<u32>,
    /// Shared-goal scoring ladder for a four-player session.
    #[serde(default = "default_ladder_four")]
    pub common_ladder_four: Vec<u32>,
    /// One-time bonus for the player who first fills their bookshelf.
    #[serde(default = "default_end_game_bonus")]
    pub end_game_bonus: u32,
}

impl GameRules {
    /// The tier value for a same-color group of `size` tiles.
    pub fn adjacency_points(&self, size: usize) -> u32 {
        self.adjacency_tiers
            .iter()
            .filter(|tier| size >= tier.size)
            .map(|tier| tier.points)
            .max()
            .unwrap_or(0)
    }

    /// The personal-goal score for `matches` correctly placed cells.
    pub fn personal_points(&self, matches: usize) -> u32 {
        if matches == 0 || self.personal_goal_tiers.is_empty() {
            return 0;
        }
        let index = matches.min(self.personal_goal_tiers.len()) - 1;
        self.personal_goal_tiers[index]
    }

    /// The shared-goal ladder for a session of `player_count` players.
    pub fn common_ladder(&self, player_count: usize) -> Vec<u32> {
        match player_count {
            2 => self.common_ladder_two.clone(),
            3 => self.common_ladder_three.clone(),
            _ => self.common_ladder_four.clone(),
        }
    }
}

impl Default for GameRules {
    fn default() -> Self {
        Self {
            adjacency_tiers: default_adjacency_tiers(),
            personal_goal_tiers: default_personal_goal_tiers(),
            common_ladder_two: default_ladder_two(),
            common_ladder_three: default_ladder_three(),
            common_ladder_four: default_ladder_four(),
            end_game_bonus: default_end_game_bonus(),
        }
    }
}

fn default_adjacency_tiers() -> Vec<AdjacencyTier> {
    vec![
        AdjacencyTier { size: 3, points: 2 },
        AdjacencyTier { size: 4, points: 3 },
        AdjacencyTier { size: 5, points: 5 },
        AdjacencyTier { size: 6, points: 8 },
    ]
}
fn default_personal_goal_tiers() -> Vec<u32> {
    vec![1, 2, 4, 6, 9, 12]
}
fn default_ladder_two() -> Vec<u32> {
    vec![8, 4]
}
fn default_ladder_three() -> Vec<u32> {
    vec![8, 6, 4]
}
fn default_ladder_four() -> Vec<u32> {
    vec![8, 6, 4, 2]
}
fn default_end_game_bonus() -> u32 {
    1
}

/// Heartbeat timing. Both durations are configuration so tests can shrink
/// them under a paused clock.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LivenessConfig {
    /// How often a ping envelope is sent to each client.
    #[serde(with = "humantime_serde", default = "default_heartbeat_interval")]
    pub heartbeat_interval: Duration,
    /// Silence longer than this marks a client suspected; twice this marks
    /// it disconnected.
    #[serde(with = "humantime_serde", default = "default_reply_window")]
    pub reply_window: Duration,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: default_heartbeat_interval(),
            reply_window: default_reply_window(),
        }
    }
}

fn default_heartbeat_interval() -> Duration {
    Duration::from_secs(1)
}
fn default_reply_window() -> Duration {
    Duration::from_secs(10)
}

/// The validated server configuration.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_max_clients")]
    pub max_clients: usize,
    #[serde(default)]
    pub rules: GameRules,
    #[serde(default)]
    pub liveness: LivenessConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    7878
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_max_clients() -> usize {
    64
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            max_clients: default_max_clients(),
            rules: GameRules::default(),
            liveness: LivenessConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new `Config` instance by reading and parsing a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at '{path}'"))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse TOML from '{path}'"))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects configurations that would break scoring or liveness.
    pub fn validate(&self) -> Result<()> {
        let tiers = &self.rules.adjacency_tiers;
        if tiers.is_empty() {
            return Err(anyhow!("rules.adjacency_tiers must not be empty"));
        }
        if !tiers.windows(2).all(|w| w[0].size < w[1].size) {
            return Err(anyhow!("rules.adjacency_tiers must be ascending by size"));
        }
        if self.rules.personal_goal_tiers.is_empty() {
            return Err(anyhow!("rules.personal_goal_tiers must not be empty"));
        }
        for (name, ladder) in [
            ("common_ladder_two", &self.rules.common_ladder_two),
            ("common_ladder_three", &self.rules.common_ladder_three),
            ("common_ladder_four", &self.rules.common_ladder_four),
        ] {
            if ladder.is_empty() {
                return Err(anyhow!("rules.{name} must not be empty"));
            }
            if !ladder.windows(2).all(|w| w[0] > w[1]) {
                return Err(anyhow!("rules.{name} must be strictly decreasing"));
            }
        }
        if self.liveness.heartbeat_interval.is_zero() {
            return Err(anyhow!("liveness.heartbeat_interval must be positive"));
        }
        if self.liveness.reply_window < self.liveness.heartbeat_interval {
            return Err(anyhow!(
                "liveness.reply_window must be at least liveness.heartbeat_interval"
            ));
        }
        Ok(())
    }
}
