//! Configuration system with YAML schema and validation.
//!
//! Implements Poka-Yoke (mistake-proofing) through:
//! - Type-safe configuration structs
//! - Range validation via `validator`
//! - Semantic validation of the table/agent relationship

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::domains::relationships::{RelationshipPreset, DEFAULT_MEAN, DEFAULT_STD_DEV};
use crate::domains::utility::DesireParams;
use crate::error::{SeatError, SeatResult};
use crate::table::{validate_table_size, NUM_SEATS};

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Simulation metadata.
    #[serde(default)]
    pub simulation: SimulationMeta,

    /// Reproducibility settings.
    #[serde(default)]
    pub reproducibility: ReproducibilityConfig,

    /// Table and agent counts.
    #[validate(nested)]
    #[serde(default)]
    pub table: TableConfig,

    /// Desire weights.
    #[validate(nested)]
    #[serde(default)]
    pub desires: DesiresConfig,

    /// Relationship generation.
    #[validate(nested)]
    #[serde(default)]
    pub relationships: RelationshipConfig,

    /// Search budget.
    #[validate(nested)]
    #[serde(default)]
    pub optimization: OptimizationConfig,

    /// Repeated-run settings.
    #[validate(nested)]
    #[serde(default)]
    pub batch: BatchConfig,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl SimConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsing fails or
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> SeatResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> SeatResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns `YamlParse` if serialization fails.
    pub fn to_yaml(&self) -> SeatResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> SimConfigBuilder {
        SimConfigBuilder::default()
    }

    /// Run range and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for range failures and `InvalidConfiguration`
    /// for semantic ones.
    pub fn check(&self) -> SeatResult<()> {
        // Poka-Yoke: validate all constraints
        self.validate()?;
        self.validate_semantic()
    }

    /// Validate semantic constraints beyond schema.
    fn validate_semantic(&self) -> SeatResult<()> {
        validate_table_size(self.table.num_agents, self.table.num_seats)?;
        if !self.relationships.mean.is_finite() {
            return Err(SeatError::config("relationship mean must be finite"));
        }
        Ok(())
    }

    /// Desire weights as validated parameters.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if a weight is outside `[0, 1]`.
    pub fn desire_params(&self) -> SeatResult<DesireParams> {
        DesireParams::new(self.desires.close, self.desires.explore)
    }

    /// Master seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.reproducibility.seed
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            simulation: SimulationMeta::default(),
            reproducibility: ReproducibilityConfig::default(),
            table: TableConfig::default(),
            desires: DesiresConfig::default(),
            relationships: RelationshipConfig::default(),
            optimization: OptimizationConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

/// Configuration builder for programmatic construction.
///
/// `build` does not validate; [`crate::engine::Simulation::new`] does.
#[derive(Debug, Default)]
pub struct SimConfigBuilder {
    seed: Option<u64>,
    num_agents: Option<usize>,
    desires: Option<(f64, f64)>,
    max_iterations: Option<usize>,
    preset: Option<RelationshipPreset>,
    mean: Option<f64>,
    std_dev: Option<f64>,
    runs: Option<usize>,
    threads: Option<usize>,
}

impl SimConfigBuilder {
    /// Set the random seed.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of agents.
    #[must_use]
    pub const fn num_agents(mut self, n: usize) -> Self {
        self.num_agents = Some(n);
        self
    }

    /// Set close/explore desire weights.
    #[must_use]
    pub const fn desires(mut self, close: f64, explore: f64) -> Self {
        self.desires = Some((close, explore));
        self
    }

    /// Set the iteration budget.
    #[must_use]
    pub const fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = Some(max_iterations);
        self
    }

    /// Set the relationship preset.
    #[must_use]
    pub const fn preset(mut self, preset: RelationshipPreset) -> Self {
        self.preset = Some(preset);
        self
    }

    /// Set the balanced-preset mean.
    #[must_use]
    pub const fn mean(mut self, mean: f64) -> Self {
        self.mean = Some(mean);
        self
    }

    /// Set the balanced-preset standard deviation.
    #[must_use]
    pub const fn std_dev(mut self, std_dev: f64) -> Self {
        self.std_dev = Some(std_dev);
        self
    }

    /// Set the number of batch runs.
    #[must_use]
    pub const fn runs(mut self, runs: usize) -> Self {
        self.runs = Some(runs);
        self
    }

    /// Set the number of batch worker threads.
    #[must_use]
    pub const fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> SimConfig {
        let mut config = SimConfig::default();

        if let Some(seed) = self.seed {
            config.reproducibility.seed = seed;
        }
        if let Some(n) = self.num_agents {
            config.table.num_agents = n;
        }
        if let Some((close, explore)) = self.desires {
            config.desires.close = close;
            config.desires.explore = explore;
        }
        if let Some(max_iterations) = self.max_iterations {
            config.optimization.max_iterations = max_iterations;
        }
        if let Some(preset) = self.preset {
            config.relationships.preset = preset;
        }
        if let Some(mean) = self.mean {
            config.relationships.mean = mean;
        }
        if let Some(std_dev) = self.std_dev {
            config.relationships.std_dev = std_dev;
        }
        if let Some(runs) = self.runs {
            config.batch.runs = runs;
        }
        if let Some(threads) = self.threads {
            config.batch.threads = threads;
        }

        config
    }
}

/// Simulation metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationMeta {
    /// Simulation name.
    #[serde(default)]
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: String,
}

/// Reproducibility settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReproducibilityConfig {
    /// Master seed for all RNG.
    #[serde(default = "default_seed")]
    pub seed: u64,
}

const fn default_seed() -> u64 {
    42
}

impl Default for ReproducibilityConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
        }
    }
}

/// Table configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TableConfig {
    /// Seated agents.
    #[validate(range(min = 1, max = 9))]
    #[serde(default = "default_num_agents")]
    pub num_agents: usize,
    /// Seats; only the ten-seat table exists.
    #[validate(range(min = 10, max = 10))]
    #[serde(default = "default_num_seats")]
    pub num_seats: usize,
}

const fn default_num_agents() -> usize {
    NUM_SEATS - 1
}

const fn default_num_seats() -> usize {
    NUM_SEATS
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            num_agents: default_num_agents(),
            num_seats: default_num_seats(),
        }
    }
}

/// Desire weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DesiresConfig {
    /// Close-seeking weight.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_close")]
    pub close: f64,
    /// Novelty-seeking weight.
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_explore")]
    pub explore: f64,
}

const fn default_close() -> f64 {
    0.7
}

const fn default_explore() -> f64 {
    0.3
}

impl Default for DesiresConfig {
    fn default() -> Self {
        Self {
            close: default_close(),
            explore: default_explore(),
        }
    }
}

/// Relationship generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RelationshipConfig {
    /// Generator preset.
    #[serde(default)]
    pub preset: RelationshipPreset,
    /// Mean of the balanced preset.
    #[serde(default = "default_mean")]
    pub mean: f64,
    /// Standard deviation of the balanced preset.
    #[validate(range(min = 0.0))]
    #[serde(default = "default_std_dev")]
    pub std_dev: f64,
}

const fn default_mean() -> f64 {
    DEFAULT_MEAN
}

const fn default_std_dev() -> f64 {
    DEFAULT_STD_DEV
}

impl Default for RelationshipConfig {
    fn default() -> Self {
        Self {
            preset: RelationshipPreset::default(),
            mean: default_mean(),
            std_dev: default_std_dev(),
        }
    }
}

/// Search budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct OptimizationConfig {
    /// Maximum iterations before the search gives up.
    #[validate(range(min = 1))]
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
}

const fn default_max_iterations() -> usize {
    100
}

impl Default for OptimizationConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
        }
    }
}

/// Repeated-run settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BatchConfig {
    /// Number of independent runs.
    #[validate(range(min = 1))]
    #[serde(default = "default_runs")]
    pub runs: usize,
    /// Worker threads; 1 runs sequentially.
    #[validate(range(min = 1))]
    #[serde(default = "default_threads")]
    pub threads: usize,
}

const fn default_runs() -> usize {
    10
}

const fn default_threads() -> usize {
    1
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            runs: default_runs(),
            threads: default_threads(),
        }
    }
}
