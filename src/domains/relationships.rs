//! Pairwise relationship matrices.
//!
//! A [`RelationshipMatrix`] holds symmetric affinity scores in `[0, 1]` for
//! the agents at the table. It is generated once per run from an explicit
//! seed and never changes afterwards.
//!
//! # Presets
//!
//! - **Balanced**: every pair drawn from `Normal(mean, std_dev)`, clamped
//! - **Polarized**: every pair lands in a low or a high cluster
//! - **Random**: every pair drawn from `Uniform[0, 1)`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::engine::rng::SimRng;
use crate::error::{SeatError, SeatResult};
use crate::table::{AgentId, NUM_SEATS};

/// Default mean of the balanced preset.
pub const DEFAULT_MEAN: f64 = 0.5;

/// Default standard deviation of the balanced preset.
pub const DEFAULT_STD_DEV: f64 = 0.2;

/// Symmetry tolerance used by validation.
pub const SYMMETRY_TOLERANCE: f64 = 1e-10;

const POLARIZED_LOW: f64 = 0.15;
const POLARIZED_HIGH: f64 = 0.85;
const POLARIZED_SPREAD: f64 = 0.1;

/// Named generators for relationship matrices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipPreset {
    /// Normal(mean, std_dev) per pair.
    #[default]
    Balanced,
    /// Bimodal: low or high cluster per pair.
    Polarized,
    /// Uniform per pair.
    Random,
}

impl RelationshipPreset {
    /// Preset name as used in configs and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Polarized => "polarized",
            Self::Random => "random",
        }
    }
}

impl fmt::Display for RelationshipPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RelationshipPreset {
    type Err = SeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "balanced" => Ok(Self::Balanced),
            "polarized" => Ok(Self::Polarized),
            "random" => Ok(Self::Random),
            other => Err(SeatError::config(format!(
                "unknown relationship preset '{other}' (expected balanced, polarized or random)"
            ))),
        }
    }
}

/// Symmetric N×N affinity matrix with unit diagonal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct RelationshipMatrix {
    /// Row-major `n * n` values.
    values: Vec<f64>,
    /// Number of agents.
    n: usize,
}

#[derive(Deserialize)]
struct RawMatrix {
    values: Vec<f64>,
    n: usize,
}

impl TryFrom<RawMatrix> for RelationshipMatrix {
    type Error = SeatError;

    fn try_from(raw: RawMatrix) -> SeatResult<Self> {
        check_agent_count(raw.n)?;
        if raw.values.len() != raw.n * raw.n {
            return Err(SeatError::config(format!(
                "relationship matrix for {n} agents needs {} values, got {}",
                raw.n * raw.n,
                raw.values.len(),
                n = raw.n
            )));
        }
        let matrix = Self {
            values: raw.values,
            n: raw.n,
        };
        matrix.validate()?;
        Ok(matrix)
    }
}

impl RelationshipMatrix {
    /// Build a matrix from explicit rows.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the rows are not square, describe
    /// fewer than 1 or more than 9 agents, or fail [`Self::validate`].
    pub fn from_rows(rows: &[Vec<f64>]) -> SeatResult<Self> {
        let n = rows.len();
        check_agent_count(n)?;
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(SeatError::config(format!(
                "relationship matrix is not square: row {} has {} entries, expected {n}",
                i + 1,
                row.len()
            )));
        }

        let matrix = Self {
            values: rows.iter().flatten().copied().collect(),
            n,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Check diagonal, symmetry and range.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` describing the first offending entry.
    pub fn validate(&self) -> SeatResult<()> {
        for i in 0..self.n {
            for j in 0..self.n {
                let v = self.values[i * self.n + j];
                if !v.is_finite() || !(0.0..=1.0).contains(&v) {
                    return Err(SeatError::config(format!(
                        "relationship ({}, {}) = {v} outside [0, 1]",
                        i + 1,
                        j + 1
                    )));
                }
                if i == j && (v - 1.0).abs() > f64::EPSILON {
                    return Err(SeatError::config(format!(
                        "relationship diagonal ({0}, {0}) must be 1.0, got {v}",
                        i + 1
                    )));
                }
                if (v - self.values[j * self.n + i]).abs() > SYMMETRY_TOLERANCE {
                    return Err(SeatError::config(format!(
                        "relationship matrix asymmetric at ({}, {})",
                        i + 1,
                        j + 1
                    )));
                }
            }
        }
        Ok(())
    }

    /// Number of agents covered.
    #[must_use]
    pub const fn num_agents(&self) -> usize {
        self.n
    }

    /// Strength between agents `a` and `b` (1-based).
    ///
    /// # Errors
    ///
    /// Returns `AgentNotFound` if either id is outside `1..=num_agents`.
    pub fn strength(&self, a: AgentId, b: AgentId) -> SeatResult<f64> {
        let row = self.index(a)?;
        let col = self.index(b)?;
        Ok(self.values[row * self.n + col])
    }

    /// Matrix as nested rows.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.values.chunks(self.n).map(<[f64]>::to_vec).collect()
    }

    /// Mean of the strictly upper-triangular entries (0.0 for one agent).
    #[must_use]
    pub fn mean_off_diagonal(&self) -> f64 {
        let pairs = self.n * (self.n - 1) / 2;
        if pairs == 0 {
            return 0.0;
        }
        let sum: f64 = (0..self.n)
            .flat_map(|i| ((i + 1)..self.n).map(move |j| (i, j)))
            .map(|(i, j)| self.values[i * self.n + j])
            .sum();
        sum / pairs as f64
    }

    fn index(&self, agent: AgentId) -> SeatResult<usize> {
        if agent == 0 || agent > self.n {
            return Err(SeatError::AgentNotFound(agent));
        }
        Ok(agent - 1)
    }

    /// Fill the upper triangle in row-major order from `sample`, mirror it.
    fn generate_with<F>(n: usize, mut sample: F) -> Self
    where
        F: FnMut() -> f64,
    {
        let mut values = vec![0.0; n * n];
        for i in 0..n {
            values[i * n + i] = 1.0;
            for j in (i + 1)..n {
                let v = sample().clamp(0.0, 1.0);
                values[i * n + j] = v;
                values[j * n + i] = v;
            }
        }
        Self { values, n }
    }
}

impl fmt::Display for RelationshipMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "     ")?;
        for j in 1..=self.n {
            write!(f, "{j:>6}")?;
        }
        for (i, row) in self.values.chunks(self.n).enumerate() {
            writeln!(f)?;
            write!(f, "{:>4} ", i + 1)?;
            for v in row {
                write!(f, "{v:>6.2}")?;
            }
        }
        Ok(())
    }
}

fn check_agent_count(num_agents: usize) -> SeatResult<()> {
    if num_agents == 0 || num_agents >= NUM_SEATS {
        return Err(SeatError::config(format!(
            "relationship matrix needs 1..={} agents, got {num_agents}",
            NUM_SEATS - 1
        )));
    }
    Ok(())
}

fn check_distribution(mean: f64, std_dev: f64) -> SeatResult<()> {
    if !mean.is_finite() {
        return Err(SeatError::config(format!("relationship mean must be finite, got {mean}")));
    }
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(SeatError::config(format!(
            "relationship std_dev must be finite and non-negative, got {std_dev}"
        )));
    }
    Ok(())
}

/// Balanced matrix: each pair from `Normal(mean, std_dev)`, clamped to `[0, 1]`.
///
/// # Errors
///
/// Returns `InvalidConfiguration` for an agent count outside `1..=9`, a
/// non-finite mean, or a negative/non-finite standard deviation.
///
/// # Example
///
/// ```rust
/// use seatsim::domains::relationships::generate_relationship_matrix;
///
/// let m = generate_relationship_matrix(9, 42, 0.5, 0.2).unwrap();
/// assert!(m.validate().is_ok());
/// ```
pub fn generate_relationship_matrix(
    num_agents: usize,
    seed: u64,
    mean: f64,
    std_dev: f64,
) -> SeatResult<RelationshipMatrix> {
    let mut rng = SimRng::new(seed);
    generate_preset_with(RelationshipPreset::Balanced, num_agents, mean, std_dev, &mut rng)
}

/// Matrix from a named preset. `mean`/`std_dev` only shape the balanced preset.
///
/// # Errors
///
/// Same as [`generate_relationship_matrix`].
pub fn generate_preset_matrix(
    preset: RelationshipPreset,
    num_agents: usize,
    seed: u64,
    mean: f64,
    std_dev: f64,
) -> SeatResult<RelationshipMatrix> {
    let mut rng = SimRng::new(seed);
    generate_preset_with(preset, num_agents, mean, std_dev, &mut rng)
}

/// [`generate_preset_matrix`] drawing from an existing generator.
///
/// # Errors
///
/// Same as [`generate_relationship_matrix`].
pub fn generate_preset_with(
    preset: RelationshipPreset,
    num_agents: usize,
    mean: f64,
    std_dev: f64,
    rng: &mut SimRng,
) -> SeatResult<RelationshipMatrix> {
    check_agent_count(num_agents)?;
    check_distribution(mean, std_dev)?;

    let matrix = match preset {
        RelationshipPreset::Balanced => {
            RelationshipMatrix::generate_with(num_agents, || rng.gen_normal(mean, std_dev))
        }
        RelationshipPreset::Polarized => RelationshipMatrix::generate_with(num_agents, || {
            let center = if rng.gen_f64() < 0.5 {
                POLARIZED_LOW
            } else {
                POLARIZED_HIGH
            };
            rng.gen_normal(center, POLARIZED_SPREAD)
        }),
        RelationshipPreset::Random => {
            RelationshipMatrix::generate_with(num_agents, || rng.gen_f64())
        }
    };
    Ok(matrix)
}
