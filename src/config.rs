//! Run configuration, loadable from a JSON file.
//!
//! Every field has a default, so `{}` is a valid file. [`Config::validate`] enforces the
//! parameter ranges the visualization is built for.

use crate::dataset::{DatasetKind, DEFAULT_POINTS};
use crate::error::{Error, Result};
use crate::session::{Algorithm, Params};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Accepted range for `k`.
pub const K_RANGE: (usize, usize) = (1, 10);
/// Accepted range for `iterations`.
pub const ITERATIONS_RANGE: (usize, usize) = (1, 20);
/// Accepted range for `eps`.
pub const EPS_RANGE: (f64, f64) = (1.0, 20.0);
/// Accepted range for `min_pts`.
pub const MIN_PTS_RANGE: (usize, usize) = (2, 15);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetKind,
    pub algorithm: Algorithm,
    /// Number of points to generate.
    pub points: usize,
    pub k: usize,
    pub iterations: usize,
    pub eps: f64,
    pub min_pts: usize,
    /// Seed for the k-means initial centroids; random per run when absent.
    pub seed: Option<u64>,
    /// Pause between snapshots; the algorithm's own default when absent.
    pub delay_ms: Option<u64>,
    /// Default `env_logger` filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        let params = Params::default();
        Self {
            dataset: DatasetKind::default(),
            algorithm: Algorithm::default(),
            points: DEFAULT_POINTS,
            k: params.k,
            iterations: params.iterations,
            eps: params.eps,
            min_pts: params.min_pts,
            seed: None,
            delay_ms: None,
            log_level: "warn".to_string(),
        }
    }
}

fn check_usize(name: &'static str, value: usize, (low, high): (usize, usize)) -> Result<()> {
    if (low..=high).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            message: format!("{value} is outside [{low}, {high}]"),
        })
    }
}

impl Config {
    /// Read and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.points == 0 {
            return Err(Error::InvalidParameter {
                name: "points",
                message: "must be at least 1".to_string(),
            });
        }
        check_usize("k", self.k, K_RANGE)?;
        check_usize("iterations", self.iterations, ITERATIONS_RANGE)?;
        check_usize("min_pts", self.min_pts, MIN_PTS_RANGE)?;

        let (low, high) = EPS_RANGE;
        if !(self.eps.is_finite() && (low..=high).contains(&self.eps)) {
            return Err(Error::InvalidParameter {
                name: "eps",
                message: format!("{} is outside [{low}, {high}]", self.eps),
            });
        }
        Ok(())
    }

    pub fn params(&self) -> Params {
        Params {
            k: self.k,
            iterations: self.iterations,
            eps: self.eps,
            min_pts: self.min_pts,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| self.algorithm.default_delay())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Dataset: {} ({} points)", self.dataset, self.points)?;
        writeln!(f, "  Algorithm: {}", self.algorithm)?;
        match self.algorithm {
            Algorithm::Kmeans => {
                writeln!(f, "    k: {}", self.k)?;
                writeln!(f, "    Iterations: {}", self.iterations)?;
                match self.seed {
                    Some(seed) => writeln!(f, "    Seed: {seed}")?,
                    None => writeln!(f, "    Seed: random")?,
                }
            }
            Algorithm::Dbscan => {
                writeln!(f, "    eps: {}", self.eps)?;
                writeln!(f, "    minPts: {}", self.min_pts)?;
            }
        }
        writeln!(f, "  Delay: {} ms", self.delay().as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_object_gives_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.delay(), Duration::from_millis(1200));
    }

    #[test]
    fn partial_file_overrides_fields() {
        let config: Config =
            serde_json::from_str(r#"{"dataset": "rings", "algorithm": "dbscan", "eps": 7.5}"#).unwrap();
        assert_eq!(config.dataset, DatasetKind::Rings);
        assert_eq!(config.algorithm, Algorithm::Dbscan);
        assert_eq!(config.params().eps, 7.5);
        assert_eq!(config.params().min_pts, 4);
        assert_eq!(config.delay(), Duration::from_millis(800));
    }

    #[test]
    fn out_of_range_values_rejected() {
        let cases = [
            Config { k: 0, ..Config::default() },
            Config { k: 11, ..Config::default() },
            Config { iterations: 21, ..Config::default() },
            Config { eps: 0.5, ..Config::default() },
            Config { eps: f64::NAN, ..Config::default() },
            Config { min_pts: 1, ..Config::default() },
            Config { points: 0, ..Config::default() },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(Error::InvalidParameter { .. })),
                "{config:?}"
            );
        }
    }

    #[test]
    fn fractional_eps_accepted() {
        let config = Config { eps: 12.5, ..Config::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_file_reads_and_validates() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("clusterstep-config-{}.json", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"k": 4, "seed": 9, "delay_ms": 0}}"#).unwrap();
        drop(file);

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.k, 4);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.delay(), Duration::ZERO);

        std::fs::write(&path, r#"{"k": 40}"#).unwrap();
        assert!(Config::from_file(&path).is_err());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unknown_dataset_in_file_is_an_error() {
        let err = serde_json::from_str::<Config>(r#"{"dataset": "spiral"}"#);
        assert!(err.is_err());
    }
}
