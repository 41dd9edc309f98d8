//! Deterministic synthetic datasets.
//!
//! Six shapes, each driven by its own fixed seed so that the same `(kind, n)` request
//! always yields a bit-identical point list:
//!
//! | Key | Shape | Seed |
//! |---|---|---|
//! | `uniform` | uniform over `[0, 100)²` | 1001 |
//! | `gaussian` | 4 Gaussian blobs, σ = 10 | 1002 |
//! | `smiley` | face outline, two eyes, smile arc | 1003 |
//! | `density` | three vertical bars | 1004 |
//! | `circles` | five packed disks | 1005 |
//! | `rings` | grid of small disks sized from `eps`/`min_pts` | 1006 |
//!
//! Generation never fails. Unknown keys resolve to `uniform` through
//! [`DatasetKind::from_key`], and out-of-range counts or parameters fall back to the
//! defaults below.
//!
//! ```rust
//! use clusterstep::dataset::{generate_dataset, DatasetKind};
//!
//! let a = generate_dataset(DatasetKind::Uniform, 10, None, None);
//! let b = generate_dataset(DatasetKind::Uniform, 10, None, None);
//! assert_eq!(a.points, b.points);
//! assert_eq!(a.points.len(), 10);
//! ```

mod rng;
mod shapes;

pub use rng::SeededRng;

use crate::error::Error;
use crate::geometry::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default number of points per dataset.
pub const DEFAULT_POINTS: usize = 750;
/// Default neighborhood radius used to size the `rings` dataset.
pub const DEFAULT_EPS: f64 = 5.0;
/// Default density threshold used to size the `rings` dataset.
pub const DEFAULT_MIN_PTS: usize = 4;

/// The available dataset shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    #[default]
    Uniform,
    Gaussian,
    Smiley,
    Density,
    Circles,
    Rings,
}

impl DatasetKind {
    /// Every shape, in catalog order.
    pub const ALL: [DatasetKind; 6] = [
        DatasetKind::Uniform,
        DatasetKind::Gaussian,
        DatasetKind::Smiley,
        DatasetKind::Density,
        DatasetKind::Circles,
        DatasetKind::Rings,
    ];

    /// Lenient lookup: unknown keys fall back to [`DatasetKind::Uniform`].
    pub fn from_key(key: &str) -> Self {
        key.parse().unwrap_or_else(|_| {
            log::warn!("unknown dataset key {key:?}, falling back to uniform");
            DatasetKind::Uniform
        })
    }

    /// Stable lower-case key.
    pub fn key(self) -> &'static str {
        match self {
            DatasetKind::Uniform => "uniform",
            DatasetKind::Gaussian => "gaussian",
            DatasetKind::Smiley => "smiley",
            DatasetKind::Density => "density",
            DatasetKind::Circles => "circles",
            DatasetKind::Rings => "rings",
        }
    }

    /// Seed of the generator that backs this shape.
    pub fn seed(self) -> u64 {
        match self {
            DatasetKind::Uniform => 1001,
            DatasetKind::Gaussian => 1002,
            DatasetKind::Smiley => 1003,
            DatasetKind::Density => 1004,
            DatasetKind::Circles => 1005,
            DatasetKind::Rings => 1006,
        }
    }

    /// Display name and short description.
    pub fn info(self) -> DatasetInfo {
        let (name, description) = match self {
            DatasetKind::Uniform => ("Uniform Points", "Randomly distributed points"),
            DatasetKind::Gaussian => ("Gaussian Mixture", "Points in normal distributions"),
            DatasetKind::Smiley => ("Smiley Face", "Points forming a face pattern"),
            DatasetKind::Density => ("Density Bars", "Bars with varying point density"),
            DatasetKind::Circles => ("Packed Circles", "Dense circular clusters"),
            DatasetKind::Rings => ("DBSCAN Rings", "Concentric rings of points"),
        };
        DatasetInfo {
            kind: self,
            name,
            description,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DatasetKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DatasetKind::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownDataset(s.to_string()))
    }
}

/// Catalog entry describing a dataset shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DatasetInfo {
    pub kind: DatasetKind,
    pub name: &'static str,
    pub description: &'static str,
}

/// All catalog entries, in catalog order.
pub fn catalog() -> Vec<DatasetInfo> {
    DatasetKind::ALL.into_iter().map(DatasetKind::info).collect()
}

/// Overlay geometry for one cell of the `rings` grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingCenter {
    pub x: f64,
    pub y: f64,
    /// The `eps` the dataset was generated for.
    pub radius: f64,
}

/// A generated point list plus optional overlay geometry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dataset {
    pub points: Vec<Point>,
    /// Non-empty only for [`DatasetKind::Rings`].
    pub centers: Vec<RingCenter>,
}

/// Generate a dataset with the shape's own fixed seed.
///
/// `eps` and `min_pts` only matter for [`DatasetKind::Rings`]; `None` means the
/// defaults ([`DEFAULT_EPS`], [`DEFAULT_MIN_PTS`]).
pub fn generate_dataset(
    kind: DatasetKind,
    n: usize,
    eps: Option<f64>,
    min_pts: Option<usize>,
) -> Dataset {
    let mut rng = SeededRng::new(kind.seed());
    generate_dataset_with(kind, n, eps, min_pts, &mut rng)
}

/// Generate a dataset drawing from an explicit generator.
pub fn generate_dataset_with(
    kind: DatasetKind,
    n: usize,
    eps: Option<f64>,
    min_pts: Option<usize>,
    rng: &mut SeededRng,
) -> Dataset {
    let n = if n == 0 {
        log::warn!("requested 0 points, using {DEFAULT_POINTS}");
        DEFAULT_POINTS
    } else {
        n
    };

    let dataset = match kind {
        DatasetKind::Uniform => Dataset::from_points(shapes::uniform(n, rng)),
        DatasetKind::Gaussian => Dataset::from_points(shapes::gaussian_mixture(n, rng)),
        DatasetKind::Smiley => Dataset::from_points(shapes::smiley(n, rng)),
        DatasetKind::Density => Dataset::from_points(shapes::density_bars(n, rng)),
        DatasetKind::Circles => Dataset::from_points(shapes::packed_circles(n, rng)),
        DatasetKind::Rings => {
            let eps = eps
                .filter(|e| e.is_finite() && *e > 0.0)
                .unwrap_or(DEFAULT_EPS);
            let min_pts = min_pts.filter(|&m| m > 0).unwrap_or(DEFAULT_MIN_PTS);
            let (points, centers) = shapes::rings(n, eps, min_pts, rng);
            Dataset { points, centers }
        }
    };

    log::debug!(
        "generated {} dataset: {} points, {} centers",
        kind,
        dataset.points.len(),
        dataset.centers.len()
    );
    dataset
}

impl Dataset {
    fn from_points(points: Vec<Point>) -> Self {
        Self {
            points,
            centers: Vec::new(),
        }
    }
}

/// Side length of the `rings` grid for a given `min_pts`.
pub fn rings_grid_side(min_pts: usize) -> usize {
    ((min_pts as f64).sqrt().max(3.0) + 2.0).ceil() as usize
}
