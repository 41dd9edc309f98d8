//! Steppable clustering engines.
//!
//! Both engines are pull-based state machines: [`Clustering::start`] clones the input
//! into a fresh run, and the run is an [`Iterator`] that computes one phase per `next()`
//! and yields an [`AlgorithmState`] snapshot for it. Nothing runs in the background;
//! dropping a run halfway is always fine.
//!
//! ## Algorithms
//!
//! ### K-means
//!
//! The classic algorithm: assign each point to the nearest centroid, then
//! update centroids to the mean of their points. Repeat.
//!
//! **Objective**: Minimize within-cluster sum of squares:
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! ```
//!
//! **Assumptions**:
//! - Clusters are roughly spherical
//! - Clusters have similar sizes
//! - You know k in advance
//!
//! ### DBSCAN
//!
//! Density-based clustering that can discover non-convex clusters and identify
//! outliers (noise points). DBSCAN does not require specifying the number of
//! clusters in advance.
//!
//! ## Labels
//!
//! K-means labels clusters `0..k`, DBSCAN labels them `1..=count`. The renderer derives
//! colors from the raw label, so the two bases are kept as they are. `-2` marks a point
//! not yet processed and `-1` marks DBSCAN noise.
//!
//! ## Usage
//!
//! ```rust
//! use clusterstep::cluster::{Clustering, Dbscan, Kmeans};
//! use clusterstep::Point;
//!
//! let data = vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(0.1, 0.1),
//!     Point::new(10.0, 10.0),
//!     Point::new(10.1, 10.1),
//! ];
//!
//! // Pull snapshots one at a time.
//! let mut run = Kmeans::new(2).with_seed(42).start(&data);
//! let first = run.next().unwrap();
//! assert_eq!(first.step, 0);
//!
//! // Or drain the run and keep the final labels.
//! let labels = Kmeans::new(2).with_seed(42).fit_predict(&data);
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//!
//! let labels = Dbscan::new(0.5, 2).fit_predict(&data);
//! assert_eq!(labels, vec![1, 1, 2, 2]);
//! ```

mod dbscan;
mod kmeans;
mod state;
mod traits;

pub use dbscan::{run_density_clustering, Dbscan, DbscanRun};
pub use kmeans::{run_centroid_clustering, Kmeans, KmeansRun, DEFAULT_MAX_ITER};
pub use state::{AlgorithmState, PointStatus, VisPoint, NOISE, UNASSIGNED};
pub use traits::Clustering;
