//! Steppable clustering for visualization.
//!
//! `clusterstep` runs k-means and DBSCAN as pull-based state machines that yield one
//! immutable snapshot per algorithmic phase, over 2D points from six deterministic
//! synthetic generators.
//!
//! - [`dataset`]: seeded point generators (uniform, gaussian, smiley, density, circles, rings)
//! - [`cluster`]: the k-means and DBSCAN step machines and the snapshot types they emit
//! - [`render`]: the read-only consumer side of the snapshot contract
//! - [`session`]: an interactive driver with stepping, paced runs, cancellation and reset
//!
//! ```rust
//! use clusterstep::cluster::{Clustering, Dbscan};
//! use clusterstep::dataset::{generate_dataset, DatasetKind};
//!
//! let dataset = generate_dataset(DatasetKind::Circles, 750, None, None);
//! let run = Dbscan::new(5.0, 4).start(&dataset.points);
//! let mut last = None;
//! for state in run {
//!     last = Some(state);
//! }
//! let last = last.unwrap();
//! assert!(last.complete);
//! assert!(last.points.iter().all(|p| p.cluster != clusterstep::UNASSIGNED));
//! ```

#![forbid(unsafe_code)]

pub mod cluster;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geometry;
pub mod render;
pub mod session;

pub use cluster::{
    run_centroid_clustering, run_density_clustering, AlgorithmState, Clustering, Dbscan,
    DbscanRun, Kmeans, KmeansRun, PointStatus, VisPoint, NOISE, UNASSIGNED,
};
pub use config::Config;
pub use dataset::{generate_dataset, Dataset, DatasetKind, RingCenter};
pub use error::{Error, Result};
pub use geometry::Point;
pub use session::{Algorithm, CancelToken, Params, RunOutcome, Session};
