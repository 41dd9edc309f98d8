//! K-means as a steppable state machine.
//!
//! # Lloyd's Algorithm
//!
//! 1. Initialize k centroids at k distinct data points, sampled without replacement
//! 2. **Assign**: each point → nearest centroid (ties go to the lowest centroid index)
//! 3. **Update**: each centroid → mean of its assigned points
//! 4. Repeat until no assignment changes, or the round budget runs out
//!
//! # Snapshot sequence
//!
//! ```text
//! step 0        initial centroids, every point unassigned (-2)
//! step 2r-1     round r: about to assign
//! step 2r       round r: points assigned
//! step 2r+1     round r: converged (complete), or centroids moved
//! step 2R+1     budget of R rounds exhausted (complete)
//! ```
//!
//! Each snapshot lists the data points in input order followed by the centroid markers.
//! In the "centroids moved" snapshot every centroid that moved carries its previous
//! position in [`VisPoint::connections`]; the field is cleared again before the next
//! round.
//!
//! # Failure Modes
//!
//! - **Local optima**: Lloyd finds a local minimum only; the result depends on the
//!   random initial centroids
//! - **Wrong k**: k must be given in advance
//! - **Empty clusters**: a centroid that attracts no points keeps its position

use super::state::{AlgorithmState, PointStatus, VisPoint, UNASSIGNED};
use super::traits::Clustering;
use crate::geometry::{centroid, euclidean, Point};
use rand::prelude::*;
use rand::seq::index;

/// Default round budget.
pub const DEFAULT_MAX_ITER: usize = 10;

/// K-means parameters.
#[derive(Debug, Clone)]
pub struct Kmeans {
    /// Number of clusters.
    k: usize,
    /// Maximum assign/update rounds.
    max_iter: usize,
    /// Random seed for the initial centroids. `None` draws a fresh seed per run.
    seed: Option<u64>,
}

impl Kmeans {
    /// Create a new K-means clusterer.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            max_iter: DEFAULT_MAX_ITER,
            seed: None,
        }
    }

    /// Set the maximum number of assign/update rounds. Zero is treated as one.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// Begin a run whose initial centroids are drawn from `rng`.
    pub fn start_with_rng<R: Rng + ?Sized>(&self, points: &[Point], rng: &mut R) -> KmeansRun {
        if points.is_empty() || self.k == 0 {
            log::debug!("k-means: degenerate input (n={}, k={})", points.len(), self.k);
            return KmeansRun::degenerate();
        }

        let n = points.len();
        let count = self.k.min(n);
        let centroids: Vec<VisPoint> = index::sample(rng, n, count)
            .into_iter()
            .enumerate()
            .map(|(label, idx)| VisPoint::labeled(&points[idx], label as i32, PointStatus::Centroid))
            .collect();

        log::info!(
            "k-means: starting run with n={}, k={}, max_iter={}",
            n,
            centroids.len(),
            self.max_iter
        );

        KmeansRun {
            points: points.iter().map(VisPoint::unassigned).collect(),
            centroids,
            max_iter: self.max_iter.max(1),
            round: 0,
            converged: false,
            phase: Phase::Initial,
        }
    }
}

impl Default for Kmeans {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Clustering for Kmeans {
    type Run = KmeansRun;

    fn start(&self, points: &[Point]) -> KmeansRun {
        let mut rng: Box<dyn RngCore> = match self.seed {
            Some(s) => Box::new(StdRng::seed_from_u64(s)),
            None => Box::new(rand::rng()),
        };
        self.start_with_rng(points, &mut rng)
    }

    fn n_clusters(&self) -> usize {
        self.k
    }
}

/// Start a k-means run with a fresh random initialization.
pub fn run_centroid_clustering(points: &[Point], k: usize, max_iterations: usize) -> KmeansRun {
    Kmeans::new(k).with_max_iter(max_iterations).start(points)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Degenerate,
    Initial,
    Announce,
    Assign,
    Converged,
    Update,
    Exhausted,
    Finished,
}

/// An in-progress k-means run. Yields [`AlgorithmState`]s until one is complete.
#[derive(Debug, Clone)]
pub struct KmeansRun {
    points: Vec<VisPoint>,
    centroids: Vec<VisPoint>,
    max_iter: usize,
    /// Current round, 1-based once the first round is announced.
    round: usize,
    converged: bool,
    phase: Phase,
}

impl KmeansRun {
    fn degenerate() -> Self {
        Self {
            points: Vec::new(),
            centroids: Vec::new(),
            max_iter: 1,
            round: 0,
            converged: false,
            phase: Phase::Degenerate,
        }
    }

    /// Rounds started so far.
    pub fn iterations(&self) -> usize {
        self.round
    }

    /// Whether the run stopped because no assignment changed.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Whether the final snapshot has been yielded.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Current centroid positions, in label order.
    pub fn centroid_positions(&self) -> Vec<Point> {
        self.centroids.iter().map(VisPoint::position).collect()
    }

    fn snapshot(&self, step: usize, message: String, complete: bool) -> AlgorithmState {
        let mut points = Vec::with_capacity(self.points.len() + self.centroids.len());
        points.extend(self.points.iter().cloned());
        points.extend(self.centroids.iter().cloned());
        AlgorithmState {
            points,
            step,
            message,
            complete,
        }
    }

    /// Assign every point to its nearest centroid; returns whether any label changed.
    fn assign(&mut self) -> bool {
        let mut changed = false;
        for point in &mut self.points {
            let pos = point.position();
            let mut best = 0usize;
            let mut best_dist = f64::INFINITY;
            for (i, c) in self.centroids.iter().enumerate() {
                let d = euclidean(&pos, &c.position());
                // Strict `<` keeps the lowest index on ties.
                if d < best_dist {
                    best_dist = d;
                    best = i;
                }
            }
            let label = best as i32;
            if point.cluster != label {
                point.cluster = label;
                changed = true;
            }
        }
        changed
    }

    /// Move each centroid to the mean of its members, remembering where it was.
    fn update(&mut self) {
        for (i, c) in self.centroids.iter_mut().enumerate() {
            let label = i as i32;
            let members: Vec<Point> = self
                .points
                .iter()
                .filter(|p| p.cluster == label)
                .map(VisPoint::position)
                .collect();

            if let Some(mean) = centroid(&members) {
                let previous = VisPoint::labeled(&c.position(), label, PointStatus::Normal);
                c.connections = Some(vec![previous]);
                c.x = mean.x;
                c.y = mean.y;
            }
        }
    }

    fn clear_connections(&mut self) {
        for c in &mut self.centroids {
            c.connections = None;
        }
    }
}

impl Iterator for KmeansRun {
    type Item = AlgorithmState;

    fn next(&mut self) -> Option<AlgorithmState> {
        let r = self.round;
        let state = match self.phase {
            Phase::Finished => return None,
            Phase::Degenerate => {
                self.phase = Phase::Finished;
                AlgorithmState::terminal("No points or invalid k value")
            }
            Phase::Initial => {
                debug_assert!(self.points.iter().all(|p| p.cluster == UNASSIGNED));
                self.round = 1;
                self.phase = Phase::Announce;
                self.snapshot(
                    0,
                    "Initial random centroids placed with random assignments".to_string(),
                    false,
                )
            }
            Phase::Announce => {
                self.phase = Phase::Assign;
                self.snapshot(
                    2 * r - 1,
                    format!("Step {r}: Assigning each point to nearest centroid..."),
                    false,
                )
            }
            Phase::Assign => {
                let changed = self.assign();
                log::debug!("k-means round {r}: assignments changed = {changed}");
                self.phase = if changed {
                    Phase::Update
                } else {
                    Phase::Converged
                };
                self.snapshot(2 * r, format!("Step {r}: Points assigned to clusters"), false)
            }
            Phase::Converged => {
                self.converged = true;
                self.phase = Phase::Finished;
                log::info!("k-means converged after {r} rounds");
                self.snapshot(2 * r + 1, "K-means has converged!".to_string(), true)
            }
            Phase::Update => {
                self.update();
                let state = self.snapshot(
                    2 * r + 1,
                    format!("Step {r}: Centroids updated to cluster means"),
                    false,
                );
                self.clear_connections();
                if r >= self.max_iter {
                    self.phase = Phase::Exhausted;
                } else {
                    self.round += 1;
                    self.phase = Phase::Announce;
                }
                state
            }
            Phase::Exhausted => {
                self.phase = Phase::Finished;
                log::info!("k-means stopped after {r} rounds without converging");
                self.snapshot(2 * r + 1, "K-means clustering complete".to_string(), true)
            }
        };
        Some(state)
    }
}
