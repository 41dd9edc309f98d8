//! DBSCAN: Density-Based Spatial Clustering of Applications with Noise, as a steppable
//! state machine.
//!
//! # The Algorithm (Ester et al., 1996)
//!
//! DBSCAN groups points by neighborhood density. Unlike k-means, it:
//!
//! - Discovers clusters of arbitrary shape
//! - Automatically determines the number of clusters
//! - Identifies noise points (outliers)
//!
//! ## Core Concepts
//!
//! - **Epsilon (ε)**: Maximum distance between two points to be neighbors (inclusive).
//! - **MinPts**: Minimum size of a point's ε-neighborhood, the point itself included,
//!   for the point to be "core".
//! - **Core point**: Its ε-neighborhood holds at least MinPts points.
//! - **Border point**: Within ε of a core point but not core itself.
//! - **Noise point**: Neither core nor border.
//!
//! ## Algorithm Steps
//!
//! 1. For each unvisited point P, in index order:
//!    - If P is not dense, mark it as noise (it may become a border point later)
//!    - Else P is core: start new cluster, expand breadth-first from its neighbors
//!
//! 2. Expansion: for each queued neighbor:
//!    - Noise seen earlier is reclaimed as a border point of this cluster
//!    - Unvisited points join the cluster; dense ones are core and enqueue their own
//!      unvisited or noise neighbors, the rest are border points
//!
//! ## Snapshot sequence
//!
//! One snapshot when the run starts, one when a new cluster is seeded, one when that
//! cluster has been fully expanded, and a final complete snapshot with the totals.
//! Step numbers increase by one per snapshot. Cluster labels start at 1.
//!
//! ## Complexity
//!
//! - **Time**: O(n²) for the neighbor lists, computed once per run.
//! - **Space**: O(n + E) where E is the number of neighbor pairs.

use super::state::{AlgorithmState, PointStatus, VisPoint, NOISE, UNASSIGNED};
use super::traits::Clustering;
use crate::geometry::{squared_euclidean, Point};
use std::collections::VecDeque;

/// DBSCAN parameters.
#[derive(Debug, Clone)]
pub struct Dbscan {
    /// Epsilon: maximum distance for neighborhood.
    epsilon: f64,
    /// Minimum points for core point classification.
    min_pts: usize,
}

impl Dbscan {
    /// Create a new DBSCAN clusterer.
    ///
    /// # Arguments
    ///
    /// * `epsilon` - Maximum distance between two points to be neighbors.
    /// * `min_pts` - Minimum number of points (the point itself included) to form a
    ///   dense region. Values of 0 or 1 make every point core.
    pub fn new(epsilon: f64, min_pts: usize) -> Self {
        Self { epsilon, min_pts }
    }

    /// Set epsilon (neighborhood radius).
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set minimum points for core classification.
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn min_pts(&self) -> usize {
        self.min_pts
    }
}

impl Default for Dbscan {
    fn default() -> Self {
        Self::new(5.0, 4)
    }
}

impl Clustering for Dbscan {
    type Run = DbscanRun;

    fn start(&self, points: &[Point]) -> DbscanRun {
        if points.is_empty() {
            log::debug!("dbscan: no points");
        } else {
            log::info!(
                "dbscan: starting run with n={}, eps={}, min_pts={}",
                points.len(),
                self.epsilon,
                self.min_pts
            );
        }
        DbscanRun {
            points: points.iter().map(VisPoint::unassigned).collect(),
            epsilon: self.epsilon,
            min_pts: self.min_pts,
            neighbors: Vec::new(),
            visited: vec![false; points.len()],
            cursor: 0,
            cluster_count: 0,
            step: 0,
            phase: if points.is_empty() {
                Phase::Degenerate
            } else {
                Phase::Initial
            },
        }
    }

    /// DBSCAN discovers clusters dynamically, so this returns 0.
    fn n_clusters(&self) -> usize {
        0
    }
}

/// Start a DBSCAN run.
pub fn run_density_clustering(points: &[Point], eps: f64, min_pts: usize) -> DbscanRun {
    Dbscan::new(eps, min_pts).start(points)
}

/// Indices `j != i` within `eps` of each point `i` (inclusive boundary).
fn neighbor_lists(points: &[VisPoint], eps: f64) -> Vec<Vec<usize>> {
    let eps_sq = eps * eps;
    let positions: Vec<Point> = points.iter().map(VisPoint::position).collect();
    positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            positions
                .iter()
                .enumerate()
                .filter(|&(j, q)| j != i && squared_euclidean(p, q) <= eps_sq)
                .map(|(j, _)| j)
                .collect()
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Degenerate,
    Initial,
    Scan,
    /// A core point has been labeled and announced; its cluster is not expanded yet.
    Expand { seed: usize },
    Finished,
}

/// An in-progress DBSCAN run. Yields [`AlgorithmState`]s until one is complete.
#[derive(Debug, Clone)]
pub struct DbscanRun {
    points: Vec<VisPoint>,
    epsilon: f64,
    min_pts: usize,
    /// Filled on the first scan.
    neighbors: Vec<Vec<usize>>,
    visited: Vec<bool>,
    /// Next index the scan will look at.
    cursor: usize,
    cluster_count: i32,
    /// Step number of the next snapshot.
    step: usize,
    phase: Phase,
}

impl DbscanRun {
    /// Clusters found so far.
    pub fn cluster_count(&self) -> usize {
        self.cluster_count as usize
    }

    /// Whether the final snapshot has been yielded.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Neighborhood size of `idx`, the point itself included.
    #[inline]
    fn is_dense(&self, idx: usize) -> bool {
        self.neighbors[idx].len() + 1 >= self.min_pts
    }

    fn snapshot(&mut self, message: String, complete: bool) -> AlgorithmState {
        let step = self.step;
        if !complete {
            self.step += 1;
        }
        AlgorithmState {
            points: self.points.clone(),
            step,
            message,
            complete,
        }
    }

    fn label(&mut self, idx: usize, cluster: i32, status: PointStatus) {
        let p = &mut self.points[idx];
        p.cluster = cluster;
        p.status = status;
    }

    /// Advance the scan to the next unvisited dense point, labeling sparse points as
    /// noise on the way. Returns the new cluster seed, if any.
    fn scan(&mut self) -> Option<usize> {
        while self.cursor < self.points.len() {
            let i = self.cursor;
            self.cursor += 1;
            if self.visited[i] {
                continue;
            }
            self.visited[i] = true;

            if !self.is_dense(i) {
                self.label(i, NOISE, PointStatus::Noise);
                continue;
            }

            self.cluster_count += 1;
            self.label(i, self.cluster_count, PointStatus::Core);
            return Some(i);
        }
        None
    }

    /// Breadth-first expansion of the current cluster from `seed`. Returns the cluster size.
    fn expand(&mut self, seed: usize) -> usize {
        let cluster = self.cluster_count;
        let mut size = 1;
        let mut queue: VecDeque<usize> = self.neighbors[seed].iter().copied().collect();

        while let Some(idx) = queue.pop_front() {
            if self.visited[idx] {
                // Noise seen earlier in the scan is density-reachable after all.
                if self.points[idx].cluster == NOISE {
                    self.label(idx, cluster, PointStatus::Border);
                    size += 1;
                }
                continue;
            }
            self.visited[idx] = true;
            size += 1;

            if self.is_dense(idx) {
                self.label(idx, cluster, PointStatus::Core);
                let (visited, points) = (&self.visited, &self.points);
                queue.extend(
                    self.neighbors[idx]
                        .iter()
                        .copied()
                        .filter(|&n| !visited[n] || points[n].cluster == NOISE),
                );
            } else {
                self.label(idx, cluster, PointStatus::Border);
            }
        }
        size
    }

    /// Force anything still unassigned to noise. Returns how many points were fixed up.
    fn sweep(&mut self) -> usize {
        let mut fixed = 0;
        for p in &mut self.points {
            if p.cluster == UNASSIGNED {
                p.cluster = NOISE;
                p.status = PointStatus::Noise;
                fixed += 1;
            }
        }
        if fixed > 0 {
            log::warn!("dbscan: {fixed} points were never classified, marked as noise");
        }
        fixed
    }
}

impl Iterator for DbscanRun {
    type Item = AlgorithmState;

    fn next(&mut self) -> Option<AlgorithmState> {
        match self.phase {
            Phase::Finished => None,
            Phase::Degenerate => {
                self.phase = Phase::Finished;
                Some(AlgorithmState::terminal("No points to cluster"))
            }
            Phase::Initial => {
                self.phase = Phase::Scan;
                let message = format!(
                    "DBSCAN initialized with eps={}, minPts={}",
                    self.epsilon, self.min_pts
                );
                Some(self.snapshot(message, false))
            }
            Phase::Scan => {
                if self.neighbors.len() != self.points.len() {
                    self.neighbors = neighbor_lists(&self.points, self.epsilon);
                }
                match self.scan() {
                    Some(seed) => {
                        self.phase = Phase::Expand { seed };
                        let c = self.cluster_count;
                        log::debug!("dbscan: cluster {c} seeded at point {seed}");
                        self.points[seed].highlight_radius = Some(self.epsilon);
                        let state =
                            self.snapshot(format!("Found cluster {c} starting from core point"), false);
                        self.points[seed].highlight_radius = None;
                        Some(state)
                    }
                    None => {
                        self.sweep();
                        self.phase = Phase::Finished;
                        let noise = self.points.iter().filter(|p| p.cluster == NOISE).count();
                        let clusters = self.cluster_count;
                        log::info!("dbscan: {clusters} clusters, {noise} noise points");
                        Some(self.snapshot(
                            format!("DBSCAN complete: {clusters} clusters, {noise} noise points"),
                            true,
                        ))
                    }
                }
            }
            Phase::Expand { seed } => {
                let size = self.expand(seed);
                self.phase = Phase::Scan;
                let c = self.cluster_count;
                log::debug!("dbscan: cluster {c} has {size} points");
                Some(self.snapshot(format!("Cluster {c} complete with {size} points"), false))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::needless_range_loop)]
mod tests {
    use super::*;
    use crate::dataset::{generate_dataset, DatasetKind};

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().copied().map(Point::from).collect()
    }

    #[test]
    fn two_pairs_make_two_clusters() {
        let data = pts(&[(0.0, 0.0), (1.0, 1.0), (50.0, 50.0), (51.0, 51.0)]);
        let last = Dbscan::new(3.0, 2).run_to_end(&data);
        assert!(last.complete);
        assert_eq!(last.labels(), vec![1, 1, 2, 2]);
        assert_eq!(last.cluster_count(), 2);
        assert_eq!(last.noise_count(), 0);
        assert_eq!(last.message, "DBSCAN complete: 2 clusters, 0 noise points");
    }

    #[test]
    fn isolated_points_are_noise() {
        let data = pts(&[(0.0, 0.0), (100.0, 100.0), (50.0, 0.0)]);
        let last = Dbscan::new(1.0, 2).run_to_end(&data);
        assert_eq!(last.labels(), vec![NOISE; 3]);
        assert!(last.points.iter().all(|p| p.status == PointStatus::Noise));
        assert_eq!(last.message, "DBSCAN complete: 0 clusters, 3 noise points");
    }

    #[test]
    fn empty_input_single_terminal_state() {
        let states: Vec<_> = run_density_clustering(&[], 5.0, 4).collect();
        assert_eq!(states.len(), 1);
        assert!(states[0].complete);
        assert_eq!(states[0].message, "No points to cluster");
    }

    #[test]
    fn eps_boundary_is_inclusive() {
        let data = pts(&[(0.0, 0.0), (3.0, 4.0)]);
        let last = Dbscan::new(5.0, 2).run_to_end(&data);
        assert_eq!(last.labels(), vec![1, 1]);
    }

    #[test]
    fn noise_is_reclaimed_as_border() {
        // Point 0 sits at the end of a chain: sparse on its own, but within eps of the
        // dense point 1, which is scanned after it.
        let data = pts(&[(0.0, 0.0), (1.0, 0.0), (1.5, 0.0), (2.0, 0.0)]);
        let last = Dbscan::new(1.0, 3).run_to_end(&data);
        assert_eq!(last.labels(), vec![1, 1, 1, 1]);
        assert_eq!(last.points[0].status, PointStatus::Border);
        assert_eq!(last.points[1].status, PointStatus::Core);
        assert_eq!(last.noise_count(), 0);
    }

    #[test]
    fn noise_reclaimed_from_core_found_during_expansion() {
        // Point 0 neighbors only point 4, which is core but not the seed (point 1).
        let data = pts(&[(0.0, 0.0), (3.0, 0.0), (2.0, 0.0), (4.0, 0.0), (1.0, 0.0)]);
        let states: Vec<_> = Dbscan::new(1.0, 3).start(&data).collect();
        let last = states.last().unwrap();
        assert_eq!(last.labels(), vec![1, 1, 1, 1, 1]);
        let statuses: Vec<_> = last.points.iter().map(|p| p.status).collect();
        assert_eq!(
            statuses,
            vec![
                PointStatus::Border,
                PointStatus::Core,
                PointStatus::Core,
                PointStatus::Border,
                PointStatus::Core,
            ]
        );
        assert!(states.iter().any(|s| s.message == "Cluster 1 complete with 5 points"));
        assert_eq!(last.message, "DBSCAN complete: 1 clusters, 0 noise points");
    }

    #[test]
    fn core_and_border_statuses() {
        // A tight triangle plus one straggler reachable only from a single core point.
        let data = pts(&[(0.0, 0.0), (0.5, 0.0), (0.0, 0.5), (1.4, 0.0)]);
        let last = Dbscan::new(1.0, 3).run_to_end(&data);
        assert_eq!(last.labels(), vec![1, 1, 1, 1]);
        assert_eq!(last.points[3].status, PointStatus::Border);
        assert_eq!(last.points[0].status, PointStatus::Core);
    }

    #[test]
    fn zero_min_pts_makes_every_point_core() {
        let data = pts(&[(0.0, 0.0), (50.0, 50.0), (90.0, 10.0)]);
        let last = Dbscan::new(1.0, 0).run_to_end(&data);
        assert_eq!(last.labels(), vec![1, 2, 3]);
        assert!(last.points.iter().all(|p| p.status == PointStatus::Core));
    }

    #[test]
    fn snapshot_sequence_and_steps() {
        let data = pts(&[(0.0, 0.0), (1.0, 1.0), (50.0, 50.0), (51.0, 51.0), (90.0, 0.0)]);
        let states: Vec<_> = Dbscan::new(3.0, 2).start(&data).collect();
        let messages: Vec<&str> = states.iter().map(|s| s.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "DBSCAN initialized with eps=3, minPts=2",
                "Found cluster 1 starting from core point",
                "Cluster 1 complete with 2 points",
                "Found cluster 2 starting from core point",
                "Cluster 2 complete with 2 points",
                "DBSCAN complete: 2 clusters, 1 noise points",
            ]
        );
        let steps: Vec<usize> = states.iter().map(|s| s.step).collect();
        assert_eq!(steps, vec![0, 1, 2, 3, 4, 5]);
        assert!(states.iter().rev().skip(1).all(|s| !s.complete));
    }

    #[test]
    fn seed_snapshot_carries_highlight() {
        let data = pts(&[(0.0, 0.0), (1.0, 1.0)]);
        let states: Vec<_> = Dbscan::new(3.0, 2).start(&data).collect();
        assert_eq!(states[1].points[0].highlight_radius, Some(3.0));
        assert!(states[2].points.iter().all(|p| p.highlight_radius.is_none()));
    }

    #[test]
    fn completes_on_every_dataset() {
        for kind in DatasetKind::ALL {
            let data = generate_dataset(kind, 300, None, None).points;
            let last = Dbscan::new(5.0, 4).run_to_end(&data);
            assert!(last.complete);
            assert_eq!(last.points.len(), data.len());
            for p in &last.points {
                assert_ne!(p.cluster, UNASSIGNED);
                assert!(matches!(
                    p.status,
                    PointStatus::Core | PointStatus::Border | PointStatus::Noise
                ));
                assert_eq!(p.cluster == NOISE, p.status == PointStatus::Noise);
            }
        }
    }

    #[test]
    fn sparse_unreachable_points_end_as_noise() {
        let data = generate_dataset(DatasetKind::Uniform, 400, None, None).points;
        let (eps, min_pts) = (4.0, 5);
        let last = Dbscan::new(eps, min_pts).run_to_end(&data);
        let neighbors = neighbor_lists(&last.points, eps);
        let is_core = |i: usize| neighbors[i].len() + 1 >= min_pts;
        for i in 0..data.len() {
            let reachable = neighbors[i].iter().any(|&j| is_core(j));
            if !is_core(i) && !reachable {
                assert_eq!(last.points[i].cluster, NOISE);
                assert_eq!(last.points[i].status, PointStatus::Noise);
            }
        }
    }

    #[test]
    fn noise_points_have_no_core_neighbor() {
        for kind in [DatasetKind::Uniform, DatasetKind::Density, DatasetKind::Smiley] {
            let data = generate_dataset(kind, 400, None, None).points;
            let (eps, min_pts) = (3.0, 5);
            let last = Dbscan::new(eps, min_pts).run_to_end(&data);
            let neighbors = neighbor_lists(&last.points, eps);
            for i in 0..data.len() {
                if last.points[i].cluster == NOISE {
                    assert!(neighbors[i].len() + 1 < min_pts, "{kind}: noise point {i} is dense");
                    assert!(
                        neighbors[i].iter().all(|&j| last.points[j].status != PointStatus::Core),
                        "{kind}: noise point {i} neighbors a core point"
                    );
                }
            }
        }
    }

    #[test]
    fn rings_dataset_yields_one_cluster_per_center() {
        let dataset = generate_dataset(DatasetKind::Rings, 750, Some(5.0), Some(4));
        let last = Dbscan::new(5.0, 4).run_to_end(&dataset.points);
        assert_eq!(last.cluster_count(), dataset.centers.len());
    }

    #[test]
    fn runs_are_deterministic() {
        let data = generate_dataset(DatasetKind::Smiley, 400, None, None).points;
        let a = Dbscan::new(4.5, 5).fit_predict(&data);
        let b = Dbscan::new(4.5, 5).fit_predict(&data);
        assert_eq!(a, b);
    }
}
