use super::state::AlgorithmState;
use crate::geometry::Point;

/// Common interface for the steppable clustering engines.
///
/// An engine value only holds parameters. [`Clustering::start`] clones the input points
/// into a fresh run, and the run yields one [`AlgorithmState`] per phase transition until
/// it emits a snapshot with `complete == true`.
pub trait Clustering {
    /// The step machine produced by [`Clustering::start`].
    type Run: Iterator<Item = AlgorithmState>;

    /// Begin a new run over a private copy of `points`.
    fn start(&self, points: &[Point]) -> Self::Run;

    /// The configured number of clusters (if applicable).
    ///
    /// For algorithms that discover the number of clusters dynamically (e.g. DBSCAN),
    /// this returns 0.
    fn n_clusters(&self) -> usize;

    /// Drive a run to completion and return its final snapshot.
    fn run_to_end(&self, points: &[Point]) -> AlgorithmState {
        self.start(points)
            .last()
            .unwrap_or_else(|| AlgorithmState::terminal("No states produced"))
    }

    /// Drive a run to completion and return one label per input point.
    fn fit_predict(&self, points: &[Point]) -> Vec<i32> {
        self.run_to_end(points).labels()
    }
}
