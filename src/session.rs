//! Interactive driver around one dataset and one engine.
//!
//! A [`Session`] owns the immutable base points and, once started, exactly one engine
//! run. Every run is built from the base points, so resets and parameter changes never
//! see a previous run's labels. [`Session::step`] pulls a single snapshot;
//! [`Session::run`] pulls until completion with a pause between snapshots and stops as
//! soon as its [`CancelToken`] fires, leaving the run paused where it was.

use crate::cluster::{AlgorithmState, Clustering, Dbscan, DbscanRun, Kmeans, KmeansRun};
use crate::dataset::{generate_dataset, Dataset, DatasetKind, DEFAULT_POINTS};
use crate::error::{Error, Result};
use crate::render::Renderer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const LOADED: &str = "Dataset loaded. Use controls to start clustering.";
const UPDATED: &str = "Dataset updated for new parameters.";
const PARAMS_CHANGED: &str = "Parameters updated. Use controls to start clustering.";
const RESET: &str = "Reset complete. Ready to restart clustering.";

/// Longest uninterrupted sleep while pacing, so cancellation is noticed promptly.
const CANCEL_POLL: Duration = Duration::from_millis(10);

/// Which engine a session drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    #[default]
    Kmeans,
    Dbscan,
}

impl Algorithm {
    /// Pause between snapshots when running to completion.
    pub fn default_delay(self) -> Duration {
        match self {
            Algorithm::Kmeans => Duration::from_millis(1200),
            Algorithm::Dbscan => Duration::from_millis(800),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Kmeans => f.write_str("kmeans"),
            Algorithm::Dbscan => f.write_str("dbscan"),
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kmeans" | "k-means" => Ok(Algorithm::Kmeans),
            "dbscan" => Ok(Algorithm::Dbscan),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

/// Engine parameters for both algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Params {
    pub k: usize,
    pub iterations: usize,
    pub eps: f64,
    pub min_pts: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            k: 3,
            iterations: 10,
            eps: 5.0,
            min_pts: 4,
        }
    }
}

/// Shared stop flag for [`Session::run`].
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Re-arm the token so it can drive another run.
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// How [`Session::run`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The final snapshot was delivered.
    Completed,
    /// The token fired; the run is paused and can be resumed.
    Cancelled,
}

#[derive(Debug, Clone)]
enum EngineRun {
    Kmeans(KmeansRun),
    Dbscan(DbscanRun),
}

impl Iterator for EngineRun {
    type Item = AlgorithmState;

    fn next(&mut self) -> Option<AlgorithmState> {
        match self {
            EngineRun::Kmeans(run) => run.next(),
            EngineRun::Dbscan(run) => run.next(),
        }
    }
}

/// One dataset, one algorithm, at most one live run.
#[derive(Debug, Clone)]
pub struct Session {
    algorithm: Algorithm,
    dataset: DatasetKind,
    n: usize,
    params: Params,
    seed: Option<u64>,
    base: Dataset,
    current: AlgorithmState,
    run: Option<EngineRun>,
}

impl Session {
    /// Generate the dataset and show it unclustered.
    pub fn new(algorithm: Algorithm, dataset: DatasetKind, params: Params) -> Self {
        Self::with_points(algorithm, dataset, DEFAULT_POINTS, params)
    }

    /// Like [`Session::new`] with an explicit point count.
    pub fn with_points(algorithm: Algorithm, dataset: DatasetKind, n: usize, params: Params) -> Self {
        let base = generate(dataset, n, &params);
        let current = AlgorithmState::loaded(&base.points, LOADED);
        Self {
            algorithm,
            dataset,
            n,
            params,
            seed: None,
            base,
            current,
            run: None,
        }
    }

    /// Fix the k-means initialization seed for every run of this session.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn dataset(&self) -> DatasetKind {
        self.dataset
    }

    pub fn params(&self) -> Params {
        self.params
    }

    /// The immutable points every run starts from, plus ring overlay centers.
    pub fn base(&self) -> &Dataset {
        &self.base
    }

    /// The latest snapshot.
    pub fn current(&self) -> &AlgorithmState {
        &self.current
    }

    /// Whether a run has been started and not yet discarded.
    pub fn is_started(&self) -> bool {
        self.run.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.run.is_some() && self.current.complete
    }

    fn start_run(&self) -> EngineRun {
        let points = &self.base.points;
        match self.algorithm {
            Algorithm::Kmeans => {
                let mut kmeans = Kmeans::new(self.params.k).with_max_iter(self.params.iterations);
                if let Some(seed) = self.seed {
                    kmeans = kmeans.with_seed(seed);
                }
                EngineRun::Kmeans(kmeans.start(points))
            }
            Algorithm::Dbscan => {
                EngineRun::Dbscan(Dbscan::new(self.params.eps, self.params.min_pts).start(points))
            }
        }
    }

    /// Pull one snapshot, starting a run first if needed.
    ///
    /// Returns `None` once the run has delivered its final snapshot.
    pub fn step(&mut self) -> Option<&AlgorithmState> {
        if self.is_complete() {
            return None;
        }
        if self.run.is_none() {
            log::debug!("session: starting {} on {}", self.algorithm, self.dataset);
            self.run = Some(self.start_run());
        }
        let state = self.run.as_mut()?.next()?;
        self.current = state;
        Some(&self.current)
    }

    /// Pull snapshots into `renderer` until the run completes or `cancel` fires,
    /// sleeping `delay` between snapshots.
    pub fn run<R: Renderer + ?Sized>(
        &mut self,
        delay: Duration,
        cancel: &CancelToken,
        renderer: &mut R,
    ) -> Result<RunOutcome> {
        loop {
            if cancel.is_cancelled() {
                log::debug!("session: run cancelled at step {}", self.current.step);
                return Ok(RunOutcome::Cancelled);
            }
            let Some(state) = self.step() else {
                return Ok(RunOutcome::Completed);
            };
            renderer.render(state)?;
            if state.complete {
                return Ok(RunOutcome::Completed);
            }
            if pause(delay, cancel) {
                return Ok(RunOutcome::Cancelled);
            }
        }
    }

    /// Change engine parameters. Any live run is discarded. Under DBSCAN the `rings`
    /// dataset is regenerated when `eps` or `min_pts` changed, since its layout depends
    /// on them.
    pub fn set_params(&mut self, params: Params) {
        if params == self.params {
            return;
        }
        let reshape = self.algorithm == Algorithm::Dbscan
            && self.dataset == DatasetKind::Rings
            && (params.eps != self.params.eps || params.min_pts != self.params.min_pts);
        self.params = params;
        self.run = None;
        if reshape {
            self.base = generate(self.dataset, self.n, &self.params);
            self.current = AlgorithmState::loaded(&self.base.points, UPDATED);
        } else {
            self.current = AlgorithmState::loaded(&self.base.points, PARAMS_CHANGED);
        }
    }

    /// Switch to another dataset shape.
    pub fn set_dataset(&mut self, dataset: DatasetKind) {
        self.dataset = dataset;
        self.run = None;
        self.base = generate(dataset, self.n, &self.params);
        self.current = AlgorithmState::loaded(&self.base.points, LOADED);
    }

    /// Switch to the other engine over the same points.
    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
        self.run = None;
        self.current = AlgorithmState::loaded(&self.base.points, LOADED);
    }

    /// Discard the run and show the dataset unclustered again.
    pub fn reset(&mut self) {
        self.run = None;
        self.base = generate(self.dataset, self.n, &self.params);
        self.current = AlgorithmState::loaded(&self.base.points, RESET);
    }
}

fn generate(dataset: DatasetKind, n: usize, params: &Params) -> Dataset {
    generate_dataset(dataset, n, Some(params.eps), Some(params.min_pts))
}

/// Sleep for `delay` in short slices. Returns `true` if cancelled meanwhile.
fn pause(delay: Duration, cancel: &CancelToken) -> bool {
    let deadline = Instant::now() + delay;
    loop {
        if cancel.is_cancelled() {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        std::thread::sleep((deadline - now).min(CANCEL_POLL));
    }
}
