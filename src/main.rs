use anyhow::Context;
use clap::{Parser, ValueEnum};
use clusterstep::dataset::catalog;
use clusterstep::render::{JsonLinesRenderer, Renderer, TextRenderer};
use clusterstep::{Algorithm, AlgorithmState, CancelToken, Config, DatasetKind, RunOutcome, Session};
use log::info;
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Character grid plus a status line per snapshot.
    Text,
    /// One JSON snapshot per line.
    Json,
}

/// Generate a synthetic dataset and watch k-means or DBSCAN cluster it step by step.
#[derive(Debug, Parser)]
#[command(name = "clusterstep", version)]
struct Cli {
    /// JSON config file; command-line flags take precedence over it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset shape: uniform, gaussian, smiley, density, circles, rings.
    #[arg(long)]
    dataset: Option<DatasetKind>,

    /// Clustering algorithm: kmeans or dbscan.
    #[arg(long)]
    algorithm: Option<Algorithm>,

    /// Number of points to generate.
    #[arg(long)]
    points: Option<usize>,

    /// Number of clusters (k-means).
    #[arg(long)]
    k: Option<usize>,

    /// Maximum assign/update rounds (k-means).
    #[arg(long)]
    iterations: Option<usize>,

    /// Neighborhood radius (DBSCAN, also sizes the rings dataset).
    #[arg(long)]
    eps: Option<f64>,

    /// Density threshold (DBSCAN, also sizes the rings dataset).
    #[arg(long)]
    min_pts: Option<usize>,

    /// Seed for the k-means initial centroids.
    #[arg(long)]
    seed: Option<u64>,

    /// Pause between snapshots in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Stop after this many snapshots.
    #[arg(long)]
    max_steps: Option<usize>,

    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Grid width for text output.
    #[arg(long, default_value_t = 60)]
    width: usize,

    /// Grid height for text output.
    #[arg(long, default_value_t = 24)]
    height: usize,

    /// Print the dataset catalog and exit.
    #[arg(long)]
    list_datasets: bool,
}

impl Cli {
    fn resolve(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(dataset) = self.dataset {
            config.dataset = dataset;
        }
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(points) = self.points {
            config.points = points;
        }
        if let Some(k) = self.k {
            config.k = k;
        }
        if let Some(iterations) = self.iterations {
            config.iterations = iterations;
        }
        if let Some(eps) = self.eps {
            config.eps = eps;
        }
        if let Some(min_pts) = self.min_pts {
            config.min_pts = min_pts;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.delay_ms.is_some() {
            config.delay_ms = self.delay_ms;
        }

        config.validate().context("invalid parameters")?;
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.resolve()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    if cli.list_datasets {
        for info in catalog() {
            println!("{:<10} {:<18} {}", info.kind, info.name, info.description);
        }
        return Ok(());
    }

    info!("{config}");

    let mut session =
        Session::with_points(config.algorithm, config.dataset, config.points, config.params());
    if let Some(seed) = config.seed {
        session = session.with_seed(seed);
    }

    let stdout = io::stdout().lock();
    let mut renderer: Box<dyn Renderer> = match cli.format {
        Format::Text => Box::new(TextRenderer::new(stdout, cli.width, cli.height)),
        Format::Json => Box::new(JsonLinesRenderer::new(stdout)),
    };

    let cancel = CancelToken::new();
    let mut rendered = 0usize;
    let mut limited = |state: &AlgorithmState| -> clusterstep::Result<()> {
        renderer.render(state)?;
        rendered += 1;
        if cli.max_steps.is_some_and(|max| rendered >= max) {
            cancel.cancel();
        }
        Ok(())
    };

    let outcome = session
        .run(config.delay(), &cancel, &mut limited)
        .context("rendering snapshots")?;

    match outcome {
        RunOutcome::Completed => info!("run complete: {}", session.current().message),
        RunOutcome::Cancelled => info!("stopped at step {}", session.current().step),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "clusterstep",
            "--dataset",
            "rings",
            "--algorithm",
            "dbscan",
            "--eps",
            "7.5",
            "--delay-ms",
            "0",
        ]);
        let config = cli.resolve().unwrap();
        assert_eq!(config.dataset, DatasetKind::Rings);
        assert_eq!(config.algorithm, Algorithm::Dbscan);
        assert_eq!(config.eps, 7.5);
        assert_eq!(config.delay(), Duration::ZERO);
    }

    #[test]
    fn out_of_range_flag_rejected() {
        let cli = Cli::parse_from(["clusterstep", "--k", "42"]);
        assert!(cli.resolve().is_err());
    }

    #[test]
    fn unknown_dataset_flag_rejected() {
        assert!(Cli::try_parse_from(["clusterstep", "--dataset", "spiral"]).is_err());
    }
}
