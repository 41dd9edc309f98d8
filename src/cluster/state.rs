//! Snapshot types shared by both engines.
//!
//! An [`AlgorithmState`] is one immutable frame of a run: the full point list (with
//! labels and render status), a monotonic step number, a human-readable phase message,
//! and whether the run is finished. Engines build every snapshot from a fresh clone of
//! their working points, so a consumer may keep and compare snapshots freely.
//!
//! Label conventions differ per engine and are part of the contract: k-means numbers
//! clusters from 0, DBSCAN from 1. Both use [`UNASSIGNED`] for points not yet processed
//! and DBSCAN uses [`NOISE`] for outliers.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Label of a point that has not been processed yet.
pub const UNASSIGNED: i32 = -2;

/// Label of a point that is not density-reachable from any core point.
pub const NOISE: i32 = -1;

/// Render classification of a point, independent of its numeric label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointStatus {
    #[default]
    Normal,
    Highlighted,
    Centroid,
    Core,
    Border,
    Noise,
}

/// A point as the renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisPoint {
    pub x: f64,
    pub y: f64,
    /// Cluster label, or one of [`UNASSIGNED`] / [`NOISE`].
    pub cluster: i32,
    pub status: PointStatus,
    /// Previous centroid position, present only in the snapshot that moved it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Vec<VisPoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight_radius: Option<f64>,
}

impl VisPoint {
    /// An unprocessed point.
    pub fn unassigned(p: &Point) -> Self {
        Self::labeled(p, UNASSIGNED, PointStatus::Normal)
    }

    pub fn labeled(p: &Point, cluster: i32, status: PointStatus) -> Self {
        Self {
            x: p.x,
            y: p.y,
            cluster,
            status,
            connections: None,
            highlight_radius: None,
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_centroid(&self) -> bool {
        self.status == PointStatus::Centroid
    }

    pub fn is_noise(&self) -> bool {
        self.cluster == NOISE
    }
}

/// One frame of a clustering run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmState {
    pub points: Vec<VisPoint>,
    pub step: usize,
    pub message: String,
    pub complete: bool,
}

impl AlgorithmState {
    /// A single finished frame with no points, used for degenerate input.
    pub(crate) fn terminal(message: impl Into<String>) -> Self {
        Self {
            points: Vec::new(),
            step: 0,
            message: message.into(),
            complete: true,
        }
    }

    /// Every input point unassigned, before any engine has touched them.
    pub fn loaded(points: &[Point], message: impl Into<String>) -> Self {
        Self {
            points: points.iter().map(VisPoint::unassigned).collect(),
            step: 0,
            message: message.into(),
            complete: false,
        }
    }

    /// Labels of the data points, in input order (centroids excluded).
    pub fn labels(&self) -> Vec<i32> {
        self.data_points().map(|p| p.cluster).collect()
    }

    /// Data points, in input order (centroids excluded).
    pub fn data_points(&self) -> impl Iterator<Item = &VisPoint> {
        self.points.iter().filter(|p| !p.is_centroid())
    }

    /// Centroid markers (k-means only).
    pub fn centroids(&self) -> impl Iterator<Item = &VisPoint> {
        self.points.iter().filter(|p| p.is_centroid())
    }

    /// Number of distinct non-negative labels among the data points.
    pub fn cluster_count(&self) -> usize {
        let mut labels: Vec<i32> = self
            .data_points()
            .map(|p| p.cluster)
            .filter(|&c| c >= 0)
            .collect();
        labels.sort_unstable();
        labels.dedup();
        labels.len()
    }

    /// Number of data points labeled [`NOISE`].
    pub fn noise_count(&self) -> usize {
        self.data_points().filter(|p| p.is_noise()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AlgorithmState {
        let p = Point::new(1.0, 2.0);
        AlgorithmState {
            points: vec![
                VisPoint::labeled(&p, 1, PointStatus::Core),
                VisPoint::labeled(&p, 1, PointStatus::Border),
                VisPoint::labeled(&p, 3, PointStatus::Core),
                VisPoint::labeled(&p, NOISE, PointStatus::Noise),
                VisPoint::labeled(&p, 0, PointStatus::Centroid),
            ],
            step: 4,
            message: "x".into(),
            complete: true,
        }
    }

    #[test]
    fn counts_skip_centroids() {
        let s = state();
        assert_eq!(s.labels(), vec![1, 1, 3, NOISE]);
        assert_eq!(s.cluster_count(), 2);
        assert_eq!(s.noise_count(), 1);
        assert_eq!(s.centroids().count(), 1);
    }

    #[test]
    fn serializes_in_renderer_shape() {
        let mut p = VisPoint::labeled(&Point::new(1.0, 2.0), 0, PointStatus::Centroid);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["status"], "centroid");
        assert!(json.get("connections").is_none());
        assert!(json.get("highlightRadius").is_none());

        p.highlight_radius = Some(3.0);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["highlightRadius"], 3.0);
    }

    #[test]
    fn loaded_state_is_unassigned() {
        let pts = [Point::new(0.0, 0.0), Point::new(1.0, 1.0)];
        let s = AlgorithmState::loaded(&pts, "ready");
        assert!(!s.complete);
        assert!(s.points.iter().all(|p| p.cluster == UNASSIGNED));
        assert!(s.points.iter().all(|p| p.status == PointStatus::Normal));
    }
}
