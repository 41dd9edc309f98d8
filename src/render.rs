//! Snapshot consumers.
//!
//! A renderer only ever reads snapshots. It must not reinterpret labels: colors come
//! straight from the raw cluster label through [`cluster_hue`], which is why k-means
//! (0-based) and DBSCAN (1-based) keep their own numbering.

use crate::cluster::{AlgorithmState, PointStatus, VisPoint, NOISE};
use crate::error::Result;
use std::io::Write;

/// Something that draws snapshots.
pub trait Renderer {
    fn render(&mut self, state: &AlgorithmState) -> Result<()>;
}

impl<F> Renderer for F
where
    F: FnMut(&AlgorithmState) -> Result<()>,
{
    fn render(&mut self, state: &AlgorithmState) -> Result<()> {
        self(state)
    }
}

/// Hue in degrees for a cluster label (golden-angle spacing).
pub fn cluster_hue(label: i32) -> u16 {
    (i64::from(label) * 137).rem_euclid(360) as u16
}

/// Draws the `[0, 100]²` plane as a character grid followed by a status line.
///
/// | Glyph | Meaning |
/// |---|---|
/// | `.` | unassigned / normal |
/// | `a`..`z` | k-means point, by label |
/// | `#` | DBSCAN core point |
/// | `+` | DBSCAN border point |
/// | `~` | noise |
/// | `*` | highlighted point |
/// | `@` | centroid |
///
/// When several points share a cell the last one drawn wins; centroids are drawn last.
#[derive(Debug, Clone)]
pub struct TextRenderer<W> {
    out: W,
    width: usize,
    height: usize,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W, width: usize, height: usize) -> Self {
        Self {
            out,
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn cell(&self, p: &VisPoint) -> Option<(usize, usize)> {
        if !(0.0..=100.0).contains(&p.x) || !(0.0..=100.0).contains(&p.y) {
            return None;
        }
        let col = ((p.x / 100.0) * (self.width - 1) as f64).round() as usize;
        let row = ((p.y / 100.0) * (self.height - 1) as f64).round() as usize;
        Some((row, col))
    }

    /// Draw a snapshot into rows of characters.
    pub fn grid(&self, state: &AlgorithmState) -> Vec<String> {
        let mut grid = vec![vec![' '; self.width]; self.height];
        let ordered = state
            .data_points()
            .chain(state.centroids());
        for p in ordered {
            if let Some((row, col)) = self.cell(p) {
                grid[row][col] = glyph(p);
            }
        }
        grid.into_iter().map(|row| row.into_iter().collect()).collect()
    }
}

fn glyph(p: &VisPoint) -> char {
    match p.status {
        PointStatus::Centroid => '@',
        PointStatus::Highlighted => '*',
        PointStatus::Core => '#',
        PointStatus::Border => '+',
        PointStatus::Noise => '~',
        PointStatus::Normal if p.cluster == NOISE => '~',
        PointStatus::Normal if p.cluster >= 0 => (b'a' + (p.cluster % 26) as u8) as char,
        PointStatus::Normal => '.',
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, state: &AlgorithmState) -> Result<()> {
        let border = format!("+{}+", "-".repeat(self.width));
        let rows = self.grid(state);
        writeln!(self.out, "{border}")?;
        for row in rows {
            writeln!(self.out, "|{row}|")?;
        }
        writeln!(self.out, "{border}")?;
        let marker = if state.complete { " (complete)" } else { "" };
        writeln!(self.out, "[step {}] {}{}", state.step, state.message, marker)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Writes each snapshot as one JSON object per line.
#[derive(Debug)]
pub struct JsonLinesRenderer<W> {
    out: W,
}

impl<W: Write> JsonLinesRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for JsonLinesRenderer<W> {
    fn render(&mut self, state: &AlgorithmState) -> Result<()> {
        serde_json::to_writer(&mut self.out, state)?;
        self.out.write_all(b"\n")?;
        self.out.flush()?;
        Ok(())
    }
}
