use super::rng::SeededRng;
use super::RingCenter;
use crate::geometry::Point;
use std::f64::consts::{PI, TAU};

const PLANE: f64 = 100.0;

/// Point at polar offset `(r, angle)` from `(cx, cy)`.
#[inline]
fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> Point {
    Point::new(cx + r * angle.cos(), cy + r * angle.sin())
}

/// Area-uniform sample inside a disk.
#[inline]
fn in_disk(cx: f64, cy: f64, radius: f64, rng: &mut SeededRng) -> Point {
    let angle = rng.uniform() * TAU;
    let r = radius * rng.uniform().sqrt();
    polar(cx, cy, r, angle)
}

pub(super) fn uniform(n: usize, rng: &mut SeededRng) -> Vec<Point> {
    (0..n)
        .map(|_| {
            let x = rng.uniform() * PLANE;
            let y = rng.uniform() * PLANE;
            Point::new(x, y)
        })
        .collect()
}

pub(super) fn gaussian_mixture(n: usize, rng: &mut SeededRng) -> Vec<Point> {
    const CENTERS: [(f64, f64); 4] = [(25.0, 25.0), (75.0, 25.0), (25.0, 75.0), (75.0, 75.0)];
    const STD_DEV: f64 = 10.0;

    (0..n)
        .map(|_| {
            let (cx, cy) = CENTERS[rng.index(CENTERS.len())];
            let x = rng.gaussian(cx, STD_DEV);
            let y = rng.gaussian(cy, STD_DEV);
            Point::new(x, y)
        })
        .collect()
}

/// Face outline (half the points), two eyes (a fifth), and a smile arc (the rest).
pub(super) fn smiley(n: usize, rng: &mut SeededRng) -> Vec<Point> {
    const RADIUS: f64 = 40.0;
    const CX: f64 = 50.0;
    const CY: f64 = 50.0;

    let outline = n / 2;
    let eyes = n / 5;
    let smile = n - outline - eyes;

    let mut points = Vec::with_capacity(n);

    for _ in 0..outline {
        let angle = rng.uniform() * TAU;
        let r = RADIUS * (0.9 + rng.uniform() * 0.1);
        points.push(polar(CX, CY, r, angle));
    }

    let eye_radius = RADIUS * 0.15;
    let eye_y = CY - RADIUS * 0.2;
    let left_eye_x = CX - RADIUS * 0.4;
    let right_eye_x = CX + RADIUS * 0.4;
    for i in 0..eyes {
        let angle = rng.uniform() * TAU;
        let r = eye_radius * rng.uniform();
        let eye_x = if 2 * i < eyes { left_eye_x } else { right_eye_x };
        points.push(polar(eye_x, eye_y, r, angle));
    }

    let smile_radius = RADIUS * 0.6;
    for _ in 0..smile {
        let angle = PI * (0.2 + 0.6 * rng.uniform());
        let p = polar(CX, CY, smile_radius, angle);
        points.push(Point::new(p.x, p.y + RADIUS * 0.1));
    }

    points
}

/// Three evenly spaced vertical bars of width 20.
pub(super) fn density_bars(n: usize, rng: &mut SeededRng) -> Vec<Point> {
    const BARS: usize = 3;
    const BAR_WIDTH: f64 = 20.0;
    let spacing = (PLANE - BARS as f64 * BAR_WIDTH) / (BARS as f64 + 1.0);

    (0..n)
        .map(|_| {
            let bar = rng.index(BARS) as f64;
            let x = spacing + bar * (BAR_WIDTH + spacing) + rng.uniform() * BAR_WIDTH;
            let y = 10.0 + rng.uniform() * 80.0;
            Point::new(x, y)
        })
        .collect()
}

/// Four corner disks and a larger center disk; the last disk absorbs the remainder.
pub(super) fn packed_circles(n: usize, rng: &mut SeededRng) -> Vec<Point> {
    const DISKS: [(f64, f64, f64); 5] = [
        (25.0, 25.0, 15.0),
        (75.0, 25.0, 15.0),
        (25.0, 75.0, 15.0),
        (75.0, 75.0, 15.0),
        (50.0, 50.0, 20.0),
    ];

    let per_disk = n / DISKS.len();
    let mut points = Vec::with_capacity(n);

    for (idx, &(cx, cy, radius)) in DISKS.iter().enumerate() {
        let count = if idx == DISKS.len() - 1 {
            n - per_disk * (DISKS.len() - 1)
        } else {
            per_disk
        };
        points.extend((0..count).map(|_| in_disk(cx, cy, radius, rng)));
    }

    points
}

/// Grid of small jittered disks, sized so that each disk is one DBSCAN cluster for the
/// given `eps`/`min_pts`. Only `floor(n / cells) * cells` points are produced, so an `n`
/// smaller than the cell count yields no points at all.
pub(super) fn rings(
    n: usize,
    eps: f64,
    min_pts: usize,
    rng: &mut SeededRng,
) -> (Vec<Point>, Vec<RingCenter>) {
    let side = super::rings_grid_side(min_pts);
    let (rows, cols) = (side, side);
    let spacing_x = PLANE / (cols as f64 + 1.0);
    let spacing_y = PLANE / (rows as f64 + 1.0);
    let jitter = (eps * 0.7).max(2.0);
    let per_center = n / (rows * cols);
    if per_center == 0 {
        log::warn!(
            "rings: {n} points cannot fill a {rows}x{cols} grid, dataset will be empty"
        );
    }

    let mut points = Vec::with_capacity(per_center * rows * cols);
    let mut centers = Vec::with_capacity(rows * cols);

    for row in 1..=rows {
        for col in 1..=cols {
            let cx = col as f64 * spacing_x;
            let cy = row as f64 * spacing_y;
            centers.push(RingCenter {
                x: cx,
                y: cy,
                radius: eps,
            });
            points.extend((0..per_center).map(|_| in_disk(cx, cy, jitter, rng)));
        }
    }

    (points, centers)
}
