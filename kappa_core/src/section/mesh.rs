//! Section discretization and rotation
//!
//! The rectangular section `[0, a] × [0, b]` is split into a uniform grid of
//! fibers. Rows are generated from the top edge downward; every coordinate is
//! measured from the bottom-left corner, which is also the rotation origin.
//!
//! ```text
//!   y
//!   b ┌──┬──┬──┐ ← row 0
//!     ├──┼──┼──┤
//!     ├──┼──┼──┤
//!   0 └──┴──┴──┘ → x
//!     0        a
//! ```

use serde::{Deserialize, Serialize};

use crate::equations::section::bar_area_cm2;

/// A point in section coordinates (cm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }

    /// Rotate about the origin by `angle_rad` (counter-clockwise positive).
    pub fn rotated(self, angle_rad: f64) -> Self {
        let (sin, cos) = angle_rad.sin_cos();
        Point2 {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

/// One rectangular fiber of the concrete mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fiber {
    /// Centroid (cm)
    pub centroid: Point2,
    /// Fiber area (cm²)
    pub area_cm2: f64,
}

/// Uniform fiber grid over a rectangular section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionMesh {
    /// Section width `a` (cm)
    pub width_cm: f64,
    /// Section depth `b` (cm)
    pub depth_cm: f64,
    /// Fibers per side
    pub divisions: usize,
    /// Fibers, row by row from the top edge
    pub fibers: Vec<Fiber>,
}

impl SectionMesh {
    /// Discretize an `a × b` section into `divisions × divisions` fibers.
    pub fn new(width_cm: f64, depth_cm: f64, divisions: usize) -> Self {
        let n = divisions.max(1);
        let dx = width_cm / n as f64;
        let dy = depth_cm / n as f64;
        let area = dx * dy;

        let mut fibers = Vec::with_capacity(n * n);
        for row in 0..n {
            let top = depth_cm - row as f64 * dy;
            for col in 0..n {
                fibers.push(Fiber {
                    centroid: Point2::new(col as f64 * dx + dx / 2.0, top - dy / 2.0),
                    area_cm2: area,
                });
            }
        }

        Self {
            width_cm,
            depth_cm,
            divisions: n,
            fibers,
        }
    }

    /// Sum of fiber areas (equals a·b; bars are not deducted here)
    pub fn total_area(&self) -> f64 {
        self.fibers.iter().map(|f| f.area_cm2).sum()
    }

    /// Section outline, counter-clockwise from the origin
    pub fn polygon(&self) -> [Point2; 4] {
        [
            Point2::new(0.0, 0.0),
            Point2::new(self.width_cm, 0.0),
            Point2::new(self.width_cm, self.depth_cm),
            Point2::new(0.0, self.depth_cm),
        ]
    }
}

/// A longitudinal reinforcing bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReinforcingBar {
    /// Centroid x (cm), 0 ≤ x ≤ a
    pub x_cm: f64,
    /// Centroid y (cm), 0 ≤ y ≤ b
    pub y_cm: f64,
    /// Nominal diameter (mm)
    pub diameter_mm: f64,
}

impl ReinforcingBar {
    pub fn new(x_cm: f64, y_cm: f64, diameter_mm: f64) -> Self {
        ReinforcingBar {
            x_cm,
            y_cm,
            diameter_mm,
        }
    }

    /// Bar area (cm²)
    pub fn area_cm2(&self) -> f64 {
        bar_area_cm2(self.diameter_mm)
    }

    pub fn centroid(&self) -> Point2 {
        Point2::new(self.x_cm, self.y_cm)
    }

    /// True when the centroid lies inside `[0, a] × [0, b]`
    pub fn is_within(&self, width_cm: f64, depth_cm: f64) -> bool {
        (0.0..=width_cm).contains(&self.x_cm) && (0.0..=depth_cm).contains(&self.y_cm)
    }
}

/// A fiber or bar with both its original and rotated coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotatedPoint {
    /// Original coordinates (used for the resisting moments)
    pub original: Point2,
    /// Rotated coordinates (used for strains)
    pub calc: Point2,
    /// Area (cm²)
    pub area_cm2: f64,
}

/// The section, its fibers and its bars rotated by one loading angle.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatedSection {
    pub angle_rad: f64,
    pub polygon: Vec<Point2>,
    pub fibers: Vec<RotatedPoint>,
    pub bars: Vec<RotatedPoint>,
}

impl RotatedSection {
    pub fn new(mesh: &SectionMesh, bars: &[ReinforcingBar], angle_rad: f64) -> Self {
        let polygon = mesh
            .polygon()
            .iter()
            .map(|p| p.rotated(angle_rad))
            .collect();
        let fibers = mesh
            .fibers
            .iter()
            .map(|f| RotatedPoint {
                original: f.centroid,
                calc: f.centroid.rotated(angle_rad),
                area_cm2: f.area_cm2,
            })
            .collect();
        let bars = bars
            .iter()
            .map(|b| RotatedPoint {
                original: b.centroid(),
                calc: b.centroid().rotated(angle_rad),
                area_cm2: b.area_cm2(),
            })
            .collect();

        Self {
            angle_rad,
            polygon,
            fibers,
            bars,
        }
    }

    /// Highest rotated outline ordinate (most compressed fiber)
    pub fn top_y(&self) -> f64 {
        self.polygon.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max)
    }

    /// Lowest rotated outline ordinate
    pub fn bottom_y(&self) -> f64 {
        self.polygon.iter().map(|p| p.y).fold(f64::INFINITY, f64::min)
    }

    /// Rotated section height, top to bottom
    pub fn height(&self) -> f64 {
        self.top_y() - self.bottom_y()
    }

    /// Effective depth: from the most compressed fiber to the lowest bar.
    ///
    /// NaN when the section has no bars.
    pub fn effective_depth(&self) -> f64 {
        if self.bars.is_empty() {
            return f64::NAN;
        }
        let lowest_bar = self
            .bars
            .iter()
            .map(|b| b.calc.y)
            .fold(f64::INFINITY, f64::min);
        self.top_y() - lowest_bar
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn corner_bars() -> Vec<ReinforcingBar> {
        vec![
            ReinforcingBar::new(4.0, 4.0, 16.0),
            ReinforcingBar::new(16.0, 4.0, 16.0),
            ReinforcingBar::new(4.0, 36.0, 16.0),
            ReinforcingBar::new(16.0, 36.0, 16.0),
        ]
    }

    #[test]
    fn test_mesh_layout() {
        let mesh = SectionMesh::new(20.0, 40.0, 20);
        assert_eq!(mesh.fibers.len(), 400);
        // First fiber: top-left corner
        assert!((mesh.fibers[0].centroid.x - 0.5).abs() < 1e-12);
        assert!((mesh.fibers[0].centroid.y - 39.0).abs() < 1e-12);
        // Last fiber: bottom-right corner
        let last = mesh.fibers[399].centroid;
        assert!((last.x - 19.5).abs() < 1e-12);
        assert!((last.y - 1.0).abs() < 1e-12);
        assert!((mesh.fibers[0].area_cm2 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_mesh_area_sums_to_gross_area() {
        let mesh = SectionMesh::new(20.0, 40.0, 20);
        assert!((mesh.total_area() - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_rotation_round_trip() {
        let mesh = SectionMesh::new(20.0, 40.0, 20);
        let theta = 0.7345;
        for fiber in &mesh.fibers {
            let back = fiber.centroid.rotated(theta).rotated(-theta);
            assert!((back.x - fiber.centroid.x).abs() < 1e-9);
            assert!((back.y - fiber.centroid.y).abs() < 1e-9);
        }
    }

    #[test]
    fn test_effective_depth_unrotated() {
        let mesh = SectionMesh::new(20.0, 40.0, 20);
        let rotated = RotatedSection::new(&mesh, &corner_bars(), 0.0);
        assert!((rotated.effective_depth() - 36.0).abs() < 1e-12);
        assert!((rotated.height() - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_effective_depth_quarter_turn() {
        let mesh = SectionMesh::new(20.0, 40.0, 20);
        let rotated = RotatedSection::new(&mesh, &corner_bars(), FRAC_PI_2);
        // After +90°, y' = x: top at 20, lowest bar at x = 4
        assert!((rotated.effective_depth() - 16.0).abs() < 1e-9);
        assert!((rotated.height() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_bars_depth_is_nan() {
        let mesh = SectionMesh::new(20.0, 40.0, 20);
        assert!(RotatedSection::new(&mesh, &[], 0.0).effective_depth().is_nan());
    }

    #[test]
    fn test_bar_bounds() {
        assert!(ReinforcingBar::new(20.0, 0.0, 10.0).is_within(20.0, 40.0));
        assert!(!ReinforcingBar::new(21.0, 5.0, 10.0).is_within(20.0, 40.0));
        assert!(!ReinforcingBar::new(5.0, -0.1, 10.0).is_within(20.0, 40.0));
    }
}
