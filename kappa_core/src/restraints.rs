//! # Lateral Restraints and Column Segmentation
//!
//! Lateral restraints ("travamentos") brace the column in one axis at a given
//! height. They split the column into segments, set the effective buckling
//! length of each axis and carry the axial force and end moments that apply
//! just above and below the brace.
//!
//! ## Coordinates
//!
//! Heights are measured in cm from the column base (0) to its top (`h`).
//! The physical base and top always count as braced.
//!
//! ```text
//!   h ┬  top (braced)
//!     │
//!     ├─ restraint x @ 170   ← splits both x and unfiltered segmentations
//!     │
//!   0 ┴  base (braced)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use kappa_core::restraints::{divide_into_segments, effective_buckling_length, Axis, Restraint};
//!
//! let restraints = vec![Restraint::new(Axis::X, 170.0)];
//! let segments = divide_into_segments(340.0, &restraints, None);
//! assert_eq!(segments.len(), 2);
//!
//! assert_eq!(effective_buckling_length(340.0, &restraints, Axis::X), 170.0);
//! assert_eq!(effective_buckling_length(340.0, &restraints, Axis::Y), 340.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Two coordinates closer than this (cm) are the same point.
pub const COORDINATE_TOLERANCE: f64 = 1e-9;

/// Compressions at one coordinate that differ by more than this (kN) conflict.
const COMPRESSION_TOLERANCE: f64 = 1e-9;

// ============================================================================
// Axis
// ============================================================================

/// Bending / bracing axis of the column section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    pub fn display_name(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Restraint
// ============================================================================

/// A lateral brace at a given height, acting on one axis.
///
/// Forces and moments are characteristic values; the design calculation
/// multiplies them by γf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restraint {
    /// Unique identifier (for UI row management)
    pub id: Uuid,

    /// Braced axis
    pub axis: Axis,

    /// Height above the column base (cm), 0 ≤ coordinate ≤ h
    pub coordinate_cm: f64,

    /// Characteristic axial compression in the column at this point (kN)
    #[serde(default)]
    pub compression_kn: f64,

    /// Characteristic moment just above the brace (kN·m)
    #[serde(default)]
    pub moment_above_knm: f64,

    /// Characteristic moment just below the brace (kN·m)
    #[serde(default)]
    pub moment_below_knm: f64,
}

impl Restraint {
    /// Create a brace with zero compression and moments.
    pub fn new(axis: Axis, coordinate_cm: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            axis,
            coordinate_cm,
            compression_kn: 0.0,
            moment_above_knm: 0.0,
            moment_below_knm: 0.0,
        }
    }

    /// Set the axial compression at the brace
    pub fn with_compression(mut self, compression_kn: f64) -> Self {
        self.compression_kn = compression_kn;
        self
    }

    /// Set the moments just above and just below the brace
    pub fn with_moments(mut self, above_knm: f64, below_knm: f64) -> Self {
        self.moment_above_knm = above_knm;
        self.moment_below_knm = below_knm;
        self
    }

    /// True when this brace sits at `coordinate_cm`
    pub fn is_at(&self, coordinate_cm: f64) -> bool {
        (self.coordinate_cm - coordinate_cm).abs() <= COORDINATE_TOLERANCE
    }
}

/// First restraint on `axis` located at `coordinate_cm`.
pub fn restraint_at(restraints: &[Restraint], axis: Axis, coordinate_cm: f64) -> Option<&Restraint> {
    restraints
        .iter()
        .find(|r| r.axis == axis && r.is_at(coordinate_cm))
}

/// True when at least one restraint acts on `axis`.
pub fn has_restraint_on(restraints: &[Restraint], axis: Axis) -> bool {
    restraints.iter().any(|r| r.axis == axis)
}

// ============================================================================
// Segments
// ============================================================================

/// A stretch of column between two consecutive brace coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Lower end (cm)
    pub start_cm: f64,
    /// Upper end (cm)
    pub end_cm: f64,
    /// Lower end braced in x
    pub start_braced_x: bool,
    /// Upper end braced in x
    pub end_braced_x: bool,
    /// Lower end braced in y
    pub start_braced_y: bool,
    /// Upper end braced in y
    pub end_braced_y: bool,
}

impl Segment {
    /// Segment length (cm)
    pub fn length(&self) -> f64 {
        self.end_cm - self.start_cm
    }

    /// Mid-height of the segment (cm)
    pub fn centre(&self) -> f64 {
        self.start_cm + self.length() / 2.0
    }

    /// Braced on `axis` only if both ends are braced on it.
    pub fn is_braced(&self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.start_braced_x && self.end_braced_x,
            Axis::Y => self.start_braced_y && self.end_braced_y,
        }
    }

    /// True when `coordinate_cm` lies within the segment (ends included)
    pub fn contains(&self, coordinate_cm: f64) -> bool {
        coordinate_cm >= self.start_cm - COORDINATE_TOLERANCE
            && coordinate_cm <= self.end_cm + COORDINATE_TOLERANCE
    }
}

fn is_column_end(coordinate_cm: f64, height_cm: f64) -> bool {
    coordinate_cm.abs() <= COORDINATE_TOLERANCE
        || (coordinate_cm - height_cm).abs() <= COORDINATE_TOLERANCE
}

fn is_braced_at(coordinate_cm: f64, height_cm: f64, restraints: &[Restraint], axis: Axis) -> bool {
    is_column_end(coordinate_cm, height_cm)
        || restraints
            .iter()
            .any(|r| r.axis == axis && r.is_at(coordinate_cm))
}

/// Split the column at restraint coordinates.
///
/// The cut points are `{0, h}` plus every restraint coordinate inside
/// `[0, h]`, optionally only those on `axis`. Consecutive distinct cut points
/// form the segments, so the result always partitions `[0, h]`. An empty
/// vector is returned for a non-positive or non-finite height.
pub fn divide_into_segments(height_cm: f64, restraints: &[Restraint], axis: Option<Axis>) -> Vec<Segment> {
    if !height_cm.is_finite() || height_cm <= 0.0 {
        return Vec::new();
    }

    let mut cuts: Vec<f64> = vec![0.0, height_cm];
    cuts.extend(
        restraints
            .iter()
            .filter(|r| axis.map_or(true, |a| r.axis == a))
            .map(|r| r.coordinate_cm)
            .filter(|c| c.is_finite() && *c >= 0.0 && *c <= height_cm),
    );
    cuts.sort_by(|a, b| a.total_cmp(b));
    cuts.dedup_by(|a, b| (*a - *b).abs() <= COORDINATE_TOLERANCE);

    cuts.windows(2)
        .map(|w| {
            let (start, end) = (w[0], w[1]);
            Segment {
                start_cm: start,
                end_cm: end,
                start_braced_x: is_braced_at(start, height_cm, restraints, Axis::X),
                end_braced_x: is_braced_at(end, height_cm, restraints, Axis::X),
                start_braced_y: is_braced_at(start, height_cm, restraints, Axis::Y),
                end_braced_y: is_braced_at(end, height_cm, restraints, Axis::Y),
            }
        })
        .collect()
}

/// Effective buckling length of the column on `axis` (cm).
///
/// Without restraints on `axis` this is the full height. Otherwise the
/// unfiltered segmentation is scanned: a segment braced at both ends on
/// `axis` contributes its own length, any other segment the full height, and
/// the largest contribution wins.
pub fn effective_buckling_length(height_cm: f64, restraints: &[Restraint], axis: Axis) -> f64 {
    if !has_restraint_on(restraints, axis) {
        return height_cm;
    }

    divide_into_segments(height_cm, restraints, None)
        .iter()
        .map(|seg| if seg.is_braced(axis) { seg.length() } else { height_cm })
        .fold(0.0, f64::max)
}

// ============================================================================
// Axial Load Diagram
// ============================================================================

/// Non-fatal issue found while preparing the design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DesignWarning {
    /// Restraints at one height declare different axial compressions.
    /// The height is left out of the axial load diagram.
    ConflictingCompression {
        coordinate_cm: f64,
        values_kn: Vec<f64>,
    },
}

impl std::fmt::Display for DesignWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesignWarning::ConflictingCompression { coordinate_cm, values_kn } => write!(
                f,
                "Restraints at {:.1} cm declare different compressions {:?} kN; point skipped",
                coordinate_cm, values_kn
            ),
        }
    }
}

/// Characteristic axial compression at a height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxialLoadPoint {
    pub coordinate_cm: f64,
    pub nk_kn: f64,
}

/// Step diagram of characteristic axial compression along the column.
///
/// The column top carries `Nsk`; every restraint height below the top carries
/// the restraint's declared compression. The force in a segment is the value
/// of the nearest point at or above the segment's upper end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxialLoadDiagram {
    /// Points sorted by ascending height; the last one is the column top
    pub points: Vec<AxialLoadPoint>,
    /// Heights that were skipped
    pub warnings: Vec<DesignWarning>,
}

impl AxialLoadDiagram {
    /// Build the diagram for a column of `height_cm` loaded with `top_nk_kn`.
    pub fn build(height_cm: f64, top_nk_kn: f64, restraints: &[Restraint]) -> Self {
        let mut coordinates: Vec<f64> = restraints
            .iter()
            .map(|r| r.coordinate_cm)
            .filter(|c| c.is_finite() && *c >= 0.0 && *c < height_cm - COORDINATE_TOLERANCE)
            .collect();
        coordinates.sort_by(|a, b| a.total_cmp(b));
        coordinates.dedup_by(|a, b| (*a - *b).abs() <= COORDINATE_TOLERANCE);

        let mut points = Vec::with_capacity(coordinates.len() + 1);
        let mut warnings = Vec::new();

        for coordinate in coordinates {
            let values: Vec<f64> = restraints
                .iter()
                .filter(|r| r.is_at(coordinate))
                .map(|r| r.compression_kn)
                .collect();
            let Some(&first) = values.first() else {
                continue;
            };
            if values.iter().any(|v| (v - first).abs() > COMPRESSION_TOLERANCE) {
                warn!(
                    coordinate_cm = coordinate,
                    ?values,
                    "conflicting restraint compressions, skipping point in axial load diagram"
                );
                warnings.push(DesignWarning::ConflictingCompression {
                    coordinate_cm: coordinate,
                    values_kn: values,
                });
                continue;
            }
            points.push(AxialLoadPoint {
                coordinate_cm: coordinate,
                nk_kn: first,
            });
        }

        points.push(AxialLoadPoint {
            coordinate_cm: height_cm,
            nk_kn: top_nk_kn,
        });

        Self { points, warnings }
    }

    /// Characteristic compression acting in a segment whose upper end is at
    /// `end_cm`.
    pub fn nk_for_segment_top(&self, end_cm: f64) -> f64 {
        self.points
            .iter()
            .find(|p| p.coordinate_cm >= end_cm - COORDINATE_TOLERANCE)
            .or_else(|| self.points.last())
            .map_or(0.0, |p| p.nk_kn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const H: f64 = 340.0;

    #[test]
    fn test_no_restraints_single_segment() {
        let segs = divide_into_segments(H, &[], None);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].start_cm, 0.0);
        assert_eq!(segs[0].end_cm, H);
        assert!(segs[0].is_braced(Axis::X));
        assert!(segs[0].is_braced(Axis::Y));
    }

    #[test]
    fn test_restraint_free_buckling_length_is_height() {
        for axis in Axis::ALL {
            assert_eq!(effective_buckling_length(H, &[], axis), H);
        }
    }

    #[test]
    fn test_mid_height_restraint_on_x_only() {
        let restraints = vec![Restraint::new(Axis::X, H / 2.0)];
        assert_eq!(effective_buckling_length(H, &restraints, Axis::X), H / 2.0);
        assert_eq!(effective_buckling_length(H, &restraints, Axis::Y), H);
    }

    #[test]
    fn test_mixed_axes_falls_back_to_height() {
        // x brace at 170, y brace at 85: segment [0, 85] is not braced in x
        // at its upper end, so x falls back to the full height
        let restraints = vec![Restraint::new(Axis::X, 170.0), Restraint::new(Axis::Y, 85.0)];
        assert_eq!(effective_buckling_length(H, &restraints, Axis::X), H);
        assert_eq!(effective_buckling_length(H, &restraints, Axis::Y), H);
    }

    #[test]
    fn test_segments_partition_height() {
        let restraints = vec![
            Restraint::new(Axis::Y, 250.0),
            Restraint::new(Axis::X, 100.0),
            Restraint::new(Axis::X, 250.0),
            Restraint::new(Axis::X, 400.0), // outside, ignored
        ];
        let segs = divide_into_segments(H, &restraints, None);
        assert_eq!(segs.len(), 3);
        let total: f64 = segs.iter().map(|s| s.length()).sum();
        assert!((total - H).abs() < 1e-9);
        for pair in segs.windows(2) {
            assert_eq!(pair[0].end_cm, pair[1].start_cm);
        }
        assert_eq!(segs[0].start_cm, 0.0);
        assert_eq!(segs[2].end_cm, H);
    }

    #[test]
    fn test_axis_filter() {
        let restraints = vec![Restraint::new(Axis::X, 100.0), Restraint::new(Axis::Y, 200.0)];
        let segs_x = divide_into_segments(H, &restraints, Some(Axis::X));
        assert_eq!(segs_x.len(), 2);
        assert_eq!(segs_x[0].end_cm, 100.0);
        let segs_y = divide_into_segments(H, &restraints, Some(Axis::Y));
        assert_eq!(segs_y.len(), 2);
        assert_eq!(segs_y[0].end_cm, 200.0);
    }

    #[test]
    fn test_bracing_flags() {
        let restraints = vec![Restraint::new(Axis::X, 100.0)];
        let segs = divide_into_segments(H, &restraints, None);
        assert!(segs[0].start_braced_y);
        assert!(!segs[0].end_braced_y);
        assert!(segs[0].is_braced(Axis::X));
        assert!(!segs[0].is_braced(Axis::Y));
    }

    #[test]
    fn test_restraint_at_end_does_not_add_segment() {
        let restraints = vec![Restraint::new(Axis::X, 0.0), Restraint::new(Axis::Y, H)];
        assert_eq!(divide_into_segments(H, &restraints, None).len(), 1);
    }

    #[test]
    fn test_degenerate_height() {
        assert!(divide_into_segments(0.0, &[], None).is_empty());
        assert!(divide_into_segments(f64::NAN, &[], None).is_empty());
    }

    #[test]
    fn test_axial_diagram_steps() {
        let restraints = vec![
            Restraint::new(Axis::X, 100.0).with_compression(700.0),
            Restraint::new(Axis::Y, 200.0).with_compression(600.0),
        ];
        let diagram = AxialLoadDiagram::build(H, 540.0, &restraints);
        assert!(diagram.warnings.is_empty());
        assert_eq!(diagram.points.len(), 3);
        assert_eq!(diagram.nk_for_segment_top(100.0), 700.0);
        assert_eq!(diagram.nk_for_segment_top(200.0), 600.0);
        assert_eq!(diagram.nk_for_segment_top(H), 540.0);
    }

    #[test]
    fn test_conflicting_compression_is_flagged_and_skipped() {
        let restraints = vec![
            Restraint::new(Axis::X, 170.0).with_compression(600.0),
            Restraint::new(Axis::Y, 170.0).with_compression(650.0),
        ];
        let diagram = AxialLoadDiagram::build(H, 540.0, &restraints);
        assert_eq!(diagram.warnings.len(), 1);
        assert_eq!(diagram.points.len(), 1);
        // Skipped point: the segment below reads the next point up (the top)
        assert_eq!(diagram.nk_for_segment_top(170.0), 540.0);
    }

    #[test]
    fn test_matching_compression_is_kept() {
        let restraints = vec![
            Restraint::new(Axis::X, 170.0).with_compression(600.0),
            Restraint::new(Axis::Y, 170.0).with_compression(600.0),
        ];
        let diagram = AxialLoadDiagram::build(H, 540.0, &restraints);
        assert!(diagram.warnings.is_empty());
        assert_eq!(diagram.nk_for_segment_top(170.0), 600.0);
    }

    #[test]
    fn test_restraint_serialization() {
        let r = Restraint::new(Axis::Y, 120.0).with_moments(5.0, -3.0);
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"axis\":\"y\""));
        let roundtrip: Restraint = serde_json::from_str(&json).unwrap();
        assert_eq!(r, roundtrip);
    }
}
