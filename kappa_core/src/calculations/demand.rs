//! Critical demand points along the column height
//!
//! Each point pairs the design moments about x and y at one height: the two
//! column ends, both sides of every restraint and the mid-height of every
//! segment where M2d acts. A component that has no value of its own at that
//! height is interpolated along the segment's moment diagram.

use serde::{Deserialize, Serialize};

use super::column::{ColumnInput, DesignOutputs, SegmentResult};
use crate::restraints::{restraint_at, Axis, Restraint, COORDINATE_TOLERANCE};

/// Mid-heights closer than this (cm) are the same M2d point.
const CENTRE_MATCH_CM: f64 = 0.1;

/// Where a demand point comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandKind {
    Base,
    Top,
    /// Just above a restraint
    RestraintAbove,
    /// Just below a restraint
    RestraintBelow,
    /// Segment mid-height carrying M2d
    SecondOrder,
}

/// Design moment pair at one height (kN·m).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DemandPoint {
    pub coordinate_cm: f64,
    pub kind: DemandKind,
    pub msd_x: f64,
    pub msd_y: f64,
}

fn segments(design: &DesignOutputs, axis: Axis) -> &[SegmentResult] {
    &design.axis(axis).segments
}

/// Signed M2d of the segment whose mid-height is at `coordinate_cm`.
fn m2d_centred_at(segments: &[SegmentResult], coordinate_cm: f64) -> Option<f64> {
    segments
        .iter()
        .find(|s| (s.centre_cm - coordinate_cm).abs() < CENTRE_MATCH_CM)
        .and_then(SegmentResult::signed_m2d)
}

/// Moment about `axis` at `coordinate_cm`, interpolated within its segment.
///
/// The segment diagram runs through its end moments, its signed M2d at the
/// centre and any restraint moments on the same axis inside it.
fn interpolate_moment(
    coordinate_cm: f64,
    segments: &[SegmentResult],
    restraints: &[Restraint],
    axis: Axis,
    gamma_f: f64,
) -> f64 {
    let Some(seg) = segments
        .iter()
        .find(|s| coordinate_cm >= s.start_cm && coordinate_cm <= s.end_cm)
    else {
        return 0.0;
    };

    let mut points = vec![(seg.start_cm, seg.m_base), (seg.end_cm, seg.m_top)];
    let m2d = seg.signed_m2d();
    if let Some(m) = m2d {
        points.push((seg.centre_cm, m));
    }

    for r in restraints
        .iter()
        .filter(|r| r.axis == axis && r.coordinate_cm > seg.start_cm && r.coordinate_cm < seg.end_cm)
    {
        let moment = if m2d.is_some() {
            if r.coordinate_cm <= seg.centre_cm {
                r.moment_above_knm
            } else {
                r.moment_below_knm
            }
        } else {
            let t = (r.coordinate_cm - seg.start_cm) / seg.length_cm;
            r.moment_below_knm + t * (r.moment_above_knm - r.moment_below_knm)
        };
        points.push((r.coordinate_cm, moment * gamma_f));
    }

    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let (lo, hi) = points
        .windows(2)
        .find(|w| coordinate_cm >= w[0].0 && coordinate_cm <= w[1].0)
        .map(|w| (w[0], w[1]))
        .unwrap_or((points[0], points[points.len() - 1]));

    if lo.0 == hi.0 {
        return lo.1;
    }
    let t = (coordinate_cm - lo.0) / (hi.0 - lo.0);
    lo.1 + t * (hi.1 - lo.1)
}

fn distinct_restraint_heights(restraints: &[Restraint]) -> Vec<f64> {
    let mut heights: Vec<f64> = restraints.iter().map(|r| r.coordinate_cm).collect();
    heights.sort_by(|a, b| a.total_cmp(b));
    heights.dedup_by(|a, b| (*a - *b).abs() <= COORDINATE_TOLERANCE);
    heights
}

/// Moment pairs to check against the section resistance.
///
/// Pairs with a non-finite component are dropped.
pub fn critical_demand_points(input: &ColumnInput, design: &DesignOutputs) -> Vec<DemandPoint> {
    let gamma_f = input.gamma_f;
    let seg_x = segments(design, Axis::X);
    let seg_y = segments(design, Axis::Y);
    let interpolate =
        |coordinate: f64, axis: Axis| interpolate_moment(coordinate, segments(design, axis), &input.restraints, axis, gamma_f);

    let mut points = vec![
        DemandPoint {
            coordinate_cm: 0.0,
            kind: DemandKind::Base,
            msd_x: design.x.msd_base,
            msd_y: design.y.msd_base,
        },
        DemandPoint {
            coordinate_cm: input.h_cm,
            kind: DemandKind::Top,
            msd_x: design.x.msd_top,
            msd_y: design.y.msd_top,
        },
    ];

    for coordinate in distinct_restraint_heights(&input.restraints) {
        let rx = restraint_at(&input.restraints, Axis::X, coordinate);
        let ry = restraint_at(&input.restraints, Axis::Y, coordinate);
        let coincident_x = m2d_centred_at(seg_x, coordinate);
        let coincident_y = m2d_centred_at(seg_y, coordinate);

        for kind in [DemandKind::RestraintAbove, DemandKind::RestraintBelow] {
            let side = |r: &Restraint| match kind {
                DemandKind::RestraintAbove => r.moment_above_knm * gamma_f,
                _ => r.moment_below_knm * gamma_f,
            };
            let msd_x = match (rx, coincident_x) {
                (Some(r), _) => side(r),
                (None, Some(m)) => m,
                (None, None) => interpolate(coordinate, Axis::X),
            };
            let msd_y = match (ry, coincident_y) {
                (Some(r), _) => side(r),
                (None, Some(m)) => m,
                (None, None) => interpolate(coordinate, Axis::Y),
            };
            points.push(DemandPoint {
                coordinate_cm: coordinate,
                kind,
                msd_x,
                msd_y,
            });
        }
    }

    let mut centres: Vec<f64> = seg_x.iter().map(|s| s.centre_cm).collect();
    for s in seg_y {
        if !centres.iter().any(|c| (c - s.centre_cm).abs() < CENTRE_MATCH_CM) {
            centres.push(s.centre_cm);
        }
    }

    for coordinate in centres {
        let msd_x = m2d_centred_at(seg_x, coordinate).unwrap_or_else(|| interpolate(coordinate, Axis::X));
        let msd_y = m2d_centred_at(seg_y, coordinate).unwrap_or_else(|| interpolate(coordinate, Axis::Y));
        points.push(DemandPoint {
            coordinate_cm: coordinate,
            kind: DemandKind::SecondOrder,
            msd_x,
            msd_y,
        });
    }

    points.retain(|p| p.msd_x.is_finite() && p.msd_y.is_finite());
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::column::compute_design;
    use crate::settings::SolverSettings;

    fn column() -> ColumnInput {
        ColumnInput {
            label: String::new(),
            a_cm: 20.0,
            b_cm: 40.0,
            h_cm: 340.0,
            gamma_c: 1.4,
            gamma_s: 1.15,
            gamma_f: 1.4,
            fck_mpa: 30.0,
            fyk_mpa: 500.0,
            nsk_kn: 400.0,
            msk_tx: -20.0,
            msk_bx: 30.0,
            msk_ty: -10.0,
            msk_by: 25.0,
            restraints: vec![],
            bars: vec![],
        }
    }

    #[test]
    fn test_points_without_restraints() {
        let input = column();
        let design = compute_design(&input, None, &SolverSettings::default()).unwrap();
        let points = critical_demand_points(&input, &design);

        // Base, top, one shared mid-height
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].kind, DemandKind::Base);
        assert!((points[0].msd_x - 42.0).abs() < 1e-9);
        assert!((points[1].msd_y + 14.0).abs() < 1e-9);

        let mid = points[2];
        assert_eq!(mid.kind, DemandKind::SecondOrder);
        assert_eq!(mid.coordinate_cm, 170.0);
        assert!((mid.msd_x - design.x.segments[0].m2d.unwrap()).abs() < 1e-9);
        assert!((mid.msd_y - design.y.segments[0].m2d.unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_restraint_points() {
        let mut input = column();
        input
            .restraints
            .push(Restraint::new(Axis::X, 100.0).with_compression(400.0).with_moments(10.0, -5.0));
        let design = compute_design(&input, None, &SolverSettings::default()).unwrap();
        let points = critical_demand_points(&input, &design);

        let above = points.iter().find(|p| p.kind == DemandKind::RestraintAbove).unwrap();
        let below = points.iter().find(|p| p.kind == DemandKind::RestraintBelow).unwrap();
        assert!((above.msd_x - 14.0).abs() < 1e-9);
        assert!((below.msd_x + 7.0).abs() < 1e-9);
        // No y restraint: y moment interpolated, same on both sides
        assert_eq!(above.msd_y, below.msd_y);

        // x mid-heights at 50 and 220, y mid-height at 170
        let centres: Vec<f64> = points
            .iter()
            .filter(|p| p.kind == DemandKind::SecondOrder)
            .map(|p| p.coordinate_cm)
            .collect();
        assert_eq!(centres, vec![50.0, 220.0, 170.0]);
    }

    #[test]
    fn test_interpolation_through_m2d() {
        let input = column();
        let design = compute_design(&input, None, &SolverSettings::default()).unwrap();
        let seg = design.x.segments[0];
        let m2d = seg.signed_m2d().unwrap();

        // Halfway between base and centre
        let m = interpolate_moment(85.0, &design.x.segments, &input.restraints, Axis::X, 1.4);
        assert!((m - (seg.m_base + m2d) / 2.0).abs() < 1e-9);

        // Outside the column
        assert_eq!(interpolate_moment(400.0, &design.x.segments, &input.restraints, Axis::X, 1.4), 0.0);
    }

    #[test]
    fn test_interpolation_with_inner_restraint() {
        let seg = SegmentResult {
            start_cm: 0.0,
            end_cm: 100.0,
            length_cm: 100.0,
            centre_cm: 50.0,
            nk_top_kn: 0.0,
            nsd_kn: 0.0,
            m_base: 10.0,
            m_top: 20.0,
            lambda: 0.0,
            kappa: crate::calculations::kappa::KappaResult {
                kappa: f64::NAN,
                m2d: f64::NAN,
                iterations: 0,
                converged: false,
            },
            m2d: None,
        };
        let restraints = vec![Restraint::new(Axis::X, 25.0).with_moments(4.0, 0.0)];
        // Restraint moment: 0 + 0.25 · (4 − 0) = 1
        let m = interpolate_moment(25.0, &[seg], &restraints, Axis::X, 1.0);
        assert!((m - 1.0).abs() < 1e-12);
        let m = interpolate_moment(12.5, &[seg], &restraints, Axis::X, 1.0);
        assert!((m - 5.5).abs() < 1e-12);
    }
}
