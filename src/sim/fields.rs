//! The preset wall/sink patterns written on a clear frame.
//!
//! A preset is a union of line segments in uv space, each carrying the kind
//! it paints. A cell within the thickness threshold of the nearest segment
//! takes that segment's kind; everything else becomes air, so a clear is a
//! full-grid reset that leaves no sand behind.

use crate::sim::cell::{Cell, CellKind, Luminance};
use crate::util::vectors::XyVector;

/// Wall thickness in cells; divided by the grid width to get the uv-space
/// distance threshold, so patterns keep the same pixel weight at any size
const SEGMENT_THICKNESS_CELLS: f32 = 1.5;

/// One straight stroke of a preset pattern
struct Segment {
    a: (f32, f32),
    b: (f32, f32),
    kind: CellKind,
}

/// Two diagonal barriers narrowing toward a gap at the bottom center, with a
/// vertical sink strip near each of the left and right edges to swallow the
/// sand that misses the gap
const FUNNEL: &[Segment] = &[
    Segment {
        a: (0.05, 0.70),
        b: (0.42, 0.35),
        kind: CellKind::Wall,
    },
    Segment {
        a: (0.95, 0.70),
        b: (0.58, 0.35),
        kind: CellKind::Wall,
    },
    Segment {
        a: (0.06, 0.05),
        b: (0.06, 0.45),
        kind: CellKind::Sink,
    },
    Segment {
        a: (0.94, 0.05),
        b: (0.94, 0.45),
        kind: CellKind::Sink,
    },
];

/// A closed-bottom triangular bucket: two walls meeting at a low vertex
const BUCKET: &[Segment] = &[
    Segment {
        a: (0.25, 0.75),
        b: (0.50, 0.20),
        kind: CellKind::Wall,
    },
    Segment {
        a: (0.75, 0.75),
        b: (0.50, 0.20),
        kind: CellKind::Wall,
    },
];

/// Nothing at all; clearing with this preset empties the whole grid
const OPEN: &[Segment] = &[];

const PRESETS: &[&[Segment]] = &[FUNNEL, BUCKET, OPEN];

/// How many distinct presets exist; any `field_index` wraps modulo this
pub const FIELD_PRESET_COUNT: usize = PRESETS.len();

/// The cell the selected preset paints at this coordinate.
/// Luminance falls off with distance from the segment spine, purely for the
/// visual profile of the stroke.
pub fn preset_cell(pos: XyVector, width: usize, height: usize, field_index: usize) -> Cell {
    let (u, v) = pos.to_uv(width, height);
    let threshold = SEGMENT_THICKNESS_CELLS / width as f32;

    let mut nearest: Option<(f32, CellKind)> = None;
    for segment in PRESETS[field_index % FIELD_PRESET_COUNT] {
        let distance = distance_to_segment(u, v, segment);
        if distance <= threshold && nearest.map_or(true, |(best, _)| distance < best) {
            nearest = Some((distance, segment.kind));
        }
    }

    match nearest {
        Some((distance, kind)) => {
            let luminance = Luminance(1.0 - distance / threshold);
            match kind {
                CellKind::Sink => Cell::sink(luminance),
                _ => Cell::wall(luminance),
            }
        }
        None => Cell::air(),
    }
}

/// Distance from a point to the closest point of a segment in uv space
fn distance_to_segment(px: f32, py: f32, segment: &Segment) -> f32 {
    let (ax, ay) = segment.a;
    let (bx, by) = segment.b;
    let (abx, aby) = (bx - ax, by - ay);
    let length_squared = abx * abx + aby * aby;
    let t = if length_squared == 0.0 {
        0.0
    } else {
        (((px - ax) * abx + (py - ay) * aby) / length_squared).clamp(0.0, 1.0)
    };
    let (cx, cy) = (ax + t * abx, ay + t * aby);
    ((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::iproduct;

    fn kind_counts(width: usize, height: usize, field_index: usize) -> (usize, usize, usize, usize) {
        let mut counts = (0, 0, 0, 0);
        for (x, y) in iproduct!(0..width, 0..height) {
            match preset_cell(XyVector::new(x, y), width, height, field_index).kind {
                CellKind::Air => counts.0 += 1,
                CellKind::Sand => counts.1 += 1,
                CellKind::Wall => counts.2 += 1,
                CellKind::Sink => counts.3 += 1,
            }
        }
        counts
    }

    #[test]
    fn test_no_preset_ever_paints_sand() {
        for field_index in 0..FIELD_PRESET_COUNT {
            let (_, sand, _, _) = kind_counts(64, 64, field_index);
            assert_eq!(sand, 0, "preset {} painted sand", field_index);
        }
    }

    #[test]
    fn test_funnel_has_walls_and_sinks() {
        let (air, _, walls, sinks) = kind_counts(64, 64, 0);
        assert!(walls > 0);
        assert!(sinks > 0);
        assert!(air > walls + sinks, "the pattern should be mostly open");
    }

    #[test]
    fn test_bucket_is_closed_at_the_vertex() {
        // The two arms meet at uv (0.5, 0.2); the nearest cell must be wall
        let cell = preset_cell(XyVector::new(32, 13), 64, 64, 1);
        assert_eq!(cell.kind, CellKind::Wall);
        // And the bucket has no sinks anywhere
        let (_, _, walls, sinks) = kind_counts(64, 64, 1);
        assert!(walls > 0);
        assert_eq!(sinks, 0);
    }

    #[test]
    fn test_open_preset_is_all_air() {
        let (air, _, _, _) = kind_counts(32, 32, 2);
        assert_eq!(air, 32 * 32);
    }

    #[test]
    fn test_field_index_wraps() {
        for (x, y) in iproduct!(0..16, 0..16) {
            let pos = XyVector::new(x, y);
            assert_eq!(
                preset_cell(pos, 16, 16, 0),
                preset_cell(pos, 16, 16, FIELD_PRESET_COUNT)
            );
        }
    }

    #[test]
    fn test_cell_far_from_all_segments_is_air() {
        // uv (0.5, 0.59) sits in the bucket's open mouth
        let cell = preset_cell(XyVector::new(32, 38), 64, 64, 1);
        assert_eq!(cell.kind, CellKind::Air);
    }
}
