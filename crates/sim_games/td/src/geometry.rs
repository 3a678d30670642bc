//! Planar geometry shared by every entity: positions, cell snapping, bounds
//! and the overlap predicates used for collisions and tower footprints.

use glam::Vec2;

/// Playfield position in pixels.
pub type Position = Vec2;

/// Integer cell coordinate of the placement grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellCoord {
    pub col: i32,
    pub row: i32,
}

/// Cell containing `point`, using `floor(coord / cell)` per axis.
pub fn cell_of(point: Position, cell_size: f32) -> CellCoord {
    CellCoord {
        col: (point.x / cell_size).floor() as i32,
        row: (point.y / cell_size).floor() as i32,
    }
}

/// Centre of a cell.
pub fn cell_center(cell: CellCoord, cell_size: f32) -> Position {
    let half = cell_size / 2.0;
    Vec2::new(
        cell.col as f32 * cell_size + half,
        cell.row as f32 * cell_size + half,
    )
}

/// Snap an arbitrary point to the centre of the cell containing it.
pub fn snap_to_cell(point: Position, cell_size: f32) -> Position {
    cell_center(cell_of(point, cell_size), cell_size)
}

/// Closed rectangle `[min, max]` describing the playfield.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Position,
    pub max: Position,
}

impl Bounds {
    pub fn from_size(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    pub fn contains(&self, point: Position) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

/// Axis-aligned box, half-open on its far edges so that adjacent boxes never
/// both contain a shared edge point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub center: Position,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn square(center: Position, side: f32) -> Self {
        Self {
            center,
            half_extents: Vec2::splat(side / 2.0),
        }
    }

    pub fn contains(&self, point: Position) -> bool {
        let min = self.center - self.half_extents;
        let max = self.center + self.half_extents;
        point.x >= min.x && point.x < max.x && point.y >= min.y && point.y < max.y
    }
}

/// True when two circles touch or overlap.
pub fn circles_overlap(a: Position, radius_a: f32, b: Position, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) <= reach * reach
}

/// Heading from `from` towards `to`, in radians.
pub fn heading_towards(from: Position, to: Position) -> f32 {
    let delta = to - from;
    delta.y.atan2(delta.x)
}

/// Shortest distance from `point` to the segment `a`-`b`.
pub fn distance_to_segment(point: Position, a: Position, b: Position) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

/// Shortest distance from `point` to a polyline.
pub fn distance_to_polyline(point: Position, vertices: &[Position]) -> f32 {
    match vertices {
        [] => f32::INFINITY,
        [only] => point.distance(*only),
        _ => vertices
            .windows(2)
            .map(|leg| distance_to_segment(point, leg[0], leg[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapping_uses_floor_then_half_cell() {
        assert_eq!(snap_to_cell(Vec2::new(100.0, 250.0), 64.0), Vec2::new(96.0, 224.0));
        assert_eq!(snap_to_cell(Vec2::new(64.0, 63.9), 64.0), Vec2::new(96.0, 32.0));
        assert_eq!(snap_to_cell(Vec2::new(-1.0, 0.0), 64.0), Vec2::new(-32.0, 32.0));
    }

    #[test]
    fn snapping_is_idempotent() {
        let once = snap_to_cell(Vec2::new(517.3, 401.9), 64.0);
        assert_eq!(snap_to_cell(once, 64.0), once);
    }

    #[test]
    fn bounds_are_inclusive() {
        let bounds = Bounds::from_size(1200.0, 800.0);
        assert!(bounds.contains(Vec2::new(0.0, 0.0)));
        assert!(bounds.contains(Vec2::new(1200.0, 800.0)));
        assert!(!bounds.contains(Vec2::new(1200.1, 10.0)));
        assert!(!bounds.contains(Vec2::new(10.0, -0.1)));
    }

    #[test]
    fn aabb_is_half_open() {
        let footprint = Aabb::square(Vec2::new(96.0, 96.0), 64.0);
        assert!(footprint.contains(Vec2::new(64.0, 64.0)));
        assert!(footprint.contains(Vec2::new(96.0, 96.0)));
        assert!(!footprint.contains(Vec2::new(128.0, 96.0)));
        assert!(!footprint.contains(Vec2::new(160.0, 96.0)));
    }

    #[test]
    fn circle_overlap_includes_touching() {
        let a = Vec2::new(0.0, 0.0);
        assert!(circles_overlap(a, 4.0, Vec2::new(10.0, 0.0), 6.0));
        assert!(!circles_overlap(a, 4.0, Vec2::new(10.1, 0.0), 6.0));
    }

    #[test]
    fn heading_points_along_delta() {
        let heading = heading_towards(Vec2::ZERO, Vec2::new(0.0, 5.0));
        assert!((heading - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(distance_to_segment(Vec2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(distance_to_segment(Vec2::new(13.0, 4.0), a, b), 5.0);
        assert_eq!(distance_to_segment(Vec2::new(2.0, 0.0), a, a), 2.0);
    }

    #[test]
    fn polyline_distance_takes_nearest_leg() {
        let path = [Vec2::new(0.0, 0.0), Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0)];
        assert_eq!(distance_to_polyline(Vec2::new(12.0, 6.0), &path), 2.0);
        assert_eq!(distance_to_polyline(Vec2::new(1.0, 1.0), &[]), f32::INFINITY);
    }
}
