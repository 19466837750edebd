//! Closed line/arc silhouette for routing the bar around the notch.
//!
//! Coordinates are y-down with the origin at the screen's top-left corner,
//! so positive angles sweep clockwise on screen. The builder walks the top
//! contour left to right, drops down by the bar height, and walks the
//! mirrored contour back to close a thin ribbon that dips under the notch.

use std::f64::consts::{FRAC_PI_2, PI};

use super::device::NotchGeometry;

/// Radius of the fillets where the top edge turns into the notch walls.
/// Shared by every device class.
pub const SMALL_CIRCLE_RADIUS: f64 = 6.0;

/// Ratio applied to the small-corner radius on the mirrored bottom contour.
/// The full radius reads as too round next to the thin ribbon.
const BOTTOM_CORNER_RATIO: f64 = 2.0 / 3.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    MoveTo(Point),
    LineTo(Point),
    Arc {
        center: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        /// Sweep direction; `true` walks toward increasing angles.
        clockwise: bool,
    },
    Close,
}

/// Ordered segment list describing one closed outline. Recomputed per layout
/// pass, never cached.
#[derive(Debug, Clone, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.segments.push(PathSegment::MoveTo(Point::new(x, y)));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.segments.push(PathSegment::LineTo(Point::new(x, y)));
    }

    fn arc(
        &mut self,
        center_x: f64,
        center_y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        clockwise: bool,
    ) {
        self.segments.push(PathSegment::Arc {
            center: Point::new(center_x, center_y),
            radius,
            start_angle,
            end_angle,
            clockwise,
        });
    }

    fn close(&mut self) {
        self.segments.push(PathSegment::Close);
    }

    /// Applies a translation to every segment. The per-device calibration
    /// transforms are translation-only.
    pub fn translate(&mut self, tx: f64, ty: f64) {
        for segment in &mut self.segments {
            match segment {
                PathSegment::MoveTo(p) | PathSegment::LineTo(p) => {
                    p.x += tx;
                    p.y += ty;
                }
                PathSegment::Arc { center, .. } => {
                    center.x += tx;
                    center.y += ty;
                }
                PathSegment::Close => {}
            }
        }
    }

    /// Resolved endpoint sequence: one point per segment, with arc endpoints
    /// computed analytically and `Close` resolving to the subpath start.
    pub fn points(&self) -> Vec<Point> {
        let mut points = Vec::with_capacity(self.segments.len());
        let mut subpath_start = Point::new(0.0, 0.0);

        for segment in &self.segments {
            let point = match segment {
                PathSegment::MoveTo(p) => {
                    subpath_start = *p;
                    *p
                }
                PathSegment::LineTo(p) => *p,
                PathSegment::Arc {
                    center,
                    radius,
                    end_angle,
                    ..
                } => arc_point(*center, *radius, *end_angle),
                PathSegment::Close => subpath_start,
            };
            points.push(point);
        }

        points
    }
}

/// Point on a circle at `angle` radians, y-down convention.
pub fn arc_point(center: Point, radius: f64, angle: f64) -> Point {
    Point::new(
        center.x + radius * angle.cos(),
        center.y + radius * angle.sin(),
    )
}

/// Plain rectangular ribbon used when no notch geometry applies.
pub fn bar_path(screen_width: f64, bar_height: f64) -> Path {
    let mut path = Path::new();
    path.move_to(0.0, 0.0);
    path.line_to(screen_width, 0.0);
    path.line_to(screen_width, bar_height);
    path.line_to(0.0, bar_height);
    path.close();
    path
}

/// Builds the closed ribbon outline wrapping the notch.
///
/// The notch cutout is centered on `screen_width`: its walls sit at
/// `(screen_width - notch_width) / 2` and `(screen_width + notch_width) / 2`.
/// The configured translation transform is applied to the assembled path as
/// the final step.
pub fn notch_path(screen_width: f64, geometry: &NotchGeometry, bar_height: f64) -> Path {
    let left = (screen_width - geometry.notch_width) / 2.0;
    let right = (screen_width + geometry.notch_width) / 2.0;
    let small = geometry.small_circle_radius;
    let small_bottom = small * BOTTOM_CORNER_RATIO;
    let large = geometry.large_circle_radius;
    let offset_x = geometry.large_circle_offset.x;
    let offset_y = geometry.large_circle_offset.y;
    let height = bar_height;

    let mut path = Path::new();

    // Top contour, left to right: fillet into the left wall, around the left
    // shoulder, across the notch bottom, and back up to the top edge.
    path.move_to(0.0, 0.0);
    path.line_to(left - small, 0.0);
    path.arc(left - small, small, small, -FRAC_PI_2, 0.0, true);
    path.line_to(left, offset_y);
    path.arc(left + large + offset_x, offset_y, large, PI, FRAC_PI_2, false);
    path.line_to(right - large - offset_x, offset_y + large);
    path.arc(right - large - offset_x, offset_y, large, FRAC_PI_2, 0.0, false);
    path.line_to(right, small);
    path.arc(right + small, small, small, PI, PI + FRAC_PI_2, true);
    path.line_to(screen_width, 0.0);

    // Down the right edge, then the mirrored contour right to left, offset by
    // the bar height. Corner fillets here use the reduced radius.
    path.line_to(screen_width, height);
    path.line_to(right + small_bottom, height);
    path.arc(
        right + small_bottom,
        height + small_bottom,
        small_bottom,
        PI + FRAC_PI_2,
        PI,
        false,
    );
    path.line_to(right, height + offset_y);
    path.arc(
        right - large - offset_x,
        height + offset_y,
        large,
        0.0,
        FRAC_PI_2,
        true,
    );
    path.line_to(left + large + offset_x, height + offset_y + large);
    path.arc(
        left + large + offset_x,
        height + offset_y,
        large,
        FRAC_PI_2,
        PI,
        true,
    );
    path.line_to(left, height + small_bottom);
    path.arc(
        left - small_bottom,
        height + small_bottom,
        small_bottom,
        0.0,
        -FRAC_PI_2,
        false,
    );
    path.line_to(0.0, height);
    path.close();

    let (tx, ty) = geometry.transform;
    path.translate(tx, ty);
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DeviceClass;

    const EPSILON: f64 = 1e-9;

    fn plain_geometry(notch_width: f64) -> NotchGeometry {
        NotchGeometry {
            notch_width,
            small_circle_radius: SMALL_CIRCLE_RADIUS,
            large_circle_radius: 21.0,
            large_circle_offset: Point::new(0.0, 11.0),
            transform: (0.0, 0.0),
        }
    }

    fn all_geometries() -> Vec<NotchGeometry> {
        [
            DeviceClass::MacBookPro14,
            DeviceClass::MacBookPro16,
            DeviceClass::MacBookAir13,
            DeviceClass::MacBookAir15,
        ]
        .iter()
        .map(|class| class.notch_geometry().unwrap())
        .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn path_is_closed_for_every_configuration() {
        for geometry in all_geometries() {
            let path = notch_path(1512.0, &geometry, 3.0);
            let points = path.points();

            let first = points.first().unwrap();
            let last = points.last().unwrap();
            assert!(approx(first.x, last.x) && approx(first.y, last.y));
            assert!(matches!(path.segments().last(), Some(PathSegment::Close)));
        }
    }

    #[test]
    fn segments_are_continuous() {
        // Each arc must start where the previous segment ended.
        for geometry in all_geometries() {
            let path = notch_path(1512.0, &geometry, 3.0);
            let points = path.points();

            for (index, segment) in path.segments().iter().enumerate() {
                if let PathSegment::Arc {
                    center,
                    radius,
                    start_angle,
                    ..
                } = segment
                {
                    let start = arc_point(*center, *radius, *start_angle);
                    let previous = points[index - 1];
                    let gap = ((start.x - previous.x).powi(2) + (start.y - previous.y).powi(2))
                        .sqrt();
                    // The horizontal shoulder offset is a sub-point visual
                    // calibration; anything larger is a construction bug.
                    assert!(
                        gap <= geometry.large_circle_offset.x.abs() + EPSILON,
                        "segment {index} starts {gap} away from the previous endpoint"
                    );
                }
            }
        }
    }

    #[test]
    fn notch_boundaries_sit_at_half_width_offsets() {
        for (width, notch) in [(375.0, 208.0), (1512.0, 184.0), (1728.0, 196.0)] {
            let geometry = plain_geometry(notch);
            let path = notch_path(width, &geometry, 3.0);
            let points = path.points();

            let left_expected = (width - notch) / 2.0;
            let right_expected = (width + notch) / 2.0;

            // Endpoint of the first fillet is the top of the left wall; the
            // line after the right shoulder lands on the top of the right wall.
            assert!(points
                .iter()
                .any(|p| approx(p.x, left_expected) && approx(p.y, SMALL_CIRCLE_RADIUS)));
            assert!(points
                .iter()
                .any(|p| approx(p.x, right_expected) && approx(p.y, SMALL_CIRCLE_RADIUS)));
        }
    }

    #[test]
    fn iphone_x_class_example_boundaries() {
        let geometry = plain_geometry(208.0);
        let path = notch_path(375.0, &geometry, 3.0);
        let points = path.points();

        assert!(points.iter().any(|p| approx(p.x, 83.5)));
        assert!(points.iter().any(|p| approx(p.x, 291.5)));
    }

    #[test]
    fn top_contour_is_symmetric_about_half_width_before_transform() {
        let width = 1512.0;
        for mut geometry in all_geometries() {
            geometry.transform = (0.0, 0.0);
            let path = notch_path(width, &geometry, 3.0);
            let points = path.points();

            // Top contour: everything up to and including the line that
            // reaches the right screen edge at y = 0.
            let top_end = points
                .iter()
                .position(|p| approx(p.x, width) && approx(p.y, 0.0))
                .unwrap();
            let top = &points[..=top_end];

            for point in top {
                let mirrored_x = width - point.x;
                assert!(
                    top.iter()
                        .any(|q| approx(q.x, mirrored_x) && approx(q.y, point.y)),
                    "no mirror for ({}, {})",
                    point.x,
                    point.y
                );
            }
        }
    }

    #[test]
    fn bottom_corner_radius_is_two_thirds_of_small_radius() {
        for geometry in all_geometries() {
            let path = notch_path(1512.0, &geometry, 3.0);

            let radii: Vec<f64> = path
                .segments()
                .iter()
                .filter_map(|segment| match segment {
                    PathSegment::Arc { radius, .. } => Some(*radius),
                    _ => None,
                })
                .collect();

            // Eight arcs: two top fillets, four shoulders, two bottom fillets.
            assert_eq!(radii.len(), 8);
            let expected = geometry.small_circle_radius * 2.0 / 3.0;
            let bottom_fillets = radii.iter().filter(|r| approx(**r, expected)).count();
            assert_eq!(bottom_fillets, 2);
        }
    }

    #[test]
    fn transform_translates_the_whole_path() {
        let mut geometry = plain_geometry(200.0);
        geometry.transform = (1.5, -0.25);
        let shifted = notch_path(1512.0, &geometry, 3.0);

        geometry.transform = (0.0, 0.0);
        let base = notch_path(1512.0, &geometry, 3.0);

        for (a, b) in base.points().iter().zip(shifted.points().iter()) {
            assert!(approx(a.x + 1.5, b.x));
            assert!(approx(a.y - 0.25, b.y));
        }
    }

    #[test]
    fn bar_path_is_a_closed_rectangle() {
        let path = bar_path(375.0, 3.0);
        let points = path.points();
        assert_eq!(points.len(), 5);
        assert_eq!(points[0], points[4]);
        assert_eq!(points[2], Point::new(375.0, 3.0));
    }

    #[test]
    fn ribbon_dips_below_the_notch() {
        let geometry = plain_geometry(200.0);
        let bar_height = 3.0;
        let path = notch_path(1512.0, &geometry, bar_height);

        let depth = geometry.depth();
        let lowest = path
            .points()
            .iter()
            .map(|p| p.y)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!(approx(lowest, depth + bar_height));
    }
}
