//! CoreGraphics drawing for the gradient ribbon.
//!
//! The mask path is replayed into the context with arcs flattened to short
//! chords, then used as a clip for a horizontal linear gradient. Flattening
//! sidesteps CGContextAddArc's direction flip under flipped view coordinates.

use core_graphics::color_space::CGColorSpace;
use core_graphics::context::CGContext;
use core_graphics::geometry::CGPoint;
use core_graphics::gradient::{CGGradient, CGGradientDrawingOptions};

use crate::animation::Color;
use crate::geometry::{arc_point, Path, PathSegment};

/// Chord step for arc flattening, in radians. Sub-pixel at notch radii.
const ARC_STEP: f64 = 0.05;

/// Replays `path` into the context's current path.
pub fn apply_path(ctx: &mut CGContext, path: &Path) {
    for segment in path.segments() {
        match segment {
            PathSegment::MoveTo(p) => ctx.move_to_point(p.x, p.y),
            PathSegment::LineTo(p) => ctx.add_line_to_point(p.x, p.y),
            PathSegment::Arc {
                center,
                radius,
                start_angle,
                end_angle,
                ..
            } => {
                // Signed sweep: the builder always emits end angles on the
                // walked side of the start, so no wrap handling is needed.
                let sweep = end_angle - start_angle;
                let steps = (sweep.abs() / ARC_STEP).ceil().max(1.0) as usize;
                for step in 1..=steps {
                    let angle = start_angle + sweep * step as f64 / steps as f64;
                    let point = arc_point(*center, *radius, angle);
                    ctx.add_line_to_point(point.x, point.y);
                }
            }
            PathSegment::Close => ctx.close_path(),
        }
    }
}

/// Clips to `mask` and fills a horizontal gradient across `width`.
/// `alpha` is premultiplied into the stops so a fading bar needs no separate
/// transparency layer.
pub fn draw_bar(ctx: &mut CGContext, mask: &Path, stops: &[Color], alpha: f64, width: f64) {
    if stops.is_empty() || alpha <= 0.0 {
        return;
    }

    ctx.save();
    apply_path(ctx, mask);
    ctx.clip();

    let mut components = Vec::with_capacity(stops.len() * 4);
    let mut locations = Vec::with_capacity(stops.len());
    let denominator = (stops.len() - 1).max(1) as f64;
    for (index, (r, g, b, a)) in stops.iter().enumerate() {
        components.extend_from_slice(&[*r, *g, *b, a * alpha]);
        locations.push(index as f64 / denominator);
    }

    let color_space = CGColorSpace::create_device_rgb();
    let gradient =
        CGGradient::create_with_color_components(&color_space, &components, &locations, stops.len());

    ctx.draw_linear_gradient(
        &gradient,
        CGPoint::new(0.0, 0.0),
        CGPoint::new(width, 0.0),
        CGGradientDrawingOptions::CGGradientDrawsBeforeStartLocation
            | CGGradientDrawingOptions::CGGradientDrawsAfterEndLocation,
    );

    ctx.restore();
}
