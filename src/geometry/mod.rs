pub mod device;
pub mod notch_path;

pub use device::{DeviceClass, NotchGeometry};
pub use notch_path::{
    arc_point, bar_path, notch_path, Path, PathSegment, Point, SMALL_CIRCLE_RADIUS,
};
