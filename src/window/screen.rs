use objc2::MainThreadMarker;
use objc2_app_kit::NSScreen;

use crate::geometry::DeviceClass;

pub struct ScreenInfo {
    pub frame: (f64, f64, f64, f64), // x, y, width, height
    /// Height of the region obscured at the top of the screen, zero on
    /// notchless panels.
    pub safe_area_top: f64,
    pub device: DeviceClass,
}

impl ScreenInfo {
    pub fn has_notch(&self) -> bool {
        self.safe_area_top > 0.0 && self.device != DeviceClass::Unknown
    }
}

pub fn get_main_screen_info(mtm: MainThreadMarker) -> Option<ScreenInfo> {
    let screen = NSScreen::mainScreen(mtm).or_else(|| NSScreen::screens(mtm).firstObject())?;

    let frame = screen.frame();
    let safe_area_top = screen.safeAreaInsets().top;
    let device = DeviceClass::classify(frame.size.width, frame.size.height);

    log::debug!(
        "Screen {}x{}, safe_area_top={}, device={:?}",
        frame.size.width,
        frame.size.height,
        safe_area_top,
        device
    );

    Some(ScreenInfo {
        frame: (
            frame.origin.x,
            frame.origin.y,
            frame.size.width,
            frame.size.height,
        ),
        safe_area_top,
        device,
    })
}
