use objc2::rc::Retained;
use objc2::{define_class, msg_send, MainThreadMarker, MainThreadOnly};
use objc2_app_kit::{
    NSBackingStoreType, NSColor, NSWindow, NSWindowCollectionBehavior, NSWindowStyleMask,
};
use objc2_foundation::{NSPoint, NSRect, NSSize, NSString};

/// One above NSStatusWindowLevel, so the bar stays over normal windows and
/// the menu bar region where the notch lives.
const OVERLAY_WINDOW_LEVEL: isize = 26;

// Custom NSWindow subclass that never takes focus; the overlay must be
// invisible to the key-window machinery it reacts to.
define_class!(
    #[unsafe(super(NSWindow))]
    #[thread_kind = MainThreadOnly]
    #[name = "GlimmerOverlayWindow"]
    struct GlimmerOverlayWindow;

    impl GlimmerOverlayWindow {
        #[unsafe(method(canBecomeKeyWindow))]
        fn can_become_key_window(&self) -> bool {
            false
        }

        #[unsafe(method(canBecomeMainWindow))]
        fn can_become_main_window(&self) -> bool {
            false
        }
    }
);

impl GlimmerOverlayWindow {
    fn new(mtm: MainThreadMarker, frame: NSRect, style: NSWindowStyleMask) -> Retained<Self> {
        unsafe {
            msg_send![
                Self::alloc(mtm),
                initWithContentRect: frame,
                styleMask: style,
                backing: NSBackingStoreType::Buffered,
                defer: false
            ]
        }
    }
}

/// Borderless, transparent, click-through window hosting the gradient view.
pub struct BarWindow {
    pub window: Retained<NSWindow>,
}

impl BarWindow {
    pub fn new(mtm: MainThreadMarker, frame: (f64, f64, f64, f64)) -> Self {
        let (x, y, width, height) = frame;
        log::debug!(
            "Creating overlay window at ({}, {}) size {}x{}",
            x,
            y,
            width,
            height
        );

        let rect = NSRect::new(NSPoint::new(x, y), NSSize::new(width, height));
        let style = NSWindowStyleMask::Borderless;
        let custom_window = GlimmerOverlayWindow::new(mtm, rect, style);
        let window: Retained<NSWindow> = unsafe { Retained::cast_unchecked(custom_window) };

        window.setLevel(OVERLAY_WINDOW_LEVEL);

        // Stay put across spaces and out of the window cycle.
        window.setCollectionBehavior(
            NSWindowCollectionBehavior::CanJoinAllSpaces
                | NSWindowCollectionBehavior::Stationary
                | NSWindowCollectionBehavior::IgnoresCycle,
        );

        // Transparent; the view draws the gradient itself.
        window.setOpaque(false);
        window.setHasShadow(false);
        let clear_color = NSColor::clearColor();
        window.setBackgroundColor(Some(&clear_color));

        window.setExcludedFromWindowsMenu(true);

        // The overlay is purely visual.
        window.setIgnoresMouseEvents(true);

        let title = NSString::from_str("Glimmer Overlay");
        window.setTitle(&title);

        Self { window }
    }

    pub fn show(&self) {
        self.window.orderFrontRegardless();
    }

    pub fn hide(&self) {
        self.window.orderOut(None);
    }

    pub fn set_frame(&self, frame: (f64, f64, f64, f64)) {
        let (x, y, width, height) = frame;
        let rect = NSRect::new(NSPoint::new(x, y), NSSize::new(width, height));
        self.window.setFrame_display(rect, true);
    }

    pub fn set_content_view(&self, view: &objc2_app_kit::NSView) {
        self.window.setContentView(Some(view));
    }

    pub fn set_needs_display(&self) {
        if let Some(view) = self.window.contentView() {
            view.setNeedsDisplay(true);
        }
    }
}
