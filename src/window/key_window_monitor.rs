//! AppKit-backed window list and focus-changed signal.
//!
//! Bridges NSNotificationCenter's window-became-key notification into the
//! platform-neutral [`FocusEvents`] seam, and answers [`WindowList`] queries
//! by scanning the application's live window list. Main thread only.

use std::cell::{Cell, RefCell};
use std::ptr::NonNull;
use std::rc::Rc;

use objc2::rc::Retained;
use objc2::runtime::{NSObjectProtocol, ProtocolObject};
use objc2::MainThreadMarker;
use objc2_app_kit::NSApplication;
use objc2_foundation::{NSNotification, NSNotificationCenter, NSString};

use crate::visibility::{FocusEvents, ObserverToken, WindowId, WindowList};

pub struct AppKitWindowList {
    mtm: MainThreadMarker,
}

impl AppKitWindowList {
    pub fn new(mtm: MainThreadMarker) -> Rc<Self> {
        Rc::new(Self { mtm })
    }
}

impl WindowList for AppKitWindowList {
    fn key_window(&self) -> Option<WindowId> {
        // Scan the window list rather than asking for keyWindow directly;
        // the property lags during focus handoff between windows.
        let app = NSApplication::sharedApplication(self.mtm);
        app.windows()
            .iter()
            .find(|window| window.isKeyWindow())
            .map(|window| WindowId(window.windowNumber()))
    }
}

/// Focus signal fed by `NSWindowDidBecomeKeyNotification`.
pub struct NotificationFocusEvents {
    center: Retained<NSNotificationCenter>,
    observers: RefCell<Vec<(u64, Retained<ProtocolObject<dyn NSObjectProtocol>>)>>,
    next_token: Cell<u64>,
}

impl NotificationFocusEvents {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            center: unsafe { NSNotificationCenter::defaultCenter() },
            observers: RefCell::new(Vec::new()),
            next_token: Cell::new(0),
        })
    }
}

impl FocusEvents for NotificationFocusEvents {
    fn add_observer(&self, callback: Rc<dyn Fn()>) -> ObserverToken {
        let name = NSString::from_str("NSWindowDidBecomeKeyNotification");

        let block = block2::RcBlock::new(move |_notification: NonNull<NSNotification>| {
            callback();
        });

        let observer = unsafe {
            self.center
                .addObserverForName_object_queue_usingBlock(Some(&name), None, None, &block)
        };

        let token = self.next_token.get();
        self.next_token.set(token + 1);
        self.observers.borrow_mut().push((token, observer));
        log::debug!("Registered key-window observer {}", token);
        ObserverToken(token)
    }

    fn remove_observer(&self, token: ObserverToken) {
        let mut observers = self.observers.borrow_mut();
        if let Some(position) = observers.iter().position(|(t, _)| *t == token.0) {
            let (_, observer) = observers.remove(position);
            unsafe { self.center.removeObserver(&observer) };
            log::debug!("Removed key-window observer {}", token.0);
        }
    }
}

/// Frame of the window with the given number, in screen coordinates.
/// `None` when the handle no longer names a live window.
pub fn window_frame(mtm: MainThreadMarker, id: WindowId) -> Option<(f64, f64, f64, f64)> {
    let app = NSApplication::sharedApplication(mtm);
    app.windows()
        .iter()
        .find(|window| window.windowNumber() == id.0)
        .map(|window| {
            let frame = window.frame();
            (
                frame.origin.x,
                frame.origin.y,
                frame.size.width,
                frame.size.height,
            )
        })
}
