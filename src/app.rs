use std::cell::Cell;
use std::rc::Rc;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use objc2::rc::Retained;
use objc2::{msg_send, MainThreadMarker};
use objc2_app_kit::{
    NSApplication, NSApplicationActivationPolicy, NSBackingStoreType, NSEventMask, NSWindow,
    NSWindowStyleMask,
};
use objc2_foundation::{NSDate, NSDefaultRunLoopMode, NSPoint, NSRect, NSSize, NSString};

use crate::animation::{Fade, GradientCycle};
use crate::config::{load_config, Config, ConfigWatcher, SharedConfig};
use crate::geometry::NotchGeometry;
use crate::ipc::{self, BarCommand};
use crate::observable::Subscription;
use crate::view::{set_view_state, GradientBarView, ViewState};
use crate::visibility::{KeyWindowTracker, WindowId};
use crate::window::{
    get_main_screen_info, window_frame, AppKitWindowList, BarWindow, NotificationFocusEvents,
    ScreenInfo,
};

/// Gradient stop count across the bar. More stops, smoother slide.
const GRADIENT_STOPS: usize = 12;

pub struct App {
    _app: Retained<NSApplication>,
    config: SharedConfig,
    config_watcher: Option<ConfigWatcher>,
    // Demo window so the overlay has a key window to follow.
    _host_window: Retained<NSWindow>,
    overlay: BarWindow,
    view: Retained<GradientBarView>,
    _tracker: Rc<KeyWindowTracker>,
    /// Latest emission from the tracker's slot; `None` means detach.
    target: Rc<Cell<Option<WindowId>>>,
    _slot_subscription: Subscription<Option<WindowId>>,
    fade: Fade,
    cycle: GradientCycle,
}

impl App {
    pub fn new(mtm: MainThreadMarker) -> Self {
        let app = NSApplication::sharedApplication(mtm);
        app.setActivationPolicy(NSApplicationActivationPolicy::Regular);

        let config: SharedConfig = Arc::new(RwLock::new(load_config()));

        let config_watcher = match ConfigWatcher::new(config.clone()) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                log::error!("Failed to set up config watcher: {}", e);
                None
            }
        };

        let host_window = create_host_window(mtm);
        unsafe {
            let _: () = msg_send![&app, activateIgnoringOtherApps: true];
        }

        // Overlay starts degenerate; every tick lays it out over the target.
        let overlay = BarWindow::new(mtm, (0.0, 0.0, 1.0, 1.0));
        let view = GradientBarView::new(mtm);
        overlay.set_content_view(&view);

        let tracker = KeyWindowTracker::new(
            AppKitWindowList::new(mtm),
            NotificationFocusEvents::new(),
        );

        // The slot republishes on every focus event, deduplicated nowhere;
        // the cell just keeps the latest value for the layout pass.
        let target = Rc::new(Cell::new(tracker.current()));
        let target_clone = target.clone();
        let slot_subscription = tracker.subscribe(move |value| {
            target_clone.set(*value);
        });

        let (shown_on_launch, cycle_duration) = config
            .read()
            .map(|c| (c.bar.shown_on_launch, c.bar.cycle_duration))
            .unwrap_or((false, 3.33));

        let fade = if shown_on_launch {
            Fade::shown()
        } else {
            Fade::hidden()
        };
        ipc::set_visible_flag(fade.is_visible_target());

        Self {
            _app: app,
            config,
            config_watcher,
            _host_window: host_window,
            overlay,
            view,
            _tracker: tracker,
            target,
            _slot_subscription: slot_subscription,
            fade,
            cycle: GradientCycle::new(Duration::from_secs_f64(cycle_duration)),
        }
    }

    pub fn run(mut self, mtm: MainThreadMarker) {
        let app = NSApplication::sharedApplication(mtm);
        let commands = ipc::subscribe_commands();
        let mut last_tick = Instant::now();

        loop {
            // Process events with a timeout; this is also the animation tick.
            let date = NSDate::dateWithTimeIntervalSinceNow(0.05);
            while let Some(event) = unsafe {
                app.nextEventMatchingMask_untilDate_inMode_dequeue(
                    NSEventMask::Any,
                    Some(&date),
                    NSDefaultRunLoopMode,
                    true,
                )
            } {
                app.sendEvent(&event);
                app.updateWindows();
            }

            while let Ok(command) = commands.try_recv() {
                log::debug!("IPC command: {:?}", command);
                match command {
                    BarCommand::Show => self.fade.set_visible(true),
                    BarCommand::Hide => self.fade.set_visible(false),
                    BarCommand::Toggle => {
                        let visible = self.fade.is_visible_target();
                        self.fade.set_visible(!visible);
                    }
                    BarCommand::Reload => {
                        let new_config = load_config();
                        if let Ok(mut current) = self.config.write() {
                            *current = new_config;
                        }
                    }
                }
                ipc::set_visible_flag(self.fade.is_visible_target());
            }

            if let Some(watcher) = &self.config_watcher {
                if watcher.check_and_reload() {
                    log::info!("Config reloaded");
                }
            }

            let config = self
                .config
                .read()
                .map(|c| c.clone())
                .unwrap_or_default();

            let now = Instant::now();
            let dt = now.duration_since(last_tick);
            last_tick = now;

            self.cycle
                .set_cycle(Duration::from_secs_f64(config.bar.cycle_duration.max(0.01)));
            self.cycle.advance(dt);
            self.fade.advance(
                dt,
                Duration::from_secs_f64(config.bar.fade_in_duration.max(0.0)),
                Duration::from_secs_f64(config.bar.fade_out_duration.max(0.0)),
            );

            self.layout_overlay(mtm, &config);
        }
    }

    /// Positions the overlay over the tracked window and pushes render state.
    /// Detaches when there is no valid target or the fade has finished.
    fn layout_overlay(&self, mtm: MainThreadMarker, config: &Config) {
        if self.fade.is_hidden() {
            self.overlay.hide();
            return;
        }

        let Some(target) = self.target.get() else {
            self.overlay.hide();
            return;
        };

        // The slot hands out ids, not windows; re-check the handle against
        // the live window list before trusting it.
        let Some(frame) = window_frame(mtm, target) else {
            log::debug!("Target window {:?} is gone, detaching", target);
            self.overlay.hide();
            return;
        };

        let screen = get_main_screen_info(mtm);
        let geometry = screen
            .as_ref()
            .and_then(|screen| masked_geometry(config, screen, frame));

        let bar_height = config.bar.height;
        let content_height = match &geometry {
            Some(geometry) => (geometry.depth() + bar_height).ceil(),
            None => bar_height.ceil(),
        };

        let (x, y, width, height) = frame;
        self.overlay
            .set_frame((x, y + height - content_height, width, content_height));

        set_view_state(
            self.view.view_id(),
            ViewState {
                stops: self.cycle.stops(&config.bar.palette(), GRADIENT_STOPS),
                alpha: self.fade.alpha(),
                bar_height,
                geometry,
            },
        );

        self.overlay.show();
        self.overlay.set_needs_display();
    }
}

/// Notch geometry for the masked bar, or `None` when the plain rectangle
/// applies: notch avoidance disabled, no notch on this screen, or the target
/// window does not cover the notch region.
fn masked_geometry(
    config: &Config,
    screen: &ScreenInfo,
    frame: (f64, f64, f64, f64),
) -> Option<NotchGeometry> {
    if !config.notch.avoid || !screen.has_notch() {
        return None;
    }

    let (sx, sy, sw, sh) = screen.frame;
    let (wx, wy, ww, wh) = frame;

    // The cutout is centered on the screen, so the mask only lines up when
    // the window spans the full screen width at the very top.
    let spans_width = (wx - sx).abs() < 1.0 && (ww - sw).abs() < 1.0;
    let reaches_top = wy + wh >= sy + sh - 1.0;
    if !spans_width || !reaches_top {
        return None;
    }

    let mut geometry = screen.device.notch_geometry()?;
    if let Some(width) = config.notch.width {
        geometry.notch_width = width;
    }
    Some(geometry)
}

fn create_host_window(mtm: MainThreadMarker) -> Retained<NSWindow> {
    let rect = NSRect::new(NSPoint::new(240.0, 240.0), NSSize::new(480.0, 300.0));
    let style = NSWindowStyleMask::Titled
        | NSWindowStyleMask::Closable
        | NSWindowStyleMask::Miniaturizable
        | NSWindowStyleMask::Resizable;

    let window: Retained<NSWindow> = unsafe {
        msg_send![
            NSWindow::alloc(mtm),
            initWithContentRect: rect,
            styleMask: style,
            backing: NSBackingStoreType::Buffered,
            defer: false
        ]
    };

    let title = NSString::from_str("Glimmer");
    window.setTitle(&title);
    window.makeKeyAndOrderFront(None);
    window
}
