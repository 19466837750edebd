use std::cell::RefCell;
use std::collections::HashMap;

use objc2::rc::Retained;
use objc2::{define_class, msg_send, MainThreadMarker, MainThreadOnly};
use objc2_app_kit::{NSGraphicsContext, NSView};
use objc2_foundation::NSRect;

use crate::animation::Color;
use crate::geometry::{bar_path, notch_path, NotchGeometry};
use crate::render::graphics;

thread_local! {
    static VIEW_STATES: RefCell<HashMap<usize, ViewState>> = RefCell::new(HashMap::new());
}

/// Everything `drawRect:` needs, pushed by the app loop each tick.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Gradient stops for the current animation phase.
    pub stops: Vec<Color>,
    /// Overall bar opacity from the fade ramp.
    pub alpha: f64,
    /// Ribbon thickness in points.
    pub bar_height: f64,
    /// Notch geometry to route around, or `None` for a plain ribbon.
    pub geometry: Option<NotchGeometry>,
}

define_class!(
    #[unsafe(super(NSView))]
    #[thread_kind = MainThreadOnly]
    #[name = "GradientBarView"]
    pub struct GradientBarView;

    impl GradientBarView {
        #[unsafe(method(drawRect:))]
        fn draw_rect(&self, _dirty_rect: NSRect) {
            let view_id = self as *const _ as usize;
            VIEW_STATES.with(|states| {
                if let Some(state) = states.borrow().get(&view_id) {
                    self.draw_content(state);
                }
            });
        }

        #[unsafe(method(isOpaque))]
        fn is_opaque(&self) -> bool {
            false
        }

        // Flipped so view coordinates match the y-down path geometry.
        #[unsafe(method(isFlipped))]
        fn is_flipped(&self) -> bool {
            true
        }
    }
);

impl GradientBarView {
    pub fn new(mtm: MainThreadMarker) -> Retained<Self> {
        let view: Retained<Self> = unsafe { msg_send![Self::alloc(mtm), init] };

        let view_id = &*view as *const _ as usize;
        VIEW_STATES.with(|states| {
            states.borrow_mut().insert(view_id, ViewState::default());
        });

        view
    }

    pub fn view_id(&self) -> usize {
        self as *const _ as usize
    }

    fn draw_content(&self, state: &ViewState) {
        if state.alpha <= 0.0 || state.stops.is_empty() {
            return;
        }

        let bounds = NSView::bounds(self);
        let width = bounds.size.width;

        // The mask is recomputed on every pass; geometry inputs are cheap
        // and the window width can change under us.
        let mask = match &state.geometry {
            Some(geometry) => notch_path(width, geometry, state.bar_height),
            None => bar_path(width, state.bar_height),
        };

        let Some(ns_context) = NSGraphicsContext::currentContext() else {
            return;
        };

        let cg_context = ns_context.CGContext();
        let cg_context_ptr: *mut core_graphics::sys::CGContext =
            Retained::as_ptr(&cg_context) as *const _ as *mut _;

        let mut ctx =
            unsafe { core_graphics::context::CGContext::from_existing_context_ptr(cg_context_ptr) };

        graphics::draw_bar(&mut ctx, &mask, &state.stops, state.alpha, width);

        std::mem::forget(ctx);
    }
}

/// Replaces a view's render state. Called from the app loop; takes effect on
/// the next display pass.
pub fn set_view_state(view_id: usize, state: ViewState) {
    VIEW_STATES.with(|states| {
        states.borrow_mut().insert(view_id, state);
    });
}
