mod bar_view;

pub use bar_view::{set_view_state, GradientBarView, ViewState};
