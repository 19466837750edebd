pub mod bar_window;
pub mod key_window_monitor;
pub mod screen;

pub use bar_window::BarWindow;
pub use key_window_monitor::{window_frame, AppKitWindowList, NotificationFocusEvents};
pub use screen::{get_main_screen_info, ScreenInfo};
