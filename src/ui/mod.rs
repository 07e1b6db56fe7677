/// User interface module
///
/// Views read the controller and emit `Message`s; none of them hold state
/// apart from the canvas drag state.

pub mod map_canvas;
pub mod popup;
pub mod sidebar;
pub mod toast;
