//! 可复用 UI 组件

mod input_field;
mod popup;
mod status_indicator;

pub use input_field::{InputField, render_form};
pub use popup::{Popup, centered_rect};
pub use status_indicator::StatusIndicator;
