//! Reusable UI components

mod banner;
mod button;

pub use banner::{banner_height, centered_rect, render_banner};
pub use button::{render_button, render_menu_button, BUTTON_HEIGHT};
