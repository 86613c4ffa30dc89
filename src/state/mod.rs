//! Application state module

mod app_state;
mod entities;
pub mod forms;

pub use app_state::*;
pub use entities::*;
