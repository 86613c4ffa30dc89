//! UI module for rendering the TUI

mod components;
mod forms;
mod home;
mod layout;
mod students;
mod wizard;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let main_area = layout::create_layout(frame.area());

    match app.state.current_view {
        View::Home => home::draw(frame, main_area, app),
        View::Students => students::draw(frame, main_area, app),
    }

    // Open wizard sits above the view
    wizard::draw(frame, app);

    layout::draw_status_bar(frame, app);
}
