//! Application state definitions

use std::time::{Duration, Instant};

use super::entities::Student;
use super::forms::CompletionNotice;

/// How long a status bar message stays visible
const STATUS_TTL: Duration = Duration::from_secs(5);

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Home,
    Students,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Students => "Students",
        }
    }
}

/// Entries of the home menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAction {
    NewClass,
    NewStudent,
    BrowseStudents,
}

impl HomeAction {
    pub const ALL: [HomeAction; 3] = [Self::NewClass, Self::NewStudent, Self::BrowseStudents];

    pub fn label(&self) -> &'static str {
        match self {
            Self::NewClass => "New class",
            Self::NewStudent => "New student",
            Self::BrowseStudents => "Students",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Self::NewClass => "Schedule a class for a course",
            Self::NewStudent => "Register a student",
            Self::BrowseStudents => "Browse and edit students",
        }
    }
}

/// Loading state of the student list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListState {
    #[default]
    NotLoaded,
    Loading,
    Loaded,
    Failed(String),
}

/// Main application state
#[derive(Debug, Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,

    // Data
    pub students: Vec<Student>,
    pub students_state: ListState,
    /// Entities saved this session, newest first
    pub recent: Vec<CompletionNotice>,

    // Selection
    pub selected_index: usize,

    // UI state
    pub status_message: Option<(String, Instant)>,
    pub using_fixtures: bool,
}

impl AppState {
    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
    }

    /// Number of selectable rows in the current view
    pub fn row_count(&self) -> usize {
        match self.current_view {
            View::Home => HomeAction::ALL.len(),
            View::Students => self.students.len(),
        }
    }

    pub fn selected_action(&self) -> Option<HomeAction> {
        HomeAction::ALL.get(self.selected_index).copied()
    }

    pub fn selected_student(&self) -> Option<&Student> {
        self.students.get(self.selected_index)
    }

    pub fn set_status(&mut self, message: impl Into<String>, now: Instant) {
        self.status_message = Some((message.into(), now));
    }

    /// Current status message, if it has not expired
    pub fn status(&self, now: Instant) -> Option<&str> {
        self.status_message
            .as_ref()
            .filter(|(_, at)| now.duration_since(*at) < STATUS_TTL)
            .map(|(message, _)| message.as_str())
    }

    /// Replace the student list, keeping the selection in range
    pub fn set_students(&mut self, students: Vec<Student>) {
        self.students = students;
        self.students_state = ListState::Loaded;
        if self.selected_index >= self.students.len() && self.current_view == View::Students {
            self.selected_index = self.students.len().saturating_sub(1);
        }
    }

    pub fn record_completion(&mut self, notice: CompletionNotice) {
        self.recent.insert(0, notice);
        self.recent.truncate(10);
    }
}
