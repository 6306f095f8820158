//! UI components

pub mod wizard;

pub use wizard::WizardComponent;

use crate::action::Action;
use color_eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::{Frame, layout::Rect};

/// A drawable, input-handling piece of the UI
pub trait Component {
    /// Handle a key event, optionally producing an action for the app loop
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>>;

    /// React to an application-level action
    fn update(&mut self, action: Action) -> Result<Option<Action>>;

    /// Render into the given area
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()>;
}
