//! Built-in subscription sources.
//!
//! - **Terminal events** ([`terminal_events`]) -- keyboard, resize, focus,
//!   and paste events from the terminal.
//! - **Keyboard visibility** ([`keyboard_visibility`], [`KeyboardSignals`])
//!   -- the host platform's show/hide notifications for the input method.

mod keyboard;
mod terminal;

pub use keyboard::*;
pub use terminal::*;
