use crossterm::event::KeyEvent;

/// Terminal events delivered through the
/// [`terminal_events`](crate::subscriptions::terminal_events) subscription.
///
/// Mouse events are not forwarded; the widgets are keyboard driven.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// A keyboard event.
    Key(KeyEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    /// Terminal window gained focus.
    FocusGained,
    /// Terminal window lost focus.
    FocusLost,
    /// Bracketed paste content.
    Paste(String),
}

impl TerminalEvent {
    /// Convert a crossterm event, discarding the kinds the runtime ignores.
    pub fn from_crossterm(event: crossterm::event::Event) -> Option<Self> {
        use crossterm::event::Event;
        match event {
            Event::Key(k) => Some(TerminalEvent::Key(k)),
            Event::Resize(w, h) => Some(TerminalEvent::Resize(w, h)),
            Event::FocusGained => Some(TerminalEvent::FocusGained),
            Event::FocusLost => Some(TerminalEvent::FocusLost),
            Event::Paste(s) => Some(TerminalEvent::Paste(s)),
            Event::Mouse(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{Event, KeyCode, KeyModifiers};

    #[test]
    fn key_events_pass_through() {
        let key = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE);
        assert_eq!(
            TerminalEvent::from_crossterm(Event::Key(key)),
            Some(TerminalEvent::Key(key))
        );
    }

    #[test]
    fn focus_events_map() {
        assert_eq!(
            TerminalEvent::from_crossterm(Event::FocusLost),
            Some(TerminalEvent::FocusLost)
        );
    }
}
