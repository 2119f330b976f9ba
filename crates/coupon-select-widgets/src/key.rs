//! Key bindings for the picker and the help line built from them.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// One or more key combinations bound to a described action.
#[derive(Debug, Clone)]
pub struct Binding {
    pub keys: Vec<KeyCombination>,
    /// Short label for the help line, e.g. "select".
    pub description: String,
    /// Disabled bindings never match.
    pub enabled: bool,
}

/// A key press with the modifiers that must accompany it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombination {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Binding {
    pub fn new(key: KeyCombination, description: impl Into<String>) -> Self {
        Self::with_keys(vec![key], description)
    }

    pub fn with_keys(keys: Vec<KeyCombination>, description: impl Into<String>) -> Self {
        Self {
            keys,
            description: description.into(),
            enabled: true,
        }
    }

    /// Whether `event` presses one of the combinations with exactly its
    /// modifiers, so `ctrl+n` does not trigger a plain `n` binding.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.enabled
            && self
                .keys
                .iter()
                .any(|k| k.code == event.code && event.modifiers == k.modifiers)
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// `"↑/ctrl+p move up"`: all keys, then the description.
    pub fn help(&self) -> String {
        let keys: Vec<String> = self.keys.iter().map(KeyCombination::label).collect();
        format!("{} {}", keys.join("/"), self.description)
    }
}

impl KeyCombination {
    pub fn new(code: KeyCode) -> Self {
        Self::with_modifiers(code, KeyModifiers::NONE)
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self::with_modifiers(code, KeyModifiers::CONTROL)
    }

    pub fn with_modifiers(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Human-readable label such as `enter`, `ctrl+u` or `↓`.
    pub fn label(&self) -> String {
        let key = match self.code {
            KeyCode::Enter => "enter".to_string(),
            KeyCode::Esc => "esc".to_string(),
            KeyCode::Up => "↑".to_string(),
            KeyCode::Down => "↓".to_string(),
            KeyCode::Tab => "tab".to_string(),
            KeyCode::Backspace => "backspace".to_string(),
            KeyCode::Char(' ') => "space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            other => format!("{other:?}").to_lowercase(),
        };
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            format!("ctrl+{key}")
        } else if self.modifiers.contains(KeyModifiers::ALT) {
            format!("alt+{key}")
        } else {
            key
        }
    }
}

/// Types that expose their bindings for a help line.
pub trait KeyMap {
    /// The most important bindings, in display order.
    fn short_help(&self) -> Vec<&Binding>;
}

/// Join the short help of `map` into one line, skipping disabled bindings.
pub fn help_line(map: &dyn KeyMap) -> String {
    map.short_help()
        .into_iter()
        .filter(|b| b.enabled)
        .map(Binding::help)
        .collect::<Vec<_>>()
        .join(" · ")
}

/// Bindings understood by [`CouponPicker`](crate::picker::CouponPicker).
#[derive(Debug, Clone)]
pub struct PickerKeyMap {
    /// Open the list while it is closed.
    pub open: Binding,
    /// Close the list, keeping the query.
    pub close: Binding,
    pub up: Binding,
    pub down: Binding,
    /// Try to select the highlighted coupon.
    pub choose: Binding,
    /// Empty the query.
    pub clear: Binding,
}

impl Default for PickerKeyMap {
    fn default() -> Self {
        Self {
            open: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::Enter),
                    KeyCombination::new(KeyCode::Char(' ')),
                    KeyCombination::new(KeyCode::Down),
                ],
                "open",
            ),
            close: Binding::new(KeyCombination::new(KeyCode::Esc), "close"),
            up: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::Up),
                    KeyCombination::ctrl(KeyCode::Char('p')),
                ],
                "up",
            ),
            down: Binding::with_keys(
                vec![
                    KeyCombination::new(KeyCode::Down),
                    KeyCombination::ctrl(KeyCode::Char('n')),
                ],
                "down",
            ),
            choose: Binding::new(KeyCombination::new(KeyCode::Enter), "select"),
            clear: Binding::new(KeyCombination::ctrl(KeyCode::Char('u')), "clear search"),
        }
    }
}

impl KeyMap for PickerKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.choose, &self.clear, &self.close]
    }
}
