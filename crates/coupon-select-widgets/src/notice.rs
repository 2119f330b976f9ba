//! Transient notifications, such as the reason a coupon was rejected.
//!
//! Each posted notice gets a generation number. An expiry timer only clears
//! the notice it was started for, so a newer notice is never cut short by an
//! older timer.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub generation: u64,
}

#[derive(Debug, Clone, Default)]
pub struct NoticeSlot {
    current: Option<Notice>,
    next_generation: u64,
}

impl NoticeSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `text`, replacing any current notice. Returns its generation.
    pub fn post(&mut self, text: impl Into<String>) -> u64 {
        let generation = self.next_generation;
        self.next_generation += 1;
        self.current = Some(Notice {
            text: text.into(),
            generation,
        });
        generation
    }

    /// Clear the notice if it is still the one from `generation`.
    pub fn expire(&mut self, generation: u64) -> bool {
        if self.current.as_ref().is_some_and(|n| n.generation == generation) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(|n| n.text.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_and_expire() {
        let mut slot = NoticeSlot::new();
        let id = slot.post("Minimum order not met");
        assert_eq!(slot.current(), Some("Minimum order not met"));
        assert!(slot.expire(id));
        assert_eq!(slot.current(), None);
    }

    #[test]
    fn stale_timer_keeps_newer_notice() {
        let mut slot = NoticeSlot::new();
        let first = slot.post("first");
        let second = slot.post("second");
        assert!(!slot.expire(first));
        assert_eq!(slot.current(), Some("second"));
        assert!(slot.expire(second));
    }

    #[test]
    fn clear_drops_notice() {
        let mut slot = NoticeSlot::new();
        slot.post("x");
        slot.clear();
        assert_eq!(slot.current(), None);
    }
}
