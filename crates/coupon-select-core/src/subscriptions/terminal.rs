use crate::event::TerminalEvent;
use crate::subscription::{Subscription, SubscriptionId};
use crossterm::event::EventStream;
use futures::StreamExt;

/// Identity of the terminal event subscription. There is only one reader of
/// the terminal per program.
pub struct TerminalEvents;

/// Terminal input as a subscription. `map` returns `None` to discard an
/// event.
///
/// ```rust,ignore
/// fn subscriptions(&self) -> Vec<Subscription<Msg>> {
///     vec![terminal_events(|event| match event {
///         TerminalEvent::Key(key) => Some(Msg::Key(key)),
///         TerminalEvent::FocusGained => Some(Msg::FocusGained),
///         _ => None,
///     })]
/// }
/// ```
pub fn terminal_events<Msg: Send + 'static>(
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    Subscription::new(SubscriptionId::of::<TerminalEvents>(), move || {
        EventStream::new()
            .filter_map(move |result| {
                let msg = match result {
                    Ok(event) => TerminalEvent::from_crossterm(event).and_then(&map),
                    Err(err) => {
                        tracing::warn!(%err, "reading terminal events failed");
                        None
                    }
                };
                futures::future::ready(msg)
            })
            .boxed()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_do_not_depend_on_the_mapping() {
        let keys = terminal_events(|event| match event {
            TerminalEvent::Key(key) => Some(key.code),
            _ => None,
        });
        let none = terminal_events(|_| None::<crossterm::event::KeyCode>);
        assert_eq!(keys.id(), none.id());
        assert_eq!(keys.id(), &SubscriptionId::of::<TerminalEvents>());
    }
}
