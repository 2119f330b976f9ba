use crate::subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

/// Capacity of each signal channel. Signals are edge notifications, so a
/// lagging listener only needs the most recent ones.
const SIGNAL_CAPACITY: usize = 16;

/// Which keyboard transition a listener reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyboardEdge {
    /// The on-screen keyboard (or input method) became visible.
    Show,
    /// The on-screen keyboard was dismissed.
    Hide,
}

impl KeyboardEdge {
    fn discriminant(self) -> u64 {
        match self {
            KeyboardEdge::Show => 1,
            KeyboardEdge::Hide => 2,
        }
    }
}

/// Host-side handle of the keyboard visibility service.
///
/// The platform layer calls [`show`](KeyboardSignals::show) and
/// [`hide`](KeyboardSignals::hide); widgets listen through
/// [`keyboard_visibility`]. The two edges travel on independent channels and
/// carry no ordering guarantee relative to each other. Cloning the handle
/// shares the same channels.
#[derive(Debug, Clone)]
pub struct KeyboardSignals {
    show: broadcast::Sender<()>,
    hide: broadcast::Sender<()>,
}

impl KeyboardSignals {
    pub fn new() -> Self {
        let (show, _) = broadcast::channel(SIGNAL_CAPACITY);
        let (hide, _) = broadcast::channel(SIGNAL_CAPACITY);
        Self { show, hide }
    }

    /// Publish a "keyboard shown" notification. A no-op without listeners.
    pub fn show(&self) {
        let _ = self.show.send(());
    }

    /// Publish a "keyboard hidden" notification. A no-op without listeners.
    pub fn hide(&self) {
        let _ = self.hide.send(());
    }

    /// Number of live listeners across both edges.
    pub fn listener_count(&self) -> usize {
        self.show.receiver_count() + self.hide.receiver_count()
    }

    /// A subscription source for one edge.
    pub fn listener(&self, edge: KeyboardEdge) -> KeyboardListener {
        let sender = match edge {
            KeyboardEdge::Show => self.show.clone(),
            KeyboardEdge::Hide => self.hide.clone(),
        };
        KeyboardListener { edge, sender }
    }
}

impl Default for KeyboardSignals {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscription source emitting its [`KeyboardEdge`] each time the host
/// publishes that edge.
///
/// The underlying receiver is created when the runtime starts the
/// subscription and dropped when the runtime aborts it.
pub struct KeyboardListener {
    edge: KeyboardEdge,
    sender: broadcast::Sender<()>,
}

impl SubscriptionSource for KeyboardListener {
    type Output = KeyboardEdge;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::new::<Self>(self.edge.discriminant())
    }

    fn stream(self) -> BoxStream<'static, KeyboardEdge> {
        let edge = self.edge;
        let stream = BroadcastStream::new(self.sender.subscribe()).filter_map(move |result| async move {
            match result {
                Ok(()) => Some(edge),
                Err(err) => {
                    // Lagging only means several identical edges were
                    // coalesced; the flag is idempotent.
                    tracing::debug!(?edge, %err, "keyboard listener lagged");
                    Some(edge)
                }
            }
        });
        Box::pin(stream)
    }
}

/// The show/hide listener pair as two subscriptions, each mapped through `map`.
///
/// ```rust,ignore
/// fn subscriptions(&self) -> Vec<Subscription<Message>> {
///     keyboard_visibility(&self.signals, |edge| match edge {
///         KeyboardEdge::Show => Message::KeyboardShown,
///         KeyboardEdge::Hide => Message::KeyboardHidden,
///     })
/// }
/// ```
pub fn keyboard_visibility<Msg: Send + 'static>(
    signals: &KeyboardSignals,
    map: impl Fn(KeyboardEdge) -> Msg + Clone + Send + Sync + 'static,
) -> Vec<Subscription<Msg>> {
    [KeyboardEdge::Show, KeyboardEdge::Hide]
        .into_iter()
        .map(|edge| subscribe(signals.listener(edge)).map(map.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::SubscriptionManager;
    use tokio::sync::mpsc;

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn listener_ids_are_distinct_per_edge() {
        let signals = KeyboardSignals::new();
        let show = signals.listener(KeyboardEdge::Show).id();
        let hide = signals.listener(KeyboardEdge::Hide).id();
        assert_ne!(show, hide);
        assert_eq!(show, signals.listener(KeyboardEdge::Show).id());
    }

    #[test]
    fn declaring_does_not_acquire() {
        let signals = KeyboardSignals::new();
        let subs = keyboard_visibility(&signals, |edge| edge);
        assert_eq!(subs.len(), 2);
        assert_eq!(signals.listener_count(), 0);
    }

    #[test]
    fn publishing_without_listeners_is_harmless() {
        let signals = KeyboardSignals::new();
        signals.show();
        signals.hide();
    }

    #[tokio::test]
    async fn started_pair_receives_both_edges() {
        let signals = KeyboardSignals::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(keyboard_visibility(&signals, |edge| edge));
        assert_eq!(signals.listener_count(), 2);

        signals.show();
        assert_eq!(rx.recv().await, Some(KeyboardEdge::Show));
        signals.hide();
        assert_eq!(rx.recv().await, Some(KeyboardEdge::Hide));
    }

    #[tokio::test]
    async fn removing_the_pair_releases_listeners() {
        let signals = KeyboardSignals::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(keyboard_visibility(&signals, |edge| edge));
        assert_eq!(signals.listener_count(), 2);

        manager.reconcile(vec![]);
        settle().await;
        assert_eq!(signals.listener_count(), 0);
    }

    #[tokio::test]
    async fn dropping_the_manager_releases_listeners() {
        let signals = KeyboardSignals::new();
        let (tx, _rx) = mpsc::unbounded_channel::<KeyboardEdge>();
        let mut manager = SubscriptionManager::new(tx);

        manager.reconcile(keyboard_visibility(&signals, |edge| edge));
        drop(manager);
        settle().await;
        assert_eq!(signals.listener_count(), 0);
    }
}
