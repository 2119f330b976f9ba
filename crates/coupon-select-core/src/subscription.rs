use futures::stream::BoxStream;
use futures::StreamExt;
use std::any::TypeId;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

type Opener<Msg> = Box<dyn FnOnce() -> BoxStream<'static, Msg> + Send>;

/// A long-lived event source managed by the runtime.
///
/// Subscriptions are declared in [`Model::subscriptions`](crate::Model::subscriptions)
/// and diffed by [`SubscriptionId`] after every update: newly declared ones
/// are opened, ones that disappeared are aborted, and unchanged ones keep
/// running untouched. Declaring a subscription acquires nothing.
pub struct Subscription<Msg: Send + 'static> {
    id: SubscriptionId,
    open: Opener<Msg>,
}

/// Identity used to diff subscriptions between updates: a type plus a
/// numeric discriminant, so the keyboard show and hide listeners can share
/// a source type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
    type_id: TypeId,
    discriminant: u64,
}

impl SubscriptionId {
    pub fn new<T: 'static>(discriminant: u64) -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            discriminant,
        }
    }

    /// Id for a source of which there is only ever one.
    pub fn of<T: 'static>() -> Self {
        Self::new::<T>(0)
    }
}

/// A type that can be turned into a stream of values on demand.
pub trait SubscriptionSource: Send + 'static {
    type Output: Send + 'static;

    fn id(&self) -> SubscriptionId;

    /// Acquire the underlying resource and return its stream. Called once,
    /// when the runtime starts the subscription; dropping the stream
    /// releases the resource.
    fn stream(self) -> BoxStream<'static, Self::Output>;
}

/// Wrap a [`SubscriptionSource`] as a [`Subscription`].
pub fn subscribe<S: SubscriptionSource>(source: S) -> Subscription<S::Output> {
    Subscription::new(source.id(), move || source.stream())
}

impl<Msg: Send + 'static> Subscription<Msg> {
    /// A subscription whose stream is produced by `open` when it starts.
    pub fn new(
        id: SubscriptionId,
        open: impl FnOnce() -> BoxStream<'static, Msg> + Send + 'static,
    ) -> Self {
        Subscription {
            id,
            open: Box::new(open),
        }
    }

    /// A subscription over an already built stream.
    pub fn from_stream(id: SubscriptionId, stream: BoxStream<'static, Msg>) -> Self {
        Self::new(id, move || stream)
    }

    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    /// Convert every emitted value, e.g. into a parent's message type. The
    /// id is unchanged.
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Subscription<NewMsg> {
        let open = self.open;
        Subscription::new(self.id, move || open().map(f).boxed())
    }

    /// Open the stream now and forward it to `tx` from its own task.
    fn start(self, tx: mpsc::UnboundedSender<Msg>) -> AbortHandle {
        let mut stream = (self.open)();
        let task = tokio::spawn(async move {
            while let Some(msg) = stream.next().await {
                if tx.send(msg).is_err() {
                    break;
                }
            }
        });
        task.abort_handle()
    }
}

/// The running subscriptions of one program.
///
/// Everything it started is aborted on [`shutdown`](Self::shutdown) and on
/// drop, so no listener outlives the program that declared it.
pub(crate) struct SubscriptionManager<Msg: Send + 'static> {
    running: HashMap<SubscriptionId, AbortHandle>,
    tx: mpsc::UnboundedSender<Msg>,
}

impl<Msg: Send + 'static> SubscriptionManager<Msg> {
    pub fn new(tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            running: HashMap::new(),
            tx,
        }
    }

    /// Make the running set match `declared`.
    pub fn reconcile(&mut self, declared: Vec<Subscription<Msg>>) {
        let mut declared: HashMap<SubscriptionId, Subscription<Msg>> =
            declared.into_iter().map(|sub| (sub.id.clone(), sub)).collect();

        self.running.retain(|id, task| {
            // Still declared: keep it running and forget the new copy.
            if declared.remove(id).is_some() {
                return true;
            }
            tracing::debug!(?id, "subscription stopped");
            task.abort();
            false
        });

        for (id, sub) in declared {
            tracing::debug!(?id, "subscription started");
            let task = sub.start(self.tx.clone());
            self.running.insert(id, task);
        }
    }

    pub fn shutdown(&mut self) {
        if !self.running.is_empty() {
            tracing::debug!(count = self.running.len(), "releasing subscriptions");
        }
        for (_, task) in self.running.drain() {
            task.abort();
        }
    }

    #[cfg(test)]
    pub fn running(&self) -> usize {
        self.running.len()
    }
}

impl<Msg: Send + 'static> Drop for SubscriptionManager<Msg> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    fn pending_sub(id: SubscriptionId) -> Subscription<i32> {
        let stream: BoxStream<'static, i32> = Box::pin(futures::stream::pending());
        Subscription::from_stream(id, stream)
    }

    /// A subscription whose stream holds `guard` until the task is dropped.
    fn guarded_sub(id: SubscriptionId, guard: oneshot::Sender<()>) -> Subscription<i32> {
        let stream = futures::stream::unfold(guard, |guard| async move {
            futures::future::pending::<()>().await;
            Some((0, guard))
        });
        Subscription::from_stream(id, Box::pin(stream))
    }

    #[test]
    fn subscription_id_equality() {
        assert_eq!(SubscriptionId::of::<String>(), SubscriptionId::of::<String>());
        assert_ne!(SubscriptionId::of::<String>(), SubscriptionId::of::<i32>());
    }

    #[test]
    fn subscription_id_with_discriminant() {
        assert_ne!(
            SubscriptionId::new::<String>(1),
            SubscriptionId::new::<String>(2)
        );
    }

    #[test]
    fn declaring_does_not_open() {
        let sub: Subscription<i32> = Subscription::new(SubscriptionId::of::<u8>(), || {
            panic!("opened while only declared")
        });
        assert_eq!(sub.map(|n| n + 1).id(), &SubscriptionId::of::<u8>());
    }

    #[tokio::test]
    async fn manager_starts_new() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);
        manager.reconcile(vec![pending_sub(SubscriptionId::of::<String>())]);
        assert_eq!(manager.running(), 1);
    }

    #[tokio::test]
    async fn manager_stops_removed() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);
        let (guard_tx, guard_rx) = oneshot::channel();

        manager.reconcile(vec![guarded_sub(SubscriptionId::of::<String>(), guard_tx)]);
        assert_eq!(manager.running(), 1);

        manager.reconcile(vec![]);
        assert_eq!(manager.running(), 0);
        assert!(guard_rx.await.is_err(), "stream should be dropped");
    }

    #[tokio::test]
    async fn manager_keeps_existing() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);
        let id = SubscriptionId::of::<String>();

        manager.reconcile(vec![pending_sub(id.clone())]);
        manager.reconcile(vec![pending_sub(id)]);
        assert_eq!(manager.running(), 1);
    }

    #[tokio::test]
    async fn manager_drop_releases_everything() {
        let (tx, _rx) = mpsc::unbounded_channel::<i32>();
        let mut manager = SubscriptionManager::new(tx);
        let (show_tx, show_rx) = oneshot::channel();
        let (hide_tx, hide_rx) = oneshot::channel();

        manager.reconcile(vec![
            guarded_sub(SubscriptionId::new::<String>(1), show_tx),
            guarded_sub(SubscriptionId::new::<String>(2), hide_tx),
        ]);
        assert_eq!(manager.running(), 2);

        drop(manager);
        assert!(show_rx.await.is_err());
        assert!(hide_rx.await.is_err());
    }

    #[tokio::test]
    async fn mapped_subscription_forwards() {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let mut manager = SubscriptionManager::new(tx);
        let stream: BoxStream<'static, i32> = Box::pin(futures::stream::iter(vec![1, 2]));
        let sub = Subscription::from_stream(SubscriptionId::of::<i32>(), stream)
            .map(|n| format!("n{n}"));

        manager.reconcile(vec![sub]);
        assert_eq!(rx.recv().await.as_deref(), Some("n1"));
        assert_eq!(rx.recv().await.as_deref(), Some("n2"));
    }
}
