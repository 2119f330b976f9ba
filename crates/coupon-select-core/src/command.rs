use futures::future::BoxFuture;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A side effect returned from [`Model::update`](crate::Model::update) or
/// [`Component::update`](crate::Component::update).
///
/// Widgets talk to their parent exclusively through commands: a picker that
/// accepted a coupon returns `Command::message(Message::Selected(..))`, and
/// the parent maps that message into its own type with [`Command::map`].
///
/// ```rust,ignore
/// // Report a selection upward:
/// let cmd = Command::message(Message::Selected(coupon));
///
/// // Dismiss a notification later:
/// let cmd = Command::tick(Duration::from_secs(3), move |_| Message::NoticeExpired(id));
/// ```
pub struct Command<Msg: Send + 'static>(pub(crate) Effect<Msg>);

pub(crate) enum Effect<Msg: Send + 'static> {
    Nothing,
    /// Delivered on the next loop iteration.
    Emit(Msg),
    Quit,
    /// Spawned; its output is delivered when it completes.
    Later(BoxFuture<'static, Msg>),
    /// Never empty and never contains `Nothing`.
    Many(Vec<Command<Msg>>),
}

impl<Msg: Send + 'static> Command<Msg> {
    pub fn none() -> Self {
        Command(Effect::Nothing)
    }

    pub fn message(msg: Msg) -> Self {
        Command(Effect::Emit(msg))
    }

    /// Ask the runtime to stop after this update.
    pub fn quit() -> Self {
        Command(Effect::Quit)
    }

    /// Await `future` on the runtime and turn its output into a message.
    pub fn perform<F, T>(future: F, map: impl FnOnce(T) -> Msg + Send + 'static) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Command(Effect::Later(Box::pin(async move { map(future.await) })))
    }

    /// Fire once after `delay`.
    pub fn tick(delay: Duration, map: impl FnOnce(Instant) -> Msg + Send + 'static) -> Self {
        Command(Effect::Later(Box::pin(async move {
            tokio::time::sleep(delay).await;
            map(Instant::now())
        })))
    }

    /// Run several commands. No-ops are dropped and a single survivor is
    /// returned as is.
    pub fn batch(cmds: impl IntoIterator<Item = Command<Msg>>) -> Self {
        let mut cmds: Vec<_> = cmds.into_iter().filter(|cmd| !cmd.is_none()).collect();
        match cmds.len() {
            0 => Command::none(),
            1 => cmds.swap_remove(0),
            _ => Command(Effect::Many(cmds)),
        }
    }

    /// Lift a child component's command into the parent's message type.
    pub fn map<NewMsg: Send + 'static>(
        self,
        f: impl Fn(Msg) -> NewMsg + Send + Sync + 'static,
    ) -> Command<NewMsg> {
        self.map_shared(Arc::new(f))
    }

    fn map_shared<NewMsg: Send + 'static>(
        self,
        f: Arc<dyn Fn(Msg) -> NewMsg + Send + Sync>,
    ) -> Command<NewMsg> {
        Command(match self.0 {
            Effect::Nothing => Effect::Nothing,
            Effect::Emit(msg) => Effect::Emit(f(msg)),
            Effect::Quit => Effect::Quit,
            Effect::Later(fut) => Effect::Later(Box::pin(async move { f(fut.await) })),
            Effect::Many(cmds) => Effect::Many(
                cmds.into_iter()
                    .map(|cmd| cmd.map_shared(Arc::clone(&f)))
                    .collect(),
            ),
        })
    }

    pub fn is_none(&self) -> bool {
        matches!(self.0, Effect::Nothing)
    }

    pub fn is_quit(&self) -> bool {
        matches!(self.0, Effect::Quit)
    }

    /// The message, if this command only delivers one.
    pub fn into_message(self) -> Option<Msg> {
        match self.0 {
            Effect::Emit(msg) => Some(msg),
            _ => None,
        }
    }

    /// The parts, if this command is a batch.
    pub fn into_batch(self) -> Option<Vec<Command<Msg>>> {
        match self.0 {
            Effect::Many(cmds) => Some(cmds),
            _ => None,
        }
    }

    /// Every immediate message, in order, descending into batches. Pending
    /// futures are dropped unpolled.
    pub fn into_messages(self) -> Vec<Msg> {
        let mut out = Vec::new();
        self.visit(&mut |effect| {
            if let Effect::Emit(msg) = effect {
                out.push(msg);
            }
        });
        out
    }

    /// Call `f` on every leaf effect, flattening batches.
    pub(crate) fn visit(self, f: &mut impl FnMut(Effect<Msg>)) {
        match self.0 {
            Effect::Many(cmds) => {
                for cmd in cmds {
                    cmd.visit(f);
                }
            }
            leaf => f(leaf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_and_quit_are_recognized() {
        assert!(Command::<()>::none().is_none());
        assert!(Command::<()>::quit().is_quit());
        assert!(!Command::message(()).is_none());
    }

    #[test]
    fn batch_collapses() {
        let empty: Command<i32> = Command::batch(vec![]);
        assert!(empty.is_none());

        let single = Command::batch(vec![Command::none(), Command::message(7)]);
        assert_eq!(single.into_message(), Some(7));

        let pair = Command::batch(vec![Command::message(1), Command::message(2)]);
        assert_eq!(pair.into_batch().map(|cmds| cmds.len()), Some(2));
    }

    #[test]
    fn map_converts_messages_and_keeps_quit() {
        let mapped: Command<String> = Command::message(42).map(|n: i32| n.to_string());
        assert_eq!(mapped.into_message().as_deref(), Some("42"));

        let quit: Command<String> = Command::<i32>::quit().map(|n| n.to_string());
        assert!(quit.is_quit());
    }

    #[test]
    fn into_messages_flattens_and_skips_futures() {
        let cmd: Command<i32> = Command::batch(vec![
            Command::message(1),
            Command::tick(Duration::from_secs(1), |_| 99),
            Command::batch(vec![Command::message(2), Command::message(3)]),
        ]);
        assert_eq!(cmd.into_messages(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn mapped_future_resolves_through_both_maps() {
        let cmd = Command::perform(async { 20 }, |n: i32| n + 1).map(|n| n * 2);
        match cmd.0 {
            Effect::Later(fut) => assert_eq!(fut.await, 42),
            _ => panic!("expected a future"),
        }
    }

    #[tokio::test]
    async fn tick_waits_for_its_delay() {
        let start = Instant::now();
        let cmd = Command::tick(Duration::from_millis(20), |_| "expired");
        match cmd.0 {
            Effect::Later(fut) => assert_eq!(fut.await, "expired"),
            _ => panic!("expected a future"),
        }
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
