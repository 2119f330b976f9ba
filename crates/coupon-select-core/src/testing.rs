use crate::command::{Command, Effect};
use crate::model::Model;
use crate::subscription::SubscriptionId;
use ratatui::backend::TestBackend;
use ratatui::buffer::Buffer;
use ratatui::Terminal;
use std::collections::VecDeque;

/// Drives a [`Model`] without a terminal or a tokio runtime.
///
/// Messages emitted by commands are queued and processed by
/// [`drain_messages`](TestProgram::drain_messages). Futures, such as a
/// notice expiry tick, are dropped; a quit request is only recorded.
///
/// ```rust,ignore
/// let mut prog = TestProgram::<CheckoutApp>::new(flags);
/// prog.send_and_drain(Msg::Picker(picker::Message::Toggle));
/// assert!(prog.render_string(60, 12).contains("SAVE10"));
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    queue: VecDeque<M::Message>,
    quit: bool,
}

impl<M: Model> TestProgram<M> {
    pub fn new(flags: M::Flags) -> Self {
        let (model, init) = M::init(flags);
        let mut program = TestProgram {
            model,
            queue: VecDeque::new(),
            quit: false,
        };
        program.absorb(init);
        program
    }

    /// Run one update. Anything it emits waits in the queue.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.absorb(cmd);
    }

    /// Process queued messages, including ones they emit, until the queue is empty.
    pub fn drain_messages(&mut self) {
        while let Some(msg) = self.queue.pop_front() {
            self.send(msg);
        }
    }

    pub fn send_and_drain(&mut self, msg: M::Message) {
        self.send(msg);
        self.drain_messages();
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Ids of the subscriptions the model declares right now. Nothing is started.
    pub fn declared_subscriptions(&self) -> Vec<SubscriptionId> {
        self.model
            .subscriptions()
            .iter()
            .map(|sub| sub.id().clone())
            .collect()
    }

    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(width, height))
            .expect("test backend never fails");
        terminal
            .draw(|frame| self.model.view(frame))
            .expect("test backend never fails");
        terminal.backend().buffer().clone()
    }

    /// [`render`](TestProgram::render) flattened with [`buffer_to_string`].
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn absorb(&mut self, cmd: Command<M::Message>) {
        cmd.visit(&mut |effect| match effect {
            Effect::Emit(msg) => self.queue.push_back(msg),
            Effect::Quit => self.quit = true,
            Effect::Nothing | Effect::Later(_) | Effect::Many(_) => {}
        });
    }
}

/// One line per buffer row, cells concatenated.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subscription::Subscription;
    use futures::stream::BoxStream;
    use ratatui::widgets::Paragraph;

    /// Counts applied coupons; `Apply` chains into `Applied`.
    struct Basket {
        applied: Vec<String>,
        listening: bool,
    }

    #[derive(Debug)]
    enum BasketMsg {
        Apply(String),
        Applied(String),
        Listen(bool),
        Checkout,
    }

    impl Model for Basket {
        type Message = BasketMsg;
        type Flags = Vec<String>;

        fn init(applied: Vec<String>) -> (Self, Command<BasketMsg>) {
            (
                Basket {
                    applied,
                    listening: false,
                },
                Command::none(),
            )
        }

        fn update(&mut self, msg: BasketMsg) -> Command<BasketMsg> {
            match msg {
                BasketMsg::Apply(code) => Command::message(BasketMsg::Applied(code)),
                BasketMsg::Applied(code) => {
                    self.applied.push(code);
                    Command::none()
                }
                BasketMsg::Listen(on) => {
                    self.listening = on;
                    Command::none()
                }
                BasketMsg::Checkout => Command::quit(),
            }
        }

        fn view(&self, frame: &mut ratatui::Frame) {
            let text = format!("Applied: {}", self.applied.join(","));
            frame.render_widget(Paragraph::new(text), frame.area());
        }

        fn subscriptions(&self) -> Vec<Subscription<BasketMsg>> {
            if !self.listening {
                return vec![];
            }
            let stream: BoxStream<'static, BasketMsg> = Box::pin(futures::stream::pending());
            vec![Subscription::from_stream(SubscriptionId::of::<Basket>(), stream)]
        }
    }

    #[test]
    fn init_with_flags() {
        let prog = TestProgram::<Basket>::new(vec!["SAVE10".into()]);
        assert_eq!(prog.model().applied, vec!["SAVE10"]);
    }

    #[test]
    fn send_queues_chained_messages() {
        let mut prog = TestProgram::<Basket>::new(vec![]);
        prog.send(BasketMsg::Apply("SAVE10".into()));
        assert!(prog.model().applied.is_empty());
        prog.drain_messages();
        assert_eq!(prog.model().applied, vec!["SAVE10"]);
    }

    #[test]
    fn quit_is_recorded() {
        let mut prog = TestProgram::<Basket>::new(vec![]);
        assert!(!prog.quit_requested());
        prog.send(BasketMsg::Checkout);
        assert!(prog.quit_requested());
    }

    #[test]
    fn declared_subscriptions_follow_state() {
        let mut prog = TestProgram::<Basket>::new(vec![]);
        assert!(prog.declared_subscriptions().is_empty());
        prog.send(BasketMsg::Listen(true));
        assert_eq!(
            prog.declared_subscriptions(),
            vec![SubscriptionId::of::<Basket>()]
        );
    }

    #[test]
    fn render_after_update() {
        let mut prog = TestProgram::<Basket>::new(vec![]);
        prog.send_and_drain(BasketMsg::Apply("FOOD5".into()));
        assert!(prog.render_string(40, 1).contains("Applied: FOOD5"));
    }
}
