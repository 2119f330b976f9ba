//! The checkout host: owns the applied coupon and embeds the picker.

use coupon_select_core::{
    terminal_events, Command, Component, KeyboardSignals, Model, Subscription, TerminalEvent,
};
use coupon_select_widgets::coupon::{discount_badge, ClassifiedCoupon, CouponCollection};
use coupon_select_widgets::key::help_line;
use coupon_select_widgets::picker::{self, CouponPicker, PickerOptions};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Everything the host needs at startup.
pub struct CheckoutFlags {
    pub coupons: CouponCollection,
    pub options: PickerOptions,
    /// Keyboard visibility service shared with the picker. The host
    /// publishes into it; terminal focus stands in for the platform keyboard.
    pub signals: KeyboardSignals,
}

#[derive(Debug)]
pub enum Msg {
    Picker(picker::Message),
    Key(KeyEvent),
    Paste(String),
    FocusGained,
    FocusLost,
}

pub struct CheckoutApp {
    picker: CouponPicker,
    applied: Option<ClassifiedCoupon>,
    signals: KeyboardSignals,
}

impl CheckoutApp {
    /// The coupon the user applied, if any.
    pub fn applied(&self) -> Option<&ClassifiedCoupon> {
        self.applied.as_ref()
    }

    pub fn picker(&self) -> &CouponPicker {
        &self.picker
    }

    fn status_line(&self) -> Line<'static> {
        if let Some(notice) = self.picker.notice() {
            return Line::from(Span::styled(
                notice.to_string(),
                Style::default().fg(Color::Yellow),
            ));
        }
        match &self.applied {
            Some(coupon) => Line::from(vec![
                Span::raw("Applied: "),
                Span::styled(
                    coupon.coupon.code.clone(),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(
                    discount_badge(coupon.coupon.discount_amount),
                    Style::default().fg(Color::Green),
                ),
            ]),
            None => Line::from(Span::styled(
                "No coupon applied",
                Style::default().fg(Color::DarkGray),
            )),
        }
    }
}

fn is_quit_key(key: &KeyEvent, list_open: bool) -> bool {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => true,
        (KeyCode::Char('q'), KeyModifiers::NONE) => !list_open,
        _ => false,
    }
}

impl Model for CheckoutApp {
    type Message = Msg;
    type Flags = CheckoutFlags;

    fn init(flags: CheckoutFlags) -> (Self, Command<Msg>) {
        tracing::info!(coupons = flags.coupons.len(), "checkout started");
        let mut picker = CouponPicker::new(flags.coupons)
            .with_options(flags.options)
            .with_keyboard_signals(flags.signals.clone());
        picker.focus();
        (
            CheckoutApp {
                picker,
                applied: None,
                signals: flags.signals,
            },
            Command::none(),
        )
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Key(key) if is_quit_key(&key, self.picker.is_open()) => Command::quit(),
            Msg::Key(key) => self
                .picker
                .update(picker::Message::KeyPress(key))
                .map(Msg::Picker),
            Msg::Paste(text) if self.picker.is_open() => {
                let query = format!("{}{}", self.picker.search_query(), text);
                self.picker
                    .update(picker::Message::SetQuery(query))
                    .map(Msg::Picker)
            }
            Msg::Paste(_) => Command::none(),
            Msg::Picker(picker::Message::Selected(coupon)) => {
                tracing::info!(value = %coupon.value, code = %coupon.coupon.code, "coupon applied");
                self.picker.set_selected(Some(coupon.clone()));
                self.applied = Some(coupon);
                Command::none()
            }
            Msg::Picker(picker::Message::Rejected(reason)) => {
                tracing::info!(%reason, "coupon rejected");
                Command::none()
            }
            Msg::Picker(m) => self.picker.update(m).map(Msg::Picker),
            Msg::FocusGained => {
                self.signals.show();
                Command::none()
            }
            Msg::FocusLost => {
                self.signals.hide();
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [title_area, picker_area, _list_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let title = Paragraph::new(Line::from(Span::styled(
            "Checkout",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(title, title_area);

        frame.render_widget(Paragraph::new(self.status_line()), status_area);

        let help = if self.picker.is_open() {
            help_line(self.picker.keymap())
        } else {
            "enter open · q quit".to_string()
        };
        frame.render_widget(
            Paragraph::new(Span::styled(help, Style::default().fg(Color::DarkGray))),
            help_area,
        );

        // Last, so the open list overlays whatever is below the header.
        self.picker.view(frame, picker_area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs = vec![terminal_events(|ev| match ev {
            TerminalEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Msg::Key(key)),
            TerminalEvent::Paste(text) => Some(Msg::Paste(text)),
            TerminalEvent::FocusGained => Some(Msg::FocusGained),
            TerminalEvent::FocusLost => Some(Msg::FocusLost),
            _ => None,
        })];
        subs.extend(
            self.picker
                .subscriptions()
                .into_iter()
                .map(|sub| sub.map(Msg::Picker)),
        );
        subs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::sample_coupons;
    use coupon_select_core::testing::TestProgram;
    use coupon_select_core::{KeyboardEdge, SubscriptionSource};
    use futures::StreamExt;

    fn key(code: KeyCode) -> Msg {
        Msg::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn flags() -> CheckoutFlags {
        CheckoutFlags {
            coupons: sample_coupons(),
            options: PickerOptions::default(),
            signals: KeyboardSignals::new(),
        }
    }

    fn type_text(prog: &mut TestProgram<CheckoutApp>, text: &str) {
        for c in text.chars() {
            prog.send_and_drain(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn starts_with_nothing_applied() {
        let prog = TestProgram::<CheckoutApp>::new(flags());
        assert!(prog.model().applied().is_none());
        let screen = prog.render_string(60, 16);
        assert!(screen.contains("Select coupon..."));
        assert!(screen.contains("No coupon applied"));
    }

    #[test]
    fn selecting_applies_and_closes() {
        let mut prog = TestProgram::<CheckoutApp>::new(flags());
        prog.send_and_drain(key(KeyCode::Enter));
        assert!(prog.model().picker().is_open());

        type_text(&mut prog, "books");
        prog.send_and_drain(key(KeyCode::Enter));

        let applied = prog.model().applied().unwrap();
        assert_eq!(applied.value, "books15");
        assert!(!prog.model().picker().is_open());
        assert_eq!(prog.model().picker().search_query(), "");
        assert_eq!(prog.model().picker().selected(), Some(applied));

        let screen = prog.render_string(60, 16);
        assert!(screen.contains("Applied: BOOKS15 -15"));
    }

    #[test]
    fn rejected_coupon_is_not_applied() {
        let mut prog = TestProgram::<CheckoutApp>::new(flags());
        prog.send_and_drain(key(KeyCode::Enter));
        type_text(&mut prog, "food");
        prog.send_and_drain(key(KeyCode::Enter));

        assert!(prog.model().applied().is_none());
        assert!(prog.model().picker().is_open());
        assert_eq!(prog.model().picker().search_query(), "food");
        assert!(prog.render_string(70, 16).contains("Minimum order not met"));
    }

    #[test]
    fn q_quits_only_while_closed() {
        let mut prog = TestProgram::<CheckoutApp>::new(flags());
        prog.send_and_drain(key(KeyCode::Enter));
        prog.send_and_drain(key(KeyCode::Char('q')));
        assert!(!prog.quit_requested());
        assert_eq!(prog.model().picker().search_query(), "q");

        prog.send_and_drain(key(KeyCode::Esc));
        prog.send_and_drain(key(KeyCode::Char('q')));
        assert!(prog.quit_requested());
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut prog = TestProgram::<CheckoutApp>::new(flags());
        prog.send_and_drain(key(KeyCode::Enter));
        prog.send_and_drain(Msg::Key(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL,
        )));
        assert!(prog.quit_requested());
    }

    #[test]
    fn paste_extends_query_when_open() {
        let mut prog = TestProgram::<CheckoutApp>::new(flags());
        prog.send_and_drain(Msg::Paste("ignored".into()));
        assert_eq!(prog.model().picker().search_query(), "");

        prog.send_and_drain(key(KeyCode::Enter));
        prog.send_and_drain(Msg::Paste("ship".into()));
        assert_eq!(prog.model().picker().search_query(), "ship");
        assert_eq!(prog.model().picker().display_list().len(), 1);
    }

    #[test]
    fn declares_terminal_and_keyboard_subscriptions() {
        let prog = TestProgram::<CheckoutApp>::new(flags());
        let ids = prog.declared_subscriptions();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids, prog.declared_subscriptions());
    }

    #[tokio::test]
    async fn focus_changes_publish_keyboard_signals() {
        let signals = KeyboardSignals::new();
        let mut shown = signals.listener(KeyboardEdge::Show).stream();
        let mut hidden = signals.listener(KeyboardEdge::Hide).stream();

        let mut prog = TestProgram::<CheckoutApp>::new(CheckoutFlags {
            signals: signals.clone(),
            ..flags()
        });
        prog.send_and_drain(Msg::FocusGained);
        assert_eq!(shown.next().await, Some(KeyboardEdge::Show));
        prog.send_and_drain(Msg::FocusLost);
        assert_eq!(hidden.next().await, Some(KeyboardEdge::Hide));
    }

    #[test]
    fn keyboard_messages_shrink_the_list() {
        let mut prog = TestProgram::<CheckoutApp>::new(flags());
        prog.send_and_drain(Msg::Picker(picker::Message::KeyboardShown));
        assert!(prog.model().picker().keyboard_visible());
        prog.send_and_drain(Msg::Picker(picker::Message::KeyboardHidden));
        assert!(!prog.model().picker().keyboard_visible());
    }
}
