//! # Checkout Example
//!
//! Embeds `CouponPicker` in an order summary. The host owns the applied
//! coupon and the arithmetic; the picker only reports what was chosen.
//!
//! Run with: `cargo run --example checkout`

use coupon_select::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use coupon_select::ratatui::layout::{Constraint, Layout};
use coupon_select::ratatui::style::{Color, Modifier, Style};
use coupon_select::ratatui::text::{Line, Span};
use coupon_select::ratatui::widgets::Paragraph;
use coupon_select::ratatui::Frame;
use coupon_select::widgets::coupon::{ClassifiedCoupon, Coupon, CouponCollection};
use coupon_select::widgets::picker::{self, CouponPicker};
use coupon_select::{terminal_events, Command, Component, Model, Subscription, TerminalEvent};

const SUBTOTAL: f64 = 42.50;

fn coupons() -> CouponCollection {
    CouponCollection::new(
        vec![
            ClassifiedCoupon::applicable(Coupon::new("SAVE5", "Groceries", 5.0, "save5")),
            ClassifiedCoupon::applicable(Coupon::new("FRESH10", "Produce", 10.0, "fresh10")),
            ClassifiedCoupon::applicable(Coupon::new("SNACK2", "Snacks", 2.5, "snack2")),
        ],
        vec![
            ClassifiedCoupon::disabled(
                Coupon::new("BIGSHOP25", "Groceries", 25.0, "bigshop25"),
                Some("Spend $100 or more".into()),
            ),
            ClassifiedCoupon::disabled(Coupon::new("WINTER15", "Seasonal", 15.0, "winter15"), None),
        ],
    )
}

struct CartApp {
    picker: CouponPicker,
    discount: Option<ClassifiedCoupon>,
}

#[derive(Debug)]
enum Msg {
    Picker(picker::Message),
    Key(KeyEvent),
    Quit,
}

impl CartApp {
    fn total(&self) -> f64 {
        let off = self.discount.as_ref().map_or(0.0, |c| c.coupon.discount_amount);
        (SUBTOTAL - off).max(0.0)
    }
}

impl Model for CartApp {
    type Message = Msg;
    type Flags = ();

    fn init(_: ()) -> (Self, Command<Msg>) {
        let mut picker = CouponPicker::new(coupons());
        picker.focus();
        (
            CartApp {
                picker,
                discount: None,
            },
            Command::none(),
        )
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Picker(picker::Message::Selected(coupon)) => {
                self.picker.set_selected(Some(coupon.clone()));
                self.discount = Some(coupon);
                Command::none()
            }
            Msg::Picker(m) => self.picker.update(m).map(Msg::Picker),
            // Esc closes an open list before it quits.
            Msg::Key(key) if key.code == KeyCode::Esc && !self.picker.is_open() => Command::quit(),
            Msg::Key(key) => self
                .picker
                .update(picker::Message::KeyPress(key))
                .map(Msg::Picker),
            Msg::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [title_area, picker_area, _list_area, totals_area, help_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let title = Paragraph::new(Line::from(Span::styled(
            "Your cart",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(title, title_area);

        let totals = Paragraph::new(vec![
            Line::from(format!("Subtotal  ${SUBTOTAL:.2}")),
            Line::from(Span::styled(
                format!("Total     ${:.2}", self.total()),
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ]);
        frame.render_widget(totals, totals_area);

        let help = Paragraph::new(Span::styled(
            "enter open/choose · type to search · esc quit",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(help, help_area);

        self.picker.view(frame, picker_area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        vec![terminal_events(|ev| match ev {
            TerminalEvent::Key(key) if key.kind == KeyEventKind::Press => {
                match (key.code, key.modifiers) {
                    (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Some(Msg::Quit),
                    _ => Some(Msg::Key(key)),
                }
            }
            _ => None,
        })]
    }
}

#[coupon_select::tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cart = coupon_select::run::<CartApp>(()).await?;
    if let Some(ref coupon) = cart.discount {
        println!("{} applied, total ${:.2}", coupon.coupon.code, cart.total());
    }
    Ok(())
}
