//! Searchable dropdown for choosing a coupon at checkout.
//!
//! The picker renders a one-line header (the applied coupon or a
//! placeholder) inside a bordered box and, while open, an overlay below it
//! with the search line, the coupon rows and an optional notification.
//!
//! Selection is reported upward, never applied locally: an accepted coupon
//! produces [`Message::Selected`], and the parent is expected to record it
//! and hand it back through [`CouponPicker::set_selected`]. A disabled
//! coupon produces [`Message::Rejected`] with the text that was shown.
//!
//! ```ignore
//! use coupon_select_widgets::picker::{self, CouponPicker};
//!
//! let mut picker = CouponPicker::new(coupons).with_keyboard_signals(signals.clone());
//! picker.focus();
//!
//! // In the parent's update():
//! match msg {
//!     Msg::Picker(picker::Message::Selected(coupon)) => {
//!         picker.set_selected(Some(coupon.clone()));
//!         self.applied = Some(coupon);
//!         Command::none()
//!     }
//!     Msg::Picker(m) => self.picker.update(m).map(Msg::Picker),
//! }
//! ```

use crate::controller::{CouponSelect, SelectOutcome};
use crate::coupon::{discount_badge, ClassifiedCoupon, CouponCollection};
use crate::highlight::Highlight;
use crate::key::PickerKeyMap;
use crate::notice::NoticeSlot;
use crate::search_field::{Edit, SearchField, SearchFieldStyle};
use crate::text::{display_width, truncate};
use coupon_select_core::command::Command;
use coupon_select_core::component::Component;
use coupon_select_core::subscription::Subscription;
use coupon_select_core::subscriptions::{keyboard_visibility, KeyboardEdge, KeyboardSignals};
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use std::time::Duration;

/// Messages for the picker.
#[derive(Debug, Clone)]
pub enum Message {
    /// A key press forwarded by the parent.
    KeyPress(KeyEvent),
    /// The header was activated.
    Toggle,
    /// Replace the search query.
    SetQuery(String),
    /// Empty the search query.
    ClearQuery,
    /// Try to select a coupon from the displayed list.
    Attempt(ClassifiedCoupon),
    /// The platform keyboard became visible.
    KeyboardShown,
    /// The platform keyboard was dismissed.
    KeyboardHidden,
    /// A notification timer elapsed (notice generation).
    NoticeExpired(u64),
    /// Emitted once per accepted coupon.
    Selected(ClassifiedCoupon),
    /// Emitted when a disabled coupon was chosen, with the text shown.
    Rejected(String),
}

/// Behavioral options.
#[derive(Debug, Clone)]
pub struct PickerOptions {
    /// Header text while nothing is selected.
    pub placeholder: String,
    /// Title drawn in the header border.
    pub title: String,
    /// Rows shown before the list scrolls.
    pub max_visible: usize,
    /// Rows shown while the on-screen keyboard takes up space.
    pub max_visible_with_keyboard: usize,
    /// How long a rejection notice stays visible.
    pub notice_duration: Duration,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            placeholder: "Select coupon...".to_string(),
            title: " Coupon ".to_string(),
            max_visible: 6,
            max_visible_with_keyboard: 3,
            notice_duration: Duration::from_secs(3),
        }
    }
}

/// Visual style.
#[derive(Debug, Clone)]
pub struct PickerStyle {
    pub border: Style,
    pub border_focused: Style,
    pub header: Style,
    pub placeholder: Style,
    pub arrow: Style,
    pub item: Style,
    pub highlighted: Style,
    pub disabled: Style,
    pub badge: Style,
    pub locked: Style,
    pub reason: Style,
    pub selected_marker: Style,
    pub empty: Style,
    pub notice: Style,
    pub search: SearchFieldStyle,
}

impl Default for PickerStyle {
    fn default() -> Self {
        Self {
            border: Style::default().fg(Color::DarkGray),
            border_focused: Style::default().fg(Color::Cyan),
            header: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            arrow: Style::default().fg(Color::DarkGray),
            item: Style::default(),
            highlighted: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            disabled: Style::default().fg(Color::DarkGray),
            badge: Style::default().fg(Color::Green),
            locked: Style::default().fg(Color::Red),
            reason: Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            selected_marker: Style::default().fg(Color::Green),
            empty: Style::default().fg(Color::DarkGray),
            notice: Style::default().fg(Color::Yellow),
            search: SearchFieldStyle {
                prompt: Style::default().fg(Color::Yellow),
                text: Style::default(),
                cursor: Style::default().add_modifier(Modifier::REVERSED),
                hint: Style::default().fg(Color::DarkGray),
            },
        }
    }
}

const LOCKED: &str = "locked";
const SELECTED_MARK: &str = "✓";
const HIGHLIGHT_MARK: &str = "▸ ";
const COLUMN_GAP: &str = "  ";
const REASON_SEP: &str = " · ";
/// Columns a disabled row keeps for its reason before the code is cut.
const REASON_MIN_WIDTH: usize = 8;

/// The coupon dropdown component.
pub struct CouponPicker {
    controller: CouponSelect,
    selected: Option<ClassifiedCoupon>,
    field: SearchField,
    highlight: Highlight,
    notices: NoticeSlot,
    keymap: PickerKeyMap,
    options: PickerOptions,
    style: PickerStyle,
    keyboard: Option<KeyboardSignals>,
    focus: bool,
}

impl CouponPicker {
    pub fn new(coupons: CouponCollection) -> Self {
        let options = PickerOptions::default();
        let mut picker = Self {
            controller: CouponSelect::new(coupons),
            selected: None,
            field: SearchField::new(),
            highlight: Highlight::new(options.max_visible),
            notices: NoticeSlot::new(),
            keymap: PickerKeyMap::default(),
            options,
            style: PickerStyle::default(),
            keyboard: None,
            focus: false,
        };
        picker.refresh_rows();
        picker
    }

    pub fn with_options(mut self, options: PickerOptions) -> Self {
        self.options = options;
        self.refresh_rows();
        self
    }

    pub fn with_style(mut self, style: PickerStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_keymap(mut self, keymap: PickerKeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Listen to keyboard show/hide notifications from `signals` while the
    /// picker's subscriptions are declared.
    pub fn with_keyboard_signals(mut self, signals: KeyboardSignals) -> Self {
        self.keyboard = Some(signals);
        self
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    pub fn blur(&mut self) {
        self.focus = false;
    }

    pub fn keymap(&self) -> &PickerKeyMap {
        &self.keymap
    }

    pub fn controller(&self) -> &CouponSelect {
        &self.controller
    }

    pub fn is_open(&self) -> bool {
        self.controller.is_open()
    }

    pub fn search_query(&self) -> &str {
        self.controller.search_query()
    }

    pub fn keyboard_visible(&self) -> bool {
        self.controller.keyboard_visible()
    }

    /// The current notification text, if one is showing.
    pub fn notice(&self) -> Option<&str> {
        self.notices.current()
    }

    /// Index of the highlighted row within [`display_list`](Self::display_list).
    pub fn highlighted(&self) -> usize {
        self.highlight.index()
    }

    pub fn display_list(&self) -> Vec<&ClassifiedCoupon> {
        self.controller.display_list()
    }

    /// The parent's current selection, as last handed in.
    pub fn selected(&self) -> Option<&ClassifiedCoupon> {
        self.selected.as_ref()
    }

    /// Mirror the parent-owned selection. Only used for rendering.
    pub fn set_selected(&mut self, selected: Option<ClassifiedCoupon>) {
        self.selected = selected;
    }

    /// Replace the coupon collection, e.g. after the cart changed and the
    /// provider re-classified.
    pub fn set_coupons(&mut self, coupons: CouponCollection) {
        self.controller.set_coupons(coupons);
        self.refresh_rows();
    }

    fn visible_rows(&self) -> usize {
        if self.controller.keyboard_visible() {
            self.options.max_visible_with_keyboard
        } else {
            self.options.max_visible
        }
        .max(1)
    }

    /// Re-sync the highlight with the derived list.
    fn refresh_rows(&mut self) {
        let count = self.controller.display_list().len();
        self.highlight.set_visible(self.visible_rows());
        self.highlight.set_count(count);
    }

    fn set_query(&mut self, text: String) {
        self.controller.set_search_query(text);
        self.refresh_rows();
        self.highlight.select(0);
    }

    fn toggle(&mut self) {
        self.controller.toggle_open();
        if self.controller.is_open() {
            self.refresh_rows();
            let current = self.selected.as_ref().and_then(|selected| {
                self.controller
                    .display_list()
                    .iter()
                    .position(|item| item.value == selected.value)
            });
            self.highlight.select(current.unwrap_or(0));
        }
    }

    fn set_keyboard(&mut self, visible: bool) -> Command<Message> {
        self.controller.set_keyboard_visible(visible);
        self.refresh_rows();
        Command::none()
    }

    fn attempt(&mut self, item: ClassifiedCoupon) -> Command<Message> {
        match self.controller.attempt_select(&item) {
            SelectOutcome::Selected(coupon) => {
                self.field.move_to_end("");
                self.notices.clear();
                self.refresh_rows();
                self.highlight.select(0);
                Command::message(Message::Selected(coupon))
            }
            SelectOutcome::Rejected { message } => {
                let generation = self.notices.post(message.clone());
                Command::batch([
                    Command::message(Message::Rejected(message)),
                    Command::tick(self.options.notice_duration, move |_| {
                        Message::NoticeExpired(generation)
                    }),
                ])
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        if !self.controller.is_open() {
            if self.keymap.open.matches(&key) {
                self.toggle();
            }
            return Command::none();
        }

        if self.keymap.close.matches(&key) {
            self.toggle();
        } else if self.keymap.up.matches(&key) {
            self.highlight.move_up();
        } else if self.keymap.down.matches(&key) {
            self.highlight.move_down();
        } else if self.keymap.choose.matches(&key) {
            let item = self
                .controller
                .display_list()
                .get(self.highlight.index())
                .map(|item| (*item).clone());
            if let Some(item) = item {
                return self.attempt(item);
            }
        } else if self.keymap.clear.matches(&key) {
            self.field.move_to_end("");
            self.set_query(String::new());
        } else if let Edit::Changed(next) = self.field.edit(self.controller.search_query(), &key) {
            self.set_query(next);
        }
        Command::none()
    }

    fn header_line(&self) -> Line<'static> {
        let arrow = if self.controller.is_open() { " ▾" } else { " ▸" };
        let mut spans = match &self.selected {
            Some(coupon) => vec![
                Span::styled(coupon.coupon.code.clone(), self.style.header.add_modifier(Modifier::BOLD)),
                Span::styled(format!(" · {}", coupon.coupon.category.name), self.style.header),
                Span::raw("  "),
                Span::styled(discount_badge(coupon.coupon.discount_amount), self.style.badge),
            ],
            None => vec![Span::styled(self.options.placeholder.clone(), self.style.placeholder)],
        };
        spans.push(Span::styled(arrow, self.style.arrow));
        Line::from(spans)
    }

    fn row_line(&self, item: &ClassifiedCoupon, highlighted: bool, width: usize) -> Line<'static> {
        let base = match (item.is_applicable, highlighted) {
            (true, true) => self.style.highlighted,
            (true, false) => self.style.item,
            (false, true) => self.style.disabled.add_modifier(Modifier::BOLD),
            (false, false) => self.style.disabled,
        };
        let muted = |style: Style| if item.is_applicable { style } else { self.style.disabled };

        let marker = if highlighted { HIGHLIGHT_MARK } else { "  " };
        let badge = discount_badge(item.coupon.discount_amount);
        let (trailer, trailer_style) = if item.is_applicable {
            let mark = if item.is_selected_in(self.selected.as_ref()) {
                format!("  {SELECTED_MARK}")
            } else {
                String::new()
            };
            (mark, self.style.selected_marker)
        } else {
            (format!("  {LOCKED}"), self.style.locked)
        };
        let reason = item
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|reason| !item.is_applicable && !reason.is_empty());

        // Marker, badge and trailer always fit. Code, category and reason
        // share what is left, with the category given up first.
        let fixed = display_width(marker)
            + display_width(&badge)
            + display_width(&trailer)
            + 2 * COLUMN_GAP.len()
            + reason.map_or(0, |_| display_width(REASON_SEP));
        let mut room = width.saturating_sub(fixed);
        let reason_width = reason.map_or(0, display_width);
        let reserved = reason_width.min(REASON_MIN_WIDTH);
        let code_cols = display_width(&item.coupon.code).min(room.saturating_sub(reserved));
        room -= code_cols;
        let category_cols =
            display_width(&item.coupon.category.name).min(room.saturating_sub(reserved));
        room -= category_cols;

        let mut spans = vec![
            Span::styled(marker, base),
            Span::styled(truncate(&item.coupon.code, code_cols, "…"), base.add_modifier(Modifier::BOLD)),
        ];
        if category_cols > 0 {
            let category = truncate(&item.coupon.category.name, category_cols, "…");
            spans.push(Span::styled(format!("{COLUMN_GAP}{category}{COLUMN_GAP}"), base));
        } else {
            spans.push(Span::styled(COLUMN_GAP, base));
        }
        spans.push(Span::styled(badge, muted(self.style.badge)));
        if !trailer.is_empty() {
            spans.push(Span::styled(trailer, trailer_style));
        }
        if let Some(reason) = reason {
            spans.push(Span::styled(REASON_SEP, self.style.reason));
            spans.push(Span::styled(truncate(reason, room.min(reason_width), "…"), self.style.reason));
        }
        Line::from(spans)
    }

    fn view_list(&self, frame: &mut Frame, anchor: Rect) {
        let items = self.controller.display_list();
        let rows = items.len().clamp(1, self.highlight.visible());
        let notice = self.notices.current();
        let wanted = 2 + 1 + rows as u16 + u16::from(notice.is_some());

        let y = anchor.y.saturating_add(anchor.height);
        let available = frame.area().bottom().saturating_sub(y);
        let area = Rect::new(anchor.x, y, anchor.width, wanted.min(available));
        if area.height < 3 || area.width < 8 {
            return; // not enough space
        }

        frame.render_widget(Clear, area);
        let block = Block::new()
            .borders(Borders::ALL)
            .border_style(self.style.border_focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut lines = vec![self.field.line(self.controller.search_query(), &self.style.search)];
        match self.controller.empty_state() {
            Some(empty) => lines.push(Line::from(Span::styled(empty.message(), self.style.empty))),
            None => {
                let offset = self.highlight.offset();
                for (i, item) in items.iter().enumerate().skip(offset).take(rows) {
                    let highlighted = i == self.highlight.index();
                    lines.push(self.row_line(item, highlighted, inner.width as usize));
                }
            }
        }

        // The notice takes the last row even when the list had to be cut.
        let body_rows = inner.height as usize;
        if let Some(text) = notice {
            lines.truncate(body_rows.saturating_sub(1));
            lines.push(Line::from(Span::styled(text.to_string(), self.style.notice)));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

impl Component for CouponPicker {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus => self.handle_key(key),
            Message::KeyPress(_) => Command::none(),
            Message::Toggle => {
                self.toggle();
                Command::none()
            }
            Message::SetQuery(text) => {
                self.field.move_to_end(&text);
                self.set_query(text);
                Command::none()
            }
            Message::ClearQuery => {
                self.field.move_to_end("");
                self.set_query(String::new());
                Command::none()
            }
            Message::Attempt(item) => self.attempt(item),
            Message::KeyboardShown => self.set_keyboard(true),
            Message::KeyboardHidden => self.set_keyboard(false),
            Message::NoticeExpired(generation) => {
                self.notices.expire(generation);
                Command::none()
            }
            Message::Selected(_) | Message::Rejected(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let border = if self.focus {
            self.style.border_focused
        } else {
            self.style.border
        };
        let block = Block::new()
            .borders(Borders::ALL)
            .title(self.options.title.as_str())
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Paragraph::new(self.header_line()), inner);

        if self.controller.is_open() {
            self.view_list(frame, area);
        }
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        match &self.keyboard {
            Some(signals) => keyboard_visibility(signals, |edge| match edge {
                KeyboardEdge::Show => Message::KeyboardShown,
                KeyboardEdge::Hide => Message::KeyboardHidden,
            }),
            None => vec![],
        }
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
