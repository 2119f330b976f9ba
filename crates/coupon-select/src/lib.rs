//! **coupon-select** -- a searchable coupon dropdown for terminal checkouts.
//!
//! This is the umbrella crate: it re-exports the runtime from
//! [`coupon_select_core`] at the crate root and the picker widgets under
//! [`widgets`], and hosts the pieces of the `coupon-select` binary.
//!
//! # Re-exports
//!
//! * All public items from [`coupon_select_core`] ([`Model`], [`Component`],
//!   [`Command`], [`Subscription`], [`KeyboardSignals`], [`Program`],
//!   [`run`], [`run_with`], etc.).
//! * The [`widgets`] module re-exports everything from
//!   [`coupon_select_widgets`].
//! * [`ratatui`], [`crossterm`], and [`tokio`] so hosts do not need to
//!   depend on them directly.
//!
//! # Embedding the picker
//!
//! ```ignore
//! use coupon_select::widgets::picker::{self, CouponPicker};
//! use coupon_select::{Command, Component, KeyboardSignals};
//!
//! let signals = KeyboardSignals::new();
//! let mut picker = CouponPicker::new(coupons).with_keyboard_signals(signals.clone());
//! picker.focus();
//!
//! // in update():
//! Msg::Picker(picker::Message::Selected(coupon)) => {
//!     picker.set_selected(Some(coupon.clone()));
//!     self.applied = Some(coupon);
//!     Command::none()
//! }
//! ```

pub mod app;
pub mod cli;
pub mod load;

pub use coupon_select_core::*;
pub mod widgets {
    pub use coupon_select_widgets::*;
}

pub use crossterm;
pub use ratatui;
pub use tokio;
