//! Widgets for the **coupon-select** checkout picker.
//!
//! The centerpiece is [`picker::CouponPicker`], a [`coupon_select_core::Component`]
//! that renders a searchable dropdown of pre-classified coupons. Its state
//! machine lives in [`controller::CouponSelect`] and can be driven without
//! any rendering.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`coupon`] | Coupon, classification and collection types |
//! | [`filter`] | Query normalization and the derived display list |
//! | [`controller`] | Open/query state and selection arbitration |
//! | [`picker`] | The dropdown component |
//! | [`search_field`] | Cursor handling for the query line |
//! | [`highlight`] | Highlighted-row cursor with scrolling |
//! | [`notice`] | Transient user-facing notifications |
//! | [`key`] | Key bindings and help text |
//! | [`text`] | Width-aware truncation |

pub mod controller;
pub mod coupon;
pub mod filter;
pub mod highlight;
pub mod key;
pub mod notice;
pub mod picker;
pub mod search_field;
pub mod text;
