//! State machine behind the coupon dropdown.
//!
//! [`CouponSelect`] owns the open flag, the raw search query and the
//! informational keyboard flag. The parent owns the current selection; the
//! controller only reports what the user picked via [`SelectOutcome`].
//!
//! ```text
//!            toggle_open                 set/clear query, rejected attempt
//!   Closed ─────────────▶ Open ◀──────────────────────────────────────┐
//!      ▲                   │ └────────────────────────────────────────┘
//!      └───────────────────┘
//!        toggle_open, accepted attempt
//! ```

use crate::coupon::{ClassifiedCoupon, CouponCollection};
use crate::filter;

/// Notification shown for a disabled coupon without a usable reason.
pub const NOT_APPLICABLE_FALLBACK: &str = "This coupon is not applicable";

/// Result of [`CouponSelect::attempt_select`].
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    /// The coupon was accepted and must be handed to the selection consumer.
    Selected(ClassifiedCoupon),
    /// The coupon is disabled; show `message` to the user.
    Rejected { message: String },
}

/// Which empty state the list shows, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The provider supplied no coupons at all.
    NoCouponsAvailable,
    /// Coupons exist but none match the query.
    NoCouponsFound,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            EmptyState::NoCouponsAvailable => "No coupons available",
            EmptyState::NoCouponsFound => "No coupons found",
        }
    }
}

/// Open/closed state, search query and selection arbitration for one
/// mounted picker. A fresh controller starts closed with an empty query.
#[derive(Debug, Clone, Default)]
pub struct CouponSelect {
    coupons: CouponCollection,
    is_open: bool,
    search_query: String,
    keyboard_visible: bool,
}

impl CouponSelect {
    pub fn new(coupons: CouponCollection) -> Self {
        Self {
            coupons,
            ..Self::default()
        }
    }

    pub fn coupons(&self) -> &CouponCollection {
        &self.coupons
    }

    /// Replace the provider's collection. Open state and query are kept.
    pub fn set_coupons(&mut self, coupons: CouponCollection) {
        self.coupons = coupons;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn keyboard_visible(&self) -> bool {
        self.keyboard_visible
    }

    /// Record a keyboard show/hide notification. Idempotent.
    pub fn set_keyboard_visible(&mut self, visible: bool) {
        self.keyboard_visible = visible;
    }

    pub fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
        tracing::debug!(is_open = self.is_open, "coupon list toggled");
    }

    /// Store `text` verbatim; trimming only happens when filtering.
    pub fn set_search_query(&mut self, text: impl Into<String>) {
        self.search_query = text.into();
    }

    /// Empty the query without touching the open state.
    pub fn clear_search_query(&mut self) {
        self.search_query.clear();
    }

    /// Coupons to render for the current query.
    pub fn display_list(&self) -> Vec<&ClassifiedCoupon> {
        filter::display_list(&self.coupons, &self.search_query)
    }

    /// The empty state to render instead of rows, if the list is empty.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.coupons.is_empty() {
            Some(EmptyState::NoCouponsAvailable)
        } else if self.display_list().is_empty() {
            Some(EmptyState::NoCouponsFound)
        } else {
            None
        }
    }

    /// Accept an applicable coupon (closing the list and clearing the query)
    /// or reject a disabled one, leaving every piece of state untouched.
    pub fn attempt_select(&mut self, item: &ClassifiedCoupon) -> SelectOutcome {
        if item.is_applicable {
            self.is_open = false;
            self.search_query.clear();
            tracing::debug!(value = %item.value, "coupon selected");
            SelectOutcome::Selected(item.clone())
        } else {
            let message = rejection_message(item);
            tracing::debug!(value = %item.value, %message, "coupon rejected");
            SelectOutcome::Rejected { message }
        }
    }
}

/// The reason text, or the generic fallback when it is absent or blank.
pub fn rejection_message(item: &ClassifiedCoupon) -> String {
    item.reason
        .as_deref()
        .filter(|reason| !reason.trim().is_empty())
        .unwrap_or(NOT_APPLICABLE_FALLBACK)
        .to_string()
}
