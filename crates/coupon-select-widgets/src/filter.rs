//! Query matching and the derived display list.
//!
//! The display list is never stored: it is a pure function of the coupon
//! collection and the raw query, recomputed whenever it is needed.

use crate::coupon::{ClassifiedCoupon, CouponCollection};

/// Trim and lowercase a raw query.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Whether `item`'s code or category name contains the normalized query.
pub fn matches_query(item: &ClassifiedCoupon, normalized: &str) -> bool {
    item.coupon.code.to_lowercase().contains(normalized)
        || item.coupon.category.name.to_lowercase().contains(normalized)
}

/// Items to render for `query`, applicable before disabled.
///
/// An empty query returns the whole collection. A non-empty query is
/// normalized first, so a whitespace-only query also matches everything.
/// Surviving items keep their relative order.
pub fn display_list<'a>(coupons: &'a CouponCollection, query: &str) -> Vec<&'a ClassifiedCoupon> {
    if query.is_empty() {
        return coupons.base().collect();
    }
    let needle = normalize_query(query);
    coupons
        .base()
        .filter(|item| matches_query(item, &needle))
        .collect()
}
