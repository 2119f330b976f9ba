//! Coupon data as handed over by the classification provider.
//!
//! The picker never decides eligibility: it renders whatever partition it
//! was given and compares selections by [`ClassifiedCoupon::value`].

use std::fmt;

/// A coupon's category. Only the name is read.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Category {
    pub name: String,
}

/// A promotional coupon.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coupon {
    /// Code shown to the user, e.g. `SAVE10`.
    pub code: String,
    pub category: Category,
    /// Display only; no arithmetic is done on it.
    pub discount_amount: f64,
    /// Unique identifier.
    pub value: String,
}

impl Coupon {
    pub fn new(
        code: impl Into<String>,
        category: impl Into<String>,
        discount_amount: f64,
        value: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            category: Category {
                name: category.into(),
            },
            discount_amount,
            value: value.into(),
        }
    }
}

/// Discount badge text: whole amounts without decimals, others with two.
pub fn discount_badge(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("-{amount:.0}")
    } else {
        format!("-{amount:.2}")
    }
}

/// A coupon plus the provider's verdict on it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "wire::ClassifiedCouponWire"))]
pub struct ClassifiedCoupon {
    pub coupon: Coupon,
    #[cfg_attr(feature = "serde", serde(rename = "isApplicable"))]
    pub is_applicable: bool,
    /// Why the coupon is unusable. Only meaningful when not applicable.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub reason: Option<String>,
    /// Key for the list row and for comparison against the selection.
    pub value: String,
}

impl ClassifiedCoupon {
    /// A coupon that can be selected.
    pub fn applicable(coupon: Coupon) -> Self {
        let value = coupon.value.clone();
        Self {
            coupon,
            is_applicable: true,
            reason: None,
            value,
        }
    }

    /// A coupon that is listed but cannot be selected.
    pub fn disabled(coupon: Coupon, reason: Option<String>) -> Self {
        let value = coupon.value.clone();
        Self {
            coupon,
            is_applicable: false,
            reason,
            value,
        }
    }

    /// Whether this row gets the "selected" indicator against the
    /// parent-owned `selected` coupon.
    pub fn is_selected_in(&self, selected: Option<&ClassifiedCoupon>) -> bool {
        self.is_applicable && selected.is_some_and(|s| s.value == self.value)
    }
}

impl fmt::Display for ClassifiedCoupon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {})",
            self.coupon.code,
            self.coupon.category.name,
            discount_badge(self.coupon.discount_amount)
        )
    }
}

#[cfg(feature = "serde")]
mod wire {
    use super::{ClassifiedCoupon, Coupon};

    /// Providers may omit the top-level `value`; it then mirrors the coupon's.
    #[derive(serde::Deserialize)]
    pub(super) struct ClassifiedCouponWire {
        coupon: Coupon,
        #[serde(rename = "isApplicable")]
        is_applicable: bool,
        #[serde(default)]
        reason: Option<String>,
        #[serde(default)]
        value: Option<String>,
    }

    impl From<ClassifiedCouponWire> for ClassifiedCoupon {
        fn from(wire: ClassifiedCouponWire) -> Self {
            let value = wire.value.unwrap_or_else(|| wire.coupon.value.clone());
            ClassifiedCoupon {
                coupon: wire.coupon,
                is_applicable: wire.is_applicable,
                reason: wire.reason,
                value,
            }
        }
    }
}

/// The provider's partition. Order inside each list is display order.
///
/// The two lists are expected to be disjoint; [`CouponCollection::new`]
/// logs a warning when they are not but keeps the data as given.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CouponCollection {
    pub applicable: Vec<ClassifiedCoupon>,
    pub disabled: Vec<ClassifiedCoupon>,
}

impl CouponCollection {
    pub fn new(applicable: Vec<ClassifiedCoupon>, disabled: Vec<ClassifiedCoupon>) -> Self {
        let collection = Self {
            applicable,
            disabled,
        };
        if let Some(value) = collection.overlap() {
            tracing::warn!(%value, "coupon listed as both applicable and disabled");
        }
        collection
    }

    /// Applicable coupons first, then disabled ones.
    pub fn base(&self) -> impl Iterator<Item = &ClassifiedCoupon> + '_ {
        self.applicable.iter().chain(self.disabled.iter())
    }

    pub fn len(&self) -> usize {
        self.applicable.len() + self.disabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applicable.is_empty() && self.disabled.is_empty()
    }

    /// First value present in both lists, if any.
    pub fn overlap(&self) -> Option<&str> {
        self.applicable
            .iter()
            .find(|a| self.disabled.iter().any(|d| d.value == a.value))
            .map(|a| a.value.as_str())
    }
}
