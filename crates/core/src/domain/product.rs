use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned ids start at 1. Zero and negative values are representable
/// so any integer path segment parses, but they never name a product.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: f64,
    pub quantity: u64,
}

/// Caller-supplied fields for a product that has not been assigned an id yet.
///
/// `quantity` is signed so that a negative request value reaches validation
/// instead of failing to deserialize.
#[derive(Clone, Debug, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub quantity: i64,
}

impl NewProduct {
    pub fn new(name: impl Into<String>, price: f64, quantity: i64) -> Self {
        Self { name: name.into(), price, quantity }
    }
}

impl Product {
    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }

    pub fn total_value(&self) -> f64 {
        self.price * self.quantity as f64
    }

    /// Price after a percentage discount. Percentages outside `0..=100`
    /// leave the price unchanged.
    pub fn apply_discount(&self, percent: f64) -> f64 {
        if !(0.0..=100.0).contains(&percent) {
            return self.price;
        }
        self.price * (1.0 - percent / 100.0)
    }
}
