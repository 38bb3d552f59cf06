//! # Catalog Filter
//!
//! Search predicates over sweets. All supplied predicates are ANDed; an
//! empty filter matches everything.
//!
//! | Field       | Match                              |
//! |-------------|------------------------------------|
//! | `name`      | substring, ASCII case-insensitive  |
//! | `category`  | exact, ASCII case-insensitive      |
//! | `min_price` | `price >= min_price`               |
//! | `max_price` | `price <= max_price`               |
//!
//! The SQLite repository builds the same predicate in SQL; [`SweetFilter::matches`]
//! is the reference used by tests and in-memory callers.

use crate::money::Money;
use crate::types::Sweet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweetFilter {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
}

impl SweetFilter {
    /// Drops blank text predicates so `?name=` behaves like no `name` at all.
    pub fn normalized(self) -> Self {
        let non_blank = |s: String| {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        };

        SweetFilter {
            name: self.name.and_then(non_blank),
            category: self.category.and_then(non_blank),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// True when `min_price > max_price`, which can match nothing.
    pub fn is_unsatisfiable(&self) -> bool {
        matches!((self.min_price, self.max_price), (Some(min), Some(max)) if min > max)
    }

    pub fn matches(&self, sweet: &Sweet) -> bool {
        if let Some(name) = &self.name {
            if !sweet.name.to_ascii_lowercase().contains(&name.to_ascii_lowercase()) {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if !sweet.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }

        let price = sweet.price();
        if self.min_price.is_some_and(|min| price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| price > max) {
            return false;
        }

        true
    }
}
