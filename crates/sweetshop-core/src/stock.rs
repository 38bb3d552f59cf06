//! # Stock Operations
//!
//! Purchase and restock as pure arithmetic over a quantity.
//!
//! ## Invariant
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quantity >= 0, always                                                  │
//! │                                                                         │
//! │  Purchase(q):  q >= 1,  current >= q   →  current - q                  │
//! │                          current <  q   →  InsufficientStock            │
//! │                                                                         │
//! │  Restock(q):   q >= 1                   →  current + q                  │
//! │                          overflow       →  Validation(OutOfRange)       │
//! │                                                                         │
//! │  A failed operation leaves the quantity unchanged.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The database layer runs the same rule as a single conditional UPDATE
//! (`quantity >= required_stock()` and `quantity <= ceiling()`) so that
//! concurrent purchases against one sweet serialize correctly. When that
//! update matches no row, it re-reads the current quantity and calls
//! [`StockOperation::apply`] to produce the error the caller sees.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::Sweet;
use crate::validation::validate_quantity;

/// A requested stock mutation and its amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockOperation {
    /// Remove units (customer purchase).
    Purchase(i64),
    /// Add units (admin restock).
    Restock(i64),
}

/// Outcome of a successful stock mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockChange {
    pub previous_quantity: i64,
    pub new_quantity: i64,
    /// The amount purchased or restocked (always positive).
    pub amount: i64,
}

impl StockOperation {
    /// The requested amount, as supplied.
    #[inline]
    pub const fn amount(&self) -> i64 {
        match self {
            StockOperation::Purchase(q) | StockOperation::Restock(q) => *q,
        }
    }

    /// Rejects zero and negative amounts.
    pub fn validate(&self) -> CoreResult<()> {
        validate_quantity(self.amount())?;
        Ok(())
    }

    /// Signed change applied to the quantity.
    #[inline]
    pub const fn delta(&self) -> i64 {
        match self {
            StockOperation::Purchase(q) => q.saturating_neg(),
            StockOperation::Restock(q) => *q,
        }
    }

    /// Smallest current quantity for which the operation succeeds.
    #[inline]
    pub const fn required_stock(&self) -> i64 {
        match self {
            StockOperation::Purchase(q) => *q,
            StockOperation::Restock(_) => 0,
        }
    }

    /// Largest current quantity for which the operation succeeds.
    #[inline]
    pub const fn ceiling(&self) -> i64 {
        match self {
            StockOperation::Purchase(_) => i64::MAX,
            StockOperation::Restock(q) => i64::MAX.saturating_sub(*q),
        }
    }

    /// Computes the new quantity from `current`, or the reason it can't.
    ///
    /// ## Example
    /// ```rust
    /// use sweetshop_core::{CoreError, StockOperation};
    ///
    /// let change = StockOperation::Restock(10).apply(5).unwrap();
    /// assert_eq!(change.new_quantity, 15);
    ///
    /// let err = StockOperation::Purchase(6).apply(5).unwrap_err();
    /// assert!(matches!(err, CoreError::InsufficientStock { available: 5, requested: 6 }));
    /// ```
    pub fn apply(&self, current: i64) -> CoreResult<StockChange> {
        self.validate()?;

        let new_quantity = match *self {
            StockOperation::Purchase(q) => {
                if current < q {
                    return Err(CoreError::InsufficientStock {
                        available: current,
                        requested: q,
                    });
                }
                current - q
            }
            StockOperation::Restock(q) => {
                current.checked_add(q).ok_or(ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: 1,
                    max: i64::MAX.saturating_sub(current.max(0)),
                })?
            }
        };

        Ok(StockChange {
            previous_quantity: current,
            new_quantity,
            amount: self.amount(),
        })
    }
}

impl Sweet {
    /// Decrements stock in place. On error the sweet is untouched.
    pub fn purchase(&mut self, quantity: i64) -> CoreResult<StockChange> {
        self.apply_stock(StockOperation::Purchase(quantity))
    }

    /// Increments stock in place. On error the sweet is untouched.
    pub fn restock(&mut self, quantity: i64) -> CoreResult<StockChange> {
        self.apply_stock(StockOperation::Restock(quantity))
    }

    fn apply_stock(&mut self, op: StockOperation) -> CoreResult<StockChange> {
        let change = op.apply(self.quantity)?;
        self.quantity = change.new_quantity;
        Ok(change)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
