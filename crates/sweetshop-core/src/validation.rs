//! # Validation Module
//!
//! Input validation rules for sweets and accounts.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (axum)                                       │
//! │  ├── JSON shape and types (deserialization)                            │
//! │  └── Missing-field checks with user-facing messages                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rules: lengths, formats, non-negative numbers            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0), CHECK (price_cents >= 0)                   │
//! │  └── UNIQUE (email)                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sweetshop_core::validation::{validate_quantity, validate_sweet_name};
//!
//! validate_sweet_name("Chocolate Truffle").unwrap();
//! validate_quantity(5).unwrap();
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 255;
pub const CATEGORY_MAX_LEN: usize = 100;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const EMAIL_MAX_LEN: usize = 255;

// =============================================================================
// String Validators
// =============================================================================

fn validate_length(field: &str, value: &str, min: usize, max: usize) -> ValidationResult<()> {
    let len = value.chars().count();

    if len == 0 {
        return Err(ValidationError::required(field));
    }
    if len < min {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min,
        });
    }
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a sweet's display name.
///
/// ## Rules
/// - 2 to 255 characters after trimming
///
/// ## Example
/// ```rust
/// use sweetshop_core::validation::validate_sweet_name;
///
/// assert!(validate_sweet_name("Toffee Candy").is_ok());
/// assert!(validate_sweet_name("A").is_err());
/// assert!(validate_sweet_name("   ").is_err());
/// ```
pub fn validate_sweet_name(name: &str) -> ValidationResult<()> {
    validate_length("name", name.trim(), NAME_MIN_LEN, NAME_MAX_LEN)
}

/// Validates a category label (1 to 100 characters).
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_length("category", category.trim(), 1, CATEGORY_MAX_LEN)
}

/// Validates a person's name for registration (2 to 255 characters).
pub fn validate_user_name(name: &str) -> ValidationResult<()> {
    validate_length("name", name.trim(), NAME_MIN_LEN, NAME_MAX_LEN)
}

/// Validates an email address.
///
/// A structural check only: one `@`, a non-empty local part, a dotted domain
/// and no whitespace. Deliverability is not checked.
///
/// ## Example
/// ```rust
/// use sweetshop_core::validation::validate_email;
///
/// assert!(validate_email("user@sweetshop.com").is_ok());
/// assert!(validate_email("invalid-email").is_err());
/// assert!(validate_email("a@b").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }
    if email.len() > EMAIL_MAX_LEN {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: EMAIL_MAX_LEN,
        });
    }

    let invalid = || ValidationError::invalid_format("email", "must be a valid email address");

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }

    Ok(())
}

/// Validates a plaintext password before hashing (at least 6 characters).
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: PASSWORD_MIN_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a purchase or restock amount.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Purchase dialog                                                        │
/// │                                                                         │
/// │  User enters quantity: 5                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → 400 "quantity must be positive"                  │
/// │       │                                                                 │
/// │       └── OK → conditional stock update                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a stored stock level, which may be zero.
pub fn validate_stock_level(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Validates a price. Zero is allowed (free samples).
///
/// ## Example
/// ```rust
/// use sweetshop_core::{money::Money, validation::validate_price};
///
/// assert!(validate_price(Money::from_cents(299)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-1)).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
