//! # Domain Types
//!
//! Core domain types used throughout the Sweet Shop.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Sweet       │   │      User       │   │      Role       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  User           │       │
//! │  │  name           │   │  email (unique) │   │  Admin          │       │
//! │  │  category       │   │  password_hash  │   └─────────────────┘       │
//! │  │  price_cents    │   │  name           │                              │
//! │  │  quantity ≥ 0   │   │  role           │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  NewSweet      - validated creation input                               │
//! │  SweetChanges  - validated partial update                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::auth::Principal;
use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    validate_category, validate_price, validate_stock_level, validate_sweet_name,
    ValidationResult,
};

// =============================================================================
// Role
// =============================================================================

/// Account role. A closed set; every authorization decision matches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer account. May browse and purchase.
    #[default]
    User,
    /// Shop administrator. May also create, edit, delete and restock.
    Admin,
}

impl Role {
    /// Returns the lowercase wire/database name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sweet
// =============================================================================

/// A sellable catalog entry.
///
/// `quantity` is the only field mutated by purchase/restock, and it is never
/// negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sweet {
    /// Unique identifier (UUID v4), assigned on creation.
    pub id: String,

    /// Display name, 2-255 characters.
    pub name: String,

    /// Free-form label used for filtering.
    pub category: String,

    /// Price in cents.
    pub price_cents: i64,

    /// Units in stock.
    pub quantity: i64,

    /// Optional description shown on the product card.
    pub description: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Sweet {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether at least one unit can be purchased.
    #[inline]
    pub fn is_in_stock(&self) -> bool {
        self.quantity > 0
    }
}

// =============================================================================
// New Sweet
// =============================================================================

/// Input for creating a sweet. Built by the API layer from the request body.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSweet {
    pub name: String,
    pub category: String,
    pub price: Money,
    pub quantity: i64,
    pub description: Option<String>,
}

impl NewSweet {
    /// Checks every field and normalises whitespace.
    ///
    /// Names and categories are trimmed; an empty description becomes `None`.
    pub fn validated(self) -> ValidationResult<Self> {
        validate_sweet_name(&self.name)?;
        validate_category(&self.category)?;
        validate_price(self.price)?;
        validate_stock_level(self.quantity)?;

        Ok(NewSweet {
            name: self.name.trim().to_string(),
            category: self.category.trim().to_string(),
            price: self.price,
            quantity: self.quantity,
            description: normalize_description(self.description),
        })
    }
}

// =============================================================================
// Sweet Changes
// =============================================================================

/// Partial update of a sweet. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweetChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Money>,
    pub quantity: Option<i64>,
    pub description: Option<String>,
}

impl SweetChanges {
    /// Validates each supplied field with the same rules as creation.
    pub fn validated(self) -> ValidationResult<Self> {
        if let Some(name) = &self.name {
            validate_sweet_name(name)?;
        }
        if let Some(category) = &self.category {
            validate_category(category)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(quantity) = self.quantity {
            validate_stock_level(quantity)?;
        }

        Ok(SweetChanges {
            name: self.name.map(|n| n.trim().to_string()),
            category: self.category.map(|c| c.trim().to_string()),
            price: self.price,
            quantity: self.quantity,
            description: self.description.map(|d| d.trim().to_string()),
        })
    }

    /// True when the request carried no recognised field.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.description.is_none()
    }

    /// Applies the changes to an in-memory sweet.
    ///
    /// An empty description clears it.
    pub fn apply_to(&self, sweet: &mut Sweet) {
        if let Some(name) = &self.name {
            sweet.name = name.clone();
        }
        if let Some(category) = &self.category {
            sweet.category = category.clone();
        }
        if let Some(price) = self.price {
            sweet.price_cents = price.cents();
        }
        if let Some(quantity) = self.quantity {
            sweet.quantity = quantity;
        }
        if let Some(description) = &self.description {
            sweet.description = normalize_description(Some(description.clone()));
        }
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

// =============================================================================
// User
// =============================================================================

/// A registered account.
///
/// `password_hash` is never serialized; the type is safe to return as-is.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[ts(skip)]
    pub password_hash: String,
    pub name: String,
    pub role: Role,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// The identity carried in this user's bearer tokens.
    pub fn principal(&self) -> Principal {
        Principal {
            id: self.id.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Registration input after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
}

impl NewUser {
    /// Validates a self-service registration. The role is always `User`.
    pub fn registration(
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Self, ValidationError> {
        use crate::validation::{validate_email, validate_password, validate_user_name};

        validate_email(email)?;
        validate_password(password)?;
        validate_user_name(name)?;

        Ok(NewUser {
            email: email.trim().to_string(),
            password: password.to_string(),
            name: name.trim().to_string(),
            role: Role::User,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sweet() -> Sweet {
        let now = Utc::now();
        Sweet {
            id: "s-1".into(),
            name: "Chocolate Truffle".into(),
            category: "Chocolate".into(),
            price_cents: 299,
            quantity: 50,
            description: Some("Rich dark chocolate".into()),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::from_str::<Role>("\"user\"").unwrap(), Role::User);
        assert_eq!(Role::default(), Role::User);
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_new_sweet_trims_and_drops_blank_description() {
        let sweet = NewSweet {
            name: "  Gummy Bears ".into(),
            category: " Gummies".into(),
            price: Money::from_cents(199),
            quantity: 100,
            description: Some("   ".into()),
        }
        .validated()
        .unwrap();

        assert_eq!(sweet.name, "Gummy Bears");
        assert_eq!(sweet.category, "Gummies");
        assert_eq!(sweet.description, None);
    }

    #[test]
    fn test_new_sweet_rejects_negative_quantity_and_price() {
        let base = NewSweet {
            name: "Lollipop".into(),
            category: "Lollipops".into(),
            price: Money::from_cents(99),
            quantity: 1,
            description: None,
        };

        let mut bad_qty = base.clone();
        bad_qty.quantity = -1;
        assert!(bad_qty.validated().is_err());

        let mut bad_price = base;
        bad_price.price = Money::from_cents(-1);
        assert!(bad_price.validated().is_err());
    }

    #[test]
    fn test_changes_apply_only_supplied_fields() {
        let mut sweet = sample_sweet();
        let changes = SweetChanges {
            name: Some("Updated Sweet Name".into()),
            price: Some(Money::from_cents(249)),
            ..Default::default()
        }
        .validated()
        .unwrap();

        changes.apply_to(&mut sweet);

        assert_eq!(sweet.name, "Updated Sweet Name");
        assert_eq!(sweet.price_cents, 249);
        assert_eq!(sweet.category, "Chocolate");
        assert_eq!(sweet.quantity, 50);
    }

    #[test]
    fn test_changes_empty_description_clears() {
        let mut sweet = sample_sweet();
        SweetChanges {
            description: Some(String::new()),
            ..Default::default()
        }
        .apply_to(&mut sweet);
        assert_eq!(sweet.description, None);
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let now = Utc::now();
        let user = User {
            id: "u-1".into(),
            email: "test@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            name: "Test User".into(),
            role: Role::User,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "user");
        assert_eq!(json["email"], "test@example.com");
    }

    #[test]
    fn test_registration_always_user_role() {
        let new_user = NewUser::registration("a@example.com", "password123", "Alice").unwrap();
        assert_eq!(new_user.role, Role::User);
    }

    #[test]
    fn test_is_in_stock() {
        let mut sweet = sample_sweet();
        assert!(sweet.is_in_stock());
        sweet.quantity = 0;
        assert!(!sweet.is_in_stock());
    }
}
