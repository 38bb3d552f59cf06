//! # Authorization Gate
//!
//! Decides whether a request may run an operation, given who is asking.
//!
//! ## Decision Table
//! ```text
//! ┌──────────────┬─────────────────┬─────────────┬─────────────┐
//! │ OperationKind│ no principal    │ Role::User  │ Role::Admin │
//! ├──────────────┼─────────────────┼─────────────┼─────────────┤
//! │ Read         │ allow           │ allow       │ allow       │
//! │ Purchase     │ Unauthenticated │ allow       │ allow       │
//! │ AdminWrite   │ Unauthenticated │ Forbidden   │ allow       │
//! └──────────────┴─────────────────┴─────────────┴─────────────┘
//! ```
//!
//! The gate runs before any state is read or written. A rejected request has
//! no side effects.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::types::Role;

/// The authenticated identity attached to a request.
///
/// Produced by the API layer after verifying a bearer token; the core never
/// sees tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub role: Role,
}

impl Principal {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Operation classes, as seen by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Listing, searching and fetching sweets.
    Read,
    /// Buying units of a sweet.
    Purchase,
    /// Create, update, delete and restock.
    AdminWrite,
}

impl OperationKind {
    pub const ALL: [OperationKind; 3] = [
        OperationKind::Read,
        OperationKind::Purchase,
        OperationKind::AdminWrite,
    ];
}

/// Checks `principal` against the table above.
///
/// ## Example
/// ```rust
/// use sweetshop_core::{authorize, CoreError, OperationKind, Principal, Role};
///
/// let user = Principal { id: "u1".into(), email: "u@x.com".into(), role: Role::User };
///
/// assert!(authorize(Some(&user), OperationKind::Purchase).is_ok());
/// assert!(matches!(
///     authorize(None, OperationKind::Purchase),
///     Err(CoreError::Unauthenticated)
/// ));
/// assert!(authorize(None, OperationKind::Read).is_ok());
/// assert!(matches!(
///     authorize(Some(&user), OperationKind::AdminWrite),
///     Err(CoreError::Forbidden)
/// ));
/// ```
pub fn authorize(principal: Option<&Principal>, op: OperationKind) -> CoreResult<()> {
    match (op, principal) {
        (OperationKind::Read, _) => Ok(()),
        (_, None) => Err(CoreError::Unauthenticated),
        (OperationKind::Purchase, Some(_)) => Ok(()),
        (OperationKind::AdminWrite, Some(p)) => match p.role {
            Role::Admin => Ok(()),
            Role::User => Err(CoreError::Forbidden),
        },
    }
}
