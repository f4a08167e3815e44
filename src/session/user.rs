//! Authenticated user record and role.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Role of the acting user as reported by the backend.
///
/// Unknown role strings are kept verbatim in [`Role::Other`] so they
/// survive a save/load cycle unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Customer,
    Partner,
    Admin,
    System,
    CustomerService,
    Other(String),
}

impl Role {
    /// Returns the wire representation of the role.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Customer => "customer",
            Self::Partner => "partner",
            Self::Admin => "admin",
            Self::System => "system",
            Self::CustomerService => "customer_service",
            Self::Other(raw) => raw,
        }
    }

    /// Whether the dashboard menu entry is shown for this role.
    #[must_use]
    pub const fn can_view_dashboard(&self) -> bool {
        matches!(self, Self::Partner | Self::Admin)
    }

    /// Whether webhook settings may be managed. Admin only.
    #[must_use]
    pub const fn can_manage_webhooks(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "customer" => Self::Customer,
            "partner" => Self::Partner,
            "admin" => Self::Admin,
            "system" => Self::System,
            "customer_service" => Self::CustomerService,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The user a session belongs to.
///
/// Login returns the core fields only; the profile endpoint fills in the
/// optional ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub permissions: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl User {
    /// Creates a user with only the fields returned by login.
    #[must_use]
    pub fn new(id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            role,
            permissions: BTreeSet::new(),
            name: None,
            phone: None,
            nationality: None,
            date_of_birth: None,
            is_active: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Adds a permission.
    #[must_use]
    pub fn with_permission(mut self, permission: impl Into<String>) -> Self {
        self.permissions.insert(permission.into());
        self
    }

    /// Returns true if the user holds the named permission.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}
