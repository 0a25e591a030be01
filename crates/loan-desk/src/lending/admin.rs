//! Admin console payloads and the summaries derived from them.

use serde::{Deserialize, Serialize};

use crate::session::Role;

/// Headcounts reported by the metrics endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminMetrics {
    #[serde(default)]
    pub customers: u64,
    #[serde(default)]
    pub analysts: u64,
    #[serde(default)]
    pub admins: u64,
    #[serde(default)]
    pub loans: u64,
}

impl AdminMetrics {
    pub fn total_users(&self) -> u64 {
        self.customers + self.analysts + self.admins
    }

    /// Share of all users, in percent. Zero when there are no users.
    pub fn share_pct(&self, count: u64) -> f64 {
        let total = self.total_users();
        if total == 0 {
            return 0.0;
        }
        count as f64 / total as f64 * 100.0
    }

    pub fn role_count(&self, role: Role) -> u64 {
        match role {
            Role::Admin => self.admins,
            Role::Analyst => self.analysts,
            Role::Customer => self.customers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: u64,
    pub username: String,
    pub role: Role,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UserCounts {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
}

impl UserCounts {
    pub fn from_users(users: &[AdminUser]) -> Self {
        let active = users.iter().filter(|user| user.active).count();
        Self {
            total: users.len(),
            active,
            inactive: users.len() - active,
        }
    }
}

/// Server-side filter for the user directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserDirectoryFilter {
    pub role: Option<Role>,
}

impl UserDirectoryFilter {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        self.role
            .map(|role| vec![("role", role.as_str().to_string())])
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateActiveRequest {
    pub active: bool,
}
