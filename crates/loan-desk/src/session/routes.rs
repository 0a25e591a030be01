use super::context::Session;
use super::role::Role;

/// Navigable pages of the loan desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Home,
    Login,
    Signup,
    Dashboard,
    CustomerDashboard,
    LoanApplication,
    ApplicationStatus,
    AnalystDashboard,
    AdminDashboard,
    AdminUsers,
    AdminLoans,
}

impl AppRoute {
    pub const ALL: [AppRoute; 11] = [
        AppRoute::Home,
        AppRoute::Login,
        AppRoute::Signup,
        AppRoute::Dashboard,
        AppRoute::CustomerDashboard,
        AppRoute::LoanApplication,
        AppRoute::ApplicationStatus,
        AppRoute::AnalystDashboard,
        AppRoute::AdminDashboard,
        AppRoute::AdminUsers,
        AppRoute::AdminLoans,
    ];

    pub const fn path(self) -> &'static str {
        match self {
            AppRoute::Home => "/",
            AppRoute::Login => "/login",
            AppRoute::Signup => "/signup",
            AppRoute::Dashboard => "/dashboard",
            AppRoute::CustomerDashboard => "/customer",
            AppRoute::LoanApplication => "/loan-application",
            AppRoute::ApplicationStatus => "/application-status",
            AppRoute::AnalystDashboard => "/analyst",
            AppRoute::AdminDashboard => "/admin",
            AppRoute::AdminUsers => "/admin/users",
            AppRoute::AdminLoans => "/admin/loans",
        }
    }

    pub fn from_path(path: &str) -> Option<AppRoute> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|route| route.path() == normalized)
    }

    pub const fn dashboard_for(role: Role) -> AppRoute {
        match role {
            Role::Admin => AppRoute::AdminDashboard,
            Role::Analyst => AppRoute::AnalystDashboard,
            Role::Customer => AppRoute::CustomerDashboard,
        }
    }
}

/// Who may render a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Public,
    AnySession,
    Roles(Vec<Role>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render,
    Redirect(AppRoute),
}

/// Declarative role to route table.
#[derive(Debug, Clone)]
pub struct RouteAccess {
    table: Vec<(AppRoute, Access)>,
}

impl RouteAccess {
    pub fn standard() -> Self {
        use AppRoute::*;
        use Role::*;

        Self {
            table: vec![
                (Home, Access::Public),
                (Login, Access::Public),
                (Signup, Access::Public),
                (Dashboard, Access::AnySession),
                (CustomerDashboard, Access::Roles(vec![Customer])),
                (LoanApplication, Access::Roles(vec![Customer])),
                (ApplicationStatus, Access::Roles(vec![Customer])),
                (AnalystDashboard, Access::Roles(vec![Analyst, Admin])),
                (AdminDashboard, Access::Roles(vec![Admin])),
                (AdminUsers, Access::Roles(vec![Admin])),
                (AdminLoans, Access::Roles(vec![Admin])),
            ],
        }
    }

    pub fn access(&self, route: AppRoute) -> Option<&Access> {
        self.table
            .iter()
            .find(|(candidate, _)| *candidate == route)
            .map(|(_, access)| access)
    }

    pub fn allows(&self, route: AppRoute, role: Option<Role>) -> bool {
        match (self.access(route), role) {
            (Some(Access::Public), _) => true,
            (Some(Access::AnySession), Some(_)) => true,
            (Some(Access::Roles(roles)), Some(role)) => roles.contains(&role),
            _ => false,
        }
    }

    pub fn resolve(&self, route: AppRoute, session: Option<&Session>) -> RouteDecision {
        if matches!(self.access(route), Some(Access::Public)) {
            return RouteDecision::Render;
        }
        let Some(session) = session else {
            return RouteDecision::Redirect(AppRoute::Login);
        };

        let home = AppRoute::dashboard_for(session.role);
        if route == AppRoute::Dashboard {
            return RouteDecision::Redirect(home);
        }
        if self.allows(route, Some(session.role)) || route == home {
            RouteDecision::Render
        } else {
            RouteDecision::Redirect(home)
        }
    }
}

impl Default for RouteAccess {
    fn default() -> Self {
        Self::standard()
    }
}
