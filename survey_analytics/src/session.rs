use crate::config::*;

/// Who is using the system. Passed explicitly to the operations that need it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Session {
    Unauthenticated,
    Authenticated(User),
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match self {
            Session::Authenticated(u) => Some(u),
            Session::Unauthenticated => None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user().map(|u| u.has_role("admin")).unwrap_or(false)
    }

    /// Returns the logged-in administrator, or the reason why the operation is refused.
    pub fn require_admin(&self) -> Result<&User, AnalyticsErrors> {
        match self {
            Session::Unauthenticated => Err(AnalyticsErrors::NotAuthenticated),
            Session::Authenticated(u) if u.has_role("admin") => Ok(u),
            Session::Authenticated(_) => Err(AnalyticsErrors::NotAuthorized),
        }
    }

    /// Where a user lands after logging in.
    pub fn landing_page(&self) -> &'static str {
        match self {
            Session::Unauthenticated => "/login",
            s if s.is_admin() => "/admindashboard",
            Session::Authenticated(_) => "/userdashboard",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(roles: &[&str]) -> User {
        User {
            id: "u1".to_string(),
            username: "hari".to_string(),
            email: "hari@example.org".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            created_at: None,
        }
    }

    #[test]
    fn roles_and_landing_pages() {
        let admin = Session::Authenticated(user(&["user", "admin"]));
        assert!(admin.is_admin());
        assert_eq!(admin.require_admin().map(|u| u.id.as_str()), Ok("u1"));
        assert_eq!(admin.landing_page(), "/admindashboard");

        let taker = Session::Authenticated(user(&["user"]));
        assert!(!taker.is_admin());
        assert_eq!(taker.require_admin(), Err(AnalyticsErrors::NotAuthorized));
        assert_eq!(taker.landing_page(), "/userdashboard");

        let nobody = Session::Unauthenticated;
        assert_eq!(nobody.user(), None);
        assert_eq!(nobody.require_admin(), Err(AnalyticsErrors::NotAuthenticated));
        assert_eq!(nobody.landing_page(), "/login");
    }
}
