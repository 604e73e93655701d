//! Session gate in front of the editor views
//!
//! The gate is cosmetic: the credential pair is compiled in and compared as
//! plain text. [`AuthPolicy`] is the seam for swapping in real authentication.

use log::{info, warn};

const ADMIN_EMAIL: &str = "info@fareapp.it";
const ADMIN_PASSWORD: &str = "123456";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Decides whether a credential pair unlocks the panel.
pub trait AuthPolicy: Send + Sync {
    fn validate(&self, credentials: &Credentials) -> bool;
}

/// Exact match against one fixed pair
#[derive(Debug, Clone)]
pub struct FixedCredentials {
    email: String,
    password: String,
}

impl Default for FixedCredentials {
    fn default() -> Self {
        Self {
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        }
    }
}

impl AuthPolicy for FixedCredentials {
    fn validate(&self, credentials: &Credentials) -> bool {
        credentials.email == self.email && credentials.password == self.password
    }
}

/// Which screen of the panel is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Login,
    /// Chatbot prompt editor, the home view after login
    Prompt,
    Templates,
    Branding,
    Publish,
}

/// Per-open session state: current view and the login error flag.
#[derive(Debug, Clone, Default)]
pub struct Session {
    view: View,
    login_error: bool,
}

impl Session {
    pub fn view(&self) -> View {
        self.view
    }

    pub fn login_error(&self) -> bool {
        self.login_error
    }

    pub fn is_authenticated(&self) -> bool {
        self.view != View::Login
    }

    /// Back to the login screen; done every time the panel opens.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn login(&mut self, policy: &dyn AuthPolicy, credentials: &Credentials) -> bool {
        if policy.validate(credentials) {
            info!("[auth] Admin unlocked");
            self.view = View::Prompt;
            self.login_error = false;
            true
        } else {
            warn!("[auth] Rejected login for {}", credentials.email);
            self.login_error = true;
            false
        }
    }

    /// Switches editor view. Returns `false` while locked or when asked to
    /// go back to the login screen.
    pub fn navigate(&mut self, view: View) -> bool {
        if !self.is_authenticated() || view == View::Login {
            return false;
        }
        self.view = view;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_exact_pair_unlocks() {
        let policy = FixedCredentials::default();
        let attempts = [
            ("info@fareapp.it", "123456", true),
            ("INFO@fareapp.it", "123456", false),
            ("info@fareapp.it", "1234567", false),
            ("info@fareapp.it ", "123456", false),
            ("", "", false),
        ];
        for (email, password, expected) in attempts {
            let mut session = Session::default();
            let ok = session.login(&policy, &Credentials::new(email, password));
            assert_eq!(ok, expected, "{email:?}/{password:?}");
            assert_eq!(session.login_error(), !expected);
            let expected_view = if expected { View::Prompt } else { View::Login };
            assert_eq!(session.view(), expected_view);
        }
    }

    #[test]
    fn success_clears_a_previous_error() {
        let policy = FixedCredentials::default();
        let mut session = Session::default();
        session.login(&policy, &Credentials::new("x", "y"));
        assert!(session.login_error());
        session.login(&policy, &Credentials::new("info@fareapp.it", "123456"));
        assert!(!session.login_error());
    }

    #[test]
    fn navigation_requires_login() {
        let mut session = Session::default();
        assert!(!session.navigate(View::Templates));
        session.login(
            &FixedCredentials::default(),
            &Credentials::new("info@fareapp.it", "123456"),
        );
        assert!(session.navigate(View::Publish));
        assert!(!session.navigate(View::Login));
        assert_eq!(session.view(), View::Publish);
        session.reset();
        assert_eq!(session.view(), View::Login);
    }
}
