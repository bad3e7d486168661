//! Navigation guards.

use crate::stores::user::UserStore;

pub const LOGIN_REQUIRED_MESSAGE: &str = "You need to be logged in to access this page.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(String),
}

/// Shows short messages to the user.
pub trait Notifier {
    fn notify(&self, message: &str);
}

pub fn require_login(user: &UserStore, notifier: &dyn Notifier) -> Navigation {
    if user.is_logged_in() {
        return Navigation::Proceed;
    }
    notifier.notify(LOGIN_REQUIRED_MESSAGE);
    Navigation::Redirect("/".to_string())
}

/// For pages that only make sense logged out, such as the login landing page.
pub fn redirect_if_logged_in(user: &UserStore, target: &str) -> Navigation {
    if user.is_logged_in() {
        Navigation::Redirect(target.to_string())
    } else {
        Navigation::Proceed
    }
}
