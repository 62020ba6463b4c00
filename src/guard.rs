//! Route table and the navigation guard run before every page change.
//!
//! Every page except `/login` needs a session that has both a token and a
//! named profile. `/` is an alias for the solution assistant.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use crate::session::Session;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/web-solution-assistant";
const ROOT_PATH: &str = "/";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub path: &'static str,
    pub title: &'static str,
    pub requires_auth: bool,
}

pub const ROUTES: [Route; 4] = [
    Route { name: "login", path: LOGIN_PATH, title: "Log in", requires_auth: false },
    Route { name: "web-solution-assistant", path: HOME_PATH, title: "Generate article", requires_auth: true },
    Route { name: "history", path: "/history", title: "Generation history", requires_auth: true },
    Route { name: "model-config", path: "/model-config", title: "Model configuration", requires_auth: true },
];

/// Outcome of a navigation check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(&'static str),
}

/// Route registered at `path`, ignoring query, fragment and trailing slash.
#[must_use]
pub fn resolve(path: &str) -> Option<&'static Route> {
    let path = normalize(path);
    ROUTES.iter().find(|route| route.path == path)
}

/// Decide whether navigation to `to` may proceed for `session`.
///
/// Paths outside the route table proceed untouched.
#[must_use]
pub fn before_each(to: &str, session: &Session) -> Navigation {
    let path = normalize(to);
    if path == ROOT_PATH {
        return match check(HOME_PATH, session) {
            Navigation::Proceed => Navigation::Redirect(HOME_PATH),
            redirect @ Navigation::Redirect(_) => redirect,
        };
    }
    check(path, session)
}

fn check(path: &str, session: &Session) -> Navigation {
    let authenticated = session.is_authenticated();
    let requires_auth = ROUTES.iter().any(|route| route.path == path && route.requires_auth);

    if requires_auth && !authenticated {
        Navigation::Redirect(LOGIN_PATH)
    } else if path == LOGIN_PATH && authenticated {
        Navigation::Redirect(HOME_PATH)
    } else {
        Navigation::Proceed
    }
}

fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { ROOT_PATH } else { trimmed }
}
