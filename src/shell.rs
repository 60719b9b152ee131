//! Collaborators the view models call out to.
//!
//! The shell owns navigation, transient notifications and confirmation
//! prompts. View models only see these traits; the terminal front-end
//! provides [`terminal::TerminalShell`].

use std::fmt;

pub mod terminal;

/// Screens of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Products,
    NewProduct,
    EditProduct(String),
}

impl Route {
    /// Resolve a path; the empty path redirects to the dashboard.
    pub fn parse(path: &str) -> Option<Route> {
        let segments: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        match segments.as_slice() {
            [] | ["dashboard"] => Some(Route::Dashboard),
            ["products"] => Some(Route::Products),
            ["products", "new"] => Some(Route::NewProduct),
            ["products", id, "edit"] => Some(Route::EditProduct(id.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Dashboard => f.write_str("/dashboard"),
            Route::Products => f.write_str("/products"),
            Route::NewProduct => f.write_str("/products/new"),
            Route::EditProduct(id) => write!(f, "/products/{}/edit", id),
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

pub trait Notifier: Send + Sync {
    /// Show `text` for `duration_ms` milliseconds.
    fn notify(&self, text: &str, duration_ms: u64);
}

pub trait Confirmer: Send + Sync {
    /// Ask the user a yes/no question.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Everything a view model needs from the shell.
pub trait Shell: Navigator + Notifier + Confirmer {}

impl<T: Navigator + Notifier + Confirmer> Shell for T {}
