use std::io::{self, BufRead, Write};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::shell::{Confirmer, Navigator, Notifier, Route};

/// Shell for the command-line front-end.
///
/// Navigation is recorded rather than acted on; the caller picks up the
/// pending route with [`TerminalShell::take_route`] and renders that view.
pub struct TerminalShell {
    assume_yes: bool,
    pending: Mutex<Option<Route>>,
}

impl TerminalShell {
    pub fn new(assume_yes: bool) -> Self {
        Self {
            assume_yes,
            pending: Mutex::new(None),
        }
    }

    pub fn take_route(&self) -> Option<Route> {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }
}

impl Navigator for TerminalShell {
    fn navigate(&self, route: Route) {
        info!("Navigating to {}", route);
        *self.pending.lock().unwrap_or_else(|e| e.into_inner()) = Some(route);
    }
}

impl Notifier for TerminalShell {
    fn notify(&self, text: &str, duration_ms: u64) {
        debug!("Notification ({}ms): {}", duration_ms, text);
        eprintln!("{}", text);
    }
}

impl Confirmer for TerminalShell {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        let mut stderr = io::stderr();
        let _ = write!(stderr, "{} [y/N] ", prompt);
        let _ = stderr.flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
