//! UI-facing capabilities: user notification and navigation.
//!
//! The failure classifier and the session invalidator talk to the user
//! interface only through these two traits, so the core stays independent
//! of any particular rendering or routing layer.

use log::{info, warn};

/// Shows a transient message to the user.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Moves the user to another surface of the application.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn go_to(&self, path: &str);
}

/// Notifier for headless callers; messages surface through the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        warn!("{}", message);
    }
}

/// Navigator for headless callers; navigation surfaces through the log.
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn go_to(&self, path: &str) {
        info!("Navigating to {}", path);
    }
}
