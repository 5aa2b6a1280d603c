//! Session teardown on authentication loss.

use log::warn;

use crate::credentials::{CredentialStore, TOKEN_KEYS};
use crate::ui::Navigator;

/// Path of the login surface users are sent back to.
pub const LOGIN_PATH: &str = "/login";

/// Clears every persisted token key, then returns the user to the login
/// surface.
///
/// Idempotent: removing absent keys is a no-op and a redundant navigation
/// is harmless, so concurrent failed requests may all invoke this. Store
/// errors are logged rather than raised; the navigation happens regardless.
pub fn invalidate_session(store: &dyn CredentialStore, navigator: &dyn Navigator) {
    for key in TOKEN_KEYS {
        if let Err(e) = store.remove(key) {
            warn!("Failed to remove credential {}: {:#}", key, e);
        }
    }
    navigator.go_to(LOGIN_PATH);
}
