use crate::config::PanelConfig;

/// Whether the current user may see the panel. Nothing is loaded or
/// computed until `authorized` is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub authorized: bool,
}

impl SessionContext {
    /// Single credential check against the configured pair.
    pub fn authenticate(config: &PanelConfig, username: &str, password: &str) -> Self {
        let authorized = username == config.username && password == config.password;
        if authorized {
            log::info!("User '{username}' signed in");
        } else {
            log::warn!("Rejected sign-in for '{username}'");
        }
        Self { authorized }
    }
}
