//! Session-stored identity of the signed-in user.

use core::fmt;

use cephas_core::{Role, UserId, access::Identity};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::api::LoginData;

/// Session-stored user identity.
///
/// Keeps the role exactly as the API sent it so a role the panel does not
/// know still signs in and lands on `/unauthorized`.
#[derive(Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User ID from the API.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Raw role string, if the API sent one.
    pub role: Option<String>,
    /// Bearer token for API calls made on the user's behalf.
    api_token: String,
}

impl CurrentUser {
    /// Build the session identity from a successful login.
    #[must_use]
    pub fn from_login(login: LoginData) -> Self {
        let email = login.user.email.unwrap_or_default();
        let name = login
            .user
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| email.clone());
        Self {
            id: login.user.id,
            name,
            email,
            role: login.user.role,
            api_token: login.token,
        }
    }

    /// The parsed role, if it names a known one.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role.as_deref().and_then(|r| r.parse().ok())
    }

    /// The user's bearer token.
    #[must_use]
    pub fn api_token(&self) -> SecretString {
        SecretString::from(self.api_token.clone())
    }

    /// Gate identity for this user.
    #[must_use]
    pub fn identity(&self) -> Identity {
        Identity::from_credentials(Some(&self.api_token), self.role.as_deref())
    }
}

impl fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CurrentUser")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("api_token", &"[REDACTED]")
            .finish()
    }
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current signed-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for a one-shot message shown on the next rendered page.
    pub const FLASH: &str = "flash";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::{Envelope, LoginData};

    fn login(role: &str) -> LoginData {
        let json = format!(
            r#"{{"data":{{"token":"abc","user":{{"_id":"u1","email":"ana@cephas.test","role":"{role}"}}}}}}"#
        );
        serde_json::from_str::<Envelope<LoginData>>(&json)
            .unwrap()
            .data
            .unwrap()
    }

    #[test]
    fn test_name_falls_back_to_email() {
        let user = CurrentUser::from_login(login("installer"));
        assert_eq!(user.name, "ana@cephas.test");
        assert_eq!(user.role(), Some(Role::Installer));
    }

    #[test]
    fn test_unknown_role_is_kept_raw() {
        let user = CurrentUser::from_login(login("manager"));
        assert_eq!(user.role.as_deref(), Some("manager"));
        assert_eq!(user.role(), None);
        assert!(user.identity().is_authenticated());
        assert_eq!(user.identity().role(), None);
    }

    #[test]
    fn test_debug_redacts_token() {
        let user = CurrentUser::from_login(login("warehouse"));
        let debug = format!("{user:?}");
        assert!(!debug.contains("abc"));
        assert!(debug.contains("[REDACTED]"));
    }
}
