//! Users. Read-only and cached until the session ends.

use kingyo_core::entities::User;

use crate::error::ClientError;
use crate::keys;
use crate::service::Kingyo;

impl Kingyo {
    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn list_users(&self) -> Result<Vec<User>, ClientError> {
        self.cached_get(&keys::users(), "users/").await
    }

    /// The signed-in user.
    ///
    /// # Errors
    ///
    /// Propagates transport and cache failures.
    pub async fn current_user(&self) -> Result<User, ClientError> {
        self.cached_get(&keys::current_user(), "users/me/").await
    }
}
