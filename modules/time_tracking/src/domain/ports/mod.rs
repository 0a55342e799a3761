use async_trait::async_trait;

use crate::contract::model::User;
use crate::domain::error::DatabaseError;

/// Port for resolving the principal behind the current request.
#[async_trait]
pub trait AuthDatabase: Send + Sync {
    /// Currently authenticated user, or `None` when the request carries no valid session.
    async fn get_logged_in_user(&self) -> Result<Option<User>, DatabaseError>;
}
