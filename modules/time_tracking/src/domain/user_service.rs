use std::sync::Arc;

use crate::contract::model::User;
use crate::domain::error::DatabaseError;
use crate::domain::ports::AuthDatabase;

/// Thin seam between the time-tracking service and the auth backend.
#[derive(Clone)]
pub struct UserService {
    auth: Arc<dyn AuthDatabase>,
}

impl UserService {
    pub fn new(auth: Arc<dyn AuthDatabase>) -> Self {
        Self { auth }
    }

    pub async fn get_logged_in_user(&self) -> Result<Option<User>, DatabaseError> {
        self.auth.get_logged_in_user().await
    }
}
