//! User registration.

use tracing::info;

use crate::store::{Registration, User};

use super::errors::{ServiceError, ServiceResult};
use super::service::Coordinator;

impl Coordinator {
    /// Register a user on first sight of their email
    pub fn register_user(&self, user: &User) -> ServiceResult<Registration> {
        if user.email.trim().is_empty() {
            return Err(ServiceError::BadRequest("email is required".to_string()));
        }

        let registration = self.users.register(user)?;
        if let Registration::Created(created) = &registration {
            info!(email = %created.email, "user registered");
        }
        Ok(registration)
    }
}
