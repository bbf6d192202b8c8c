use crate::{EngineError, Registration, ResultEngine, User};

use super::{Engine, with_store};

impl Engine {
    /// Validate the sign-up form and store the account.
    ///
    /// Emails are unique regardless of case.
    pub async fn register_user(&self, registration: Registration) -> ResultEngine<User> {
        registration.validate()?;
        let email = registration.email.trim().to_lowercase();
        with_store!(self, write |store| {
            if store.users().iter().any(|user| user.email == email) {
                return Err(EngineError::ExistingKey(email));
            }
            let user = User {
                email,
                first_name: registration.first_name.trim().to_string(),
                last_name: registration.last_name.trim().to_string(),
                password: registration.password,
            };
            store.users_mut().push(user.clone());
            tracing::info!(email = %user.email, "registered user");
            Ok(user)
        })
    }

    /// Return the account matching `email` and `password`.
    ///
    /// Unknown email and wrong password give the same error.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> ResultEngine<User> {
        let email = email.trim().to_lowercase();
        with_store!(self, read |store| {
            store
                .users()
                .iter()
                .find(|user| user.email == email && user.password == password)
                .cloned()
                .ok_or_else(|| {
                    tracing::warn!(%email, "rejected credentials");
                    EngineError::InvalidCredentials
                })
        })
    }
}
