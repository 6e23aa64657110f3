//! Portal login.
//!
//! Every failure path returns the same `InvalidCredentials` error so the
//! response never reveals whether an email is registered. The unknown-email
//! path still pays for one hash derivation to keep timing symmetric.

use std::sync::Arc;

use crate::{
    db::RecordStore,
    models::{LoginRequest, LoginResponse},
    services::password,
    Error, Result,
};

pub struct AuthService {
    store: Arc<dyn RecordStore>,
    pbkdf2_iterations: u32,
}

impl AuthService {
    pub fn new(store: Arc<dyn RecordStore>, pbkdf2_iterations: u32) -> Self {
        Self {
            store,
            pbkdf2_iterations,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse> {
        let (email, candidate) = match (request.email, request.password) {
            (Some(email), Some(candidate)) if !email.is_empty() && !candidate.is_empty() => {
                (email, candidate)
            }
            _ => return Err(Error::InvalidCredentials),
        };

        let Some(patient) = self.store.get_patient_by_email(&email).await? else {
            password::burn_verification(&candidate, self.pbkdf2_iterations);
            return Err(Error::InvalidCredentials);
        };

        if !password::verify_password(
            &candidate,
            &patient.password_salt,
            &patient.password_hash,
            self.pbkdf2_iterations,
        ) {
            return Err(Error::InvalidCredentials);
        }

        Ok(LoginResponse {
            id: patient.id,
            first_name: patient.first_name,
            last_name: patient.last_name,
            email: patient.email,
        })
    }
}
