use chrono::Utc;
use tracing::{debug, info};

use super::{normalize_email, required, Registry};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{Error, Result};
use crate::models::{
    AuthResponse, Credentials, Profile, ProfileUpdate, Role, SignupRequest, User, UserUpdate,
};
use crate::rules::access;

impl Registry {
    fn check_password_length(&self, password: &str) -> Result<()> {
        if password.chars().count() < self.config.min_password_length {
            return Err(Error::BadRequest(format!(
                "password must be at least {} characters",
                self.config.min_password_length
            )));
        }
        Ok(())
    }

    /// `POST /api/signup`
    pub async fn signup(&self, request: &SignupRequest) -> Result<AuthResponse> {
        let role = access::signup_role(request.role.as_deref())?;
        let email = normalize_email(&request.email)?;
        let firstname = required("firstname", &request.firstname)?;
        let lastname = required("lastname", &request.lastname)?;
        self.check_password_length(&request.password)?;
        let password_hash = hash_password(&request.password)?;

        let profile = {
            let mut state = self.state.write().await;
            if state.email_taken(&email, None) {
                return Err(Error::BadRequest(format!("email already in use: {}", email)));
            }
            let id = state.next_id();
            let user = User {
                id,
                email,
                password_hash,
                firstname,
                lastname,
                role,
                details: request.details.clone(),
                created_at: Utc::now(),
            };
            let profile = user.profile();
            state.users.insert(id, user);
            profile
        };

        info!(user_id = profile.id, role = %profile.role, "User signed up");
        let token = self.issue_token(profile.id).await?;
        Ok(AuthResponse { token, profile })
    }

    /// `POST /api/authenticate`
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse> {
        let email = credentials.email.trim().to_ascii_lowercase();
        let profile = {
            let state = self.state.read().await;
            let user = state
                .users
                .values()
                .find(|u| u.email == email)
                .filter(|u| verify_password(&credentials.password, &u.password_hash))
                .ok_or_else(|| Error::unauthorized("invalid email or password"))?;
            user.profile()
        };
        let token = self.issue_token(profile.id).await?;
        debug!(user_id = profile.id, "Authenticated");
        Ok(AuthResponse { token, profile })
    }

    /// `GET /api/profile`
    pub async fn profile(&self, token: Option<&str>) -> Result<Profile> {
        let caller = self.caller(token).await?;
        let state = self.state.read().await;
        Ok(state.user(caller.user_id)?.profile())
    }

    /// `PUT /api/profile`
    pub async fn update_profile(
        &self,
        token: Option<&str>,
        update: &ProfileUpdate,
    ) -> Result<Profile> {
        let caller = self.caller(token).await?;
        let new_hash = match update.password {
            Some(ref password) => {
                self.check_password_length(password)?;
                Some(hash_password(password)?)
            }
            None => None,
        };

        let mut state = self.state.write().await;
        if new_hash.is_some() {
            let current = update.current_password.as_deref().unwrap_or_default();
            if !verify_password(current, &state.user(caller.user_id)?.password_hash) {
                return Err(Error::unauthorized("current password is incorrect"));
            }
        }
        let email = match update.email {
            Some(ref email) => {
                let email = normalize_email(email)?;
                if state.email_taken(&email, Some(caller.user_id)) {
                    return Err(Error::BadRequest(format!("email already in use: {}", email)));
                }
                Some(email)
            }
            None => None,
        };
        let firstname = update.firstname.as_deref().map(|v| required("firstname", v)).transpose()?;
        let lastname = update.lastname.as_deref().map(|v| required("lastname", v)).transpose()?;

        let user = state
            .users
            .get_mut(&caller.user_id)
            .ok_or_else(|| Error::NotFound(format!("user {}", caller.user_id)))?;
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(firstname) = firstname {
            user.firstname = firstname;
        }
        if let Some(lastname) = lastname {
            user.lastname = lastname;
        }
        if let Some(ref details) = update.details {
            user.details = details.clone();
        }
        if let Some(hash) = new_hash {
            user.password_hash = hash;
        }
        Ok(user.profile())
    }

    /// `GET /api/users` (admin). Optionally filtered by role.
    pub async fn list_users(&self, token: Option<&str>, role: Option<Role>) -> Result<Vec<Profile>> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;
        let state = self.state.read().await;
        Ok(state
            .users
            .values()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .map(User::profile)
            .collect())
    }

    /// `PUT /api/users/:id` (admin). Unlike signup, this may grant admin.
    pub async fn update_user(
        &self,
        token: Option<&str>,
        user_id: i64,
        update: &UserUpdate,
    ) -> Result<Profile> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;

        let role = update
            .role
            .as_deref()
            .map(|r| r.parse::<Role>().map_err(Error::BadRequest))
            .transpose()?;
        let firstname = update.firstname.as_deref().map(|v| required("firstname", v)).transpose()?;
        let lastname = update.lastname.as_deref().map(|v| required("lastname", v)).transpose()?;

        let mut state = self.state.write().await;
        state.user(user_id)?;
        let email = match update.email {
            Some(ref email) => {
                let email = normalize_email(email)?;
                if state.email_taken(&email, Some(user_id)) {
                    return Err(Error::BadRequest(format!("email already in use: {}", email)));
                }
                Some(email)
            }
            None => None,
        };
        if let Some(role) = role {
            let owns_scouts = state.scouts.values().any(|s| s.user_id == user_id);
            if role != Role::Coordinator && owns_scouts {
                return Err(Error::bad_request(
                    "user owns scouts and must remain a coordinator",
                ));
            }
        }

        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| Error::NotFound(format!("user {}", user_id)))?;
        if let Some(email) = email {
            user.email = email;
        }
        if let Some(firstname) = firstname {
            user.firstname = firstname;
        }
        if let Some(lastname) = lastname {
            user.lastname = lastname;
        }
        if let Some(role) = role {
            user.role = role;
        }
        if let Some(ref details) = update.details {
            user.details = details.clone();
        }
        info!(user_id, role = %user.role, "User updated");
        Ok(user.profile())
    }

    /// `DELETE /api/users/:id` (admin). Removes the user's scouts and their
    /// registrations.
    pub async fn delete_user(&self, token: Option<&str>, user_id: i64) -> Result<()> {
        let caller = self.caller(token).await?;
        access::require_admin(&caller)?;
        if caller.user_id == user_id {
            return Err(Error::bad_request("admins cannot delete their own account"));
        }
        {
            let mut state = self.state.write().await;
            state.user(user_id)?;
            state.remove_user(user_id);
        }
        self.sessions.write().await.retain(|_, s| s.user_id != user_id);
        info!(user_id, "User deleted");
        Ok(())
    }
}
