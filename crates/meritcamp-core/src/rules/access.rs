//! Role-based authorization checks.

use crate::error::{Error, Result};
use crate::models::Role;

/// The authenticated user behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i64,
    pub role: Role,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

pub fn require_admin(caller: &Caller) -> Result<()> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(Error::unauthorized("admin role required"))
    }
}

/// Admins and teachers
pub fn require_staff(caller: &Caller) -> Result<()> {
    if caller.role.is_staff() {
        Ok(())
    } else {
        Err(Error::unauthorized("admin or teacher role required"))
    }
}

/// The coordinator owning a scout, or an admin
pub fn require_owner_or_admin(caller: &Caller, owner_id: i64) -> Result<()> {
    if caller.is_admin() || (caller.role == Role::Coordinator && caller.user_id == owner_id) {
        Ok(())
    } else {
        Err(Error::unauthorized("not permitted to modify this scout"))
    }
}

/// The coordinator owning a scout, or staff
pub fn require_owner_or_staff(caller: &Caller, owner_id: i64) -> Result<()> {
    if caller.role.is_staff() || (caller.role == Role::Coordinator && caller.user_id == owner_id) {
        Ok(())
    } else {
        Err(Error::unauthorized("not permitted to view this scout"))
    }
}

/// Resolve the role requested at signup. Coordinator is the default; admin
/// accounts can only be created by an existing admin.
pub fn signup_role(requested: Option<&str>) -> Result<Role> {
    let role = match requested {
        None => return Ok(Role::Coordinator),
        Some(r) => r.parse::<Role>().map_err(Error::BadRequest)?,
    };
    if role == Role::Admin {
        return Err(Error::bad_request("invalid role: admin cannot be requested at signup"));
    }
    Ok(role)
}
