//! Data models for merit badge event registration.
//!
//! This module contains the entities exchanged with the registration API:
//!
//! - `User`, `Profile`, `Role`: accounts and their permissions
//! - `Scout`: a scout owned by a coordinator
//! - `Event`, `Badge`, `Offering`: what is taught, when and where
//! - `Registration`, `Assignment`, `Preference`: a scout's participation
//! - `Purchasable`, `Purchase`: optional items sold with a registration
//! - Report views: `OfferingAssignees`, `EventStats`, `CostSummary`

pub mod badge;
pub mod event;
pub mod price;
pub mod purchase;
pub mod registration;
pub mod report;
pub mod scout;
pub mod user;

pub use badge::{Badge, BadgeInput, BadgeUpdate, Offering, OfferingInput, OfferingUpdate};
pub use event::{CurrentEventRequest, Event, EventInput, EventUpdate, Semester};
pub use price::Price;
pub use purchase::{
    Purchasable, PurchasableInput, PurchasableUpdate, Purchase, PurchaseInput, PurchaseUpdate, Size,
};
pub use registration::{
    Assignment, AssignmentInput, AssignmentUpdate, Completions, Preference, PreferenceInput,
    PreferenceUpdate, Registration, RegistrationInput,
};
pub use report::{
    AssignedScout, CostSummary, EventStats, IncomeSummary, OfferingAssignees, RegistrationDetail,
};
pub use scout::{Scout, ScoutInput, ScoutUpdate};
pub use user::{
    AuthResponse, Credentials, NewUser, Profile, ProfileUpdate, Role, SignupRequest, User,
    UserUpdate,
};
