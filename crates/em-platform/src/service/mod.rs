//! Service Layer
//!
//! Business rules on top of the repositories. Handlers call into these
//! services; nothing here knows about HTTP.

pub mod accounts;
pub mod admission;
pub mod auth;
pub mod authorization;
pub mod companies;
pub mod events;
pub mod password;
pub mod registrations;

pub use accounts::{AccountService, NewOrganizer, Profile, SignUp};
pub use admission::{AdmissionGuard, AdmissionLocks};
pub use auth::{extract_bearer_token, AccessTokenClaims, AuthConfig, AuthService, TokenPair};
pub use authorization::{checks, AuthContext, AuthorizationService};
pub use companies::{CompanyChanges, CompanyInput, CompanyService};
pub use events::{EventChanges, EventInput, EventService, EventView};
pub use password::{PasswordPolicy, PasswordService};
pub use registrations::{NewRegistration, RegistrationService};
