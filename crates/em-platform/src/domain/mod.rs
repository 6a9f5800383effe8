//! Domain Models
//!
//! Core domain entities of the event management platform.
//! All entities use UUID v4 string ids.

pub mod choices;
pub mod company;
pub mod event;
pub mod registration;
pub mod slug;
pub mod social;
pub mod user;
pub mod validation;

pub use choices::*;
pub use company::*;
pub use event::{Event, Schedule};
pub use registration::*;
pub use social::SocialMediaLink;
pub use user::*;
