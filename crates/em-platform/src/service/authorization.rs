//! Authorization Service
//!
//! Resolves a validated token into an [`AuthContext`] carrying the user's
//! flags and profile ids, and provides the permission checks used by the
//! API handlers.

use std::sync::Arc;

use crate::domain::UserRole;
use crate::error::{PlatformError, Result};
use crate::repository::{OrganizerRepository, ParticipantRepository, UserRepository};
use crate::service::auth::AccessTokenClaims;

/// Who is making the request
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: String,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub participant_id: Option<String>,
    pub organizer_id: Option<String>,
}

impl AuthContext {
    pub fn is_staff(&self) -> bool {
        self.is_staff || self.is_superuser
    }

    pub fn is_superuser(&self) -> bool {
        self.is_superuser
    }

    pub fn is_participant(&self) -> bool {
        self.participant_id.is_some()
    }

    pub fn is_organizer(&self) -> bool {
        self.organizer_id.is_some()
    }

    /// Role resolved from the attached profile; organizer wins if both exist
    pub fn role(&self) -> Option<UserRole> {
        if self.is_organizer() {
            Some(UserRole::Organizer)
        } else if self.is_participant() {
            Some(UserRole::Participant)
        } else {
            None
        }
    }

    pub fn organizes(&self, organizer_id: &str) -> bool {
        self.organizer_id.as_deref() == Some(organizer_id)
    }
}

pub struct AuthorizationService {
    users: Arc<dyn UserRepository>,
    participants: Arc<dyn ParticipantRepository>,
    organizers: Arc<dyn OrganizerRepository>,
}

impl AuthorizationService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        participants: Arc<dyn ParticipantRepository>,
        organizers: Arc<dyn OrganizerRepository>,
    ) -> Self {
        Self {
            users,
            participants,
            organizers,
        }
    }

    pub async fn build_context(&self, claims: &AccessTokenClaims) -> Result<AuthContext> {
        let user = self
            .users
            .find_by_id(&claims.sub)
            .await?
            .ok_or_else(|| PlatformError::unauthorized("User not found"))?;

        if !user.is_active {
            return Err(PlatformError::unauthorized("User account is disabled"));
        }

        let participant = self.participants.find_by_user(&user.id).await?;
        let organizer = self.organizers.find_by_user(&user.id).await?;

        Ok(AuthContext {
            user_id: user.id,
            email: user.email,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            participant_id: participant.map(|p| p.id),
            organizer_id: organizer.map(|o| o.id),
        })
    }
}

/// Permission checks shared by the API handlers
pub mod checks {
    use super::AuthContext;
    use crate::error::{PlatformError, Result};

    pub fn require_staff(ctx: &AuthContext) -> Result<()> {
        if ctx.is_staff() {
            Ok(())
        } else {
            Err(PlatformError::forbidden(
                "You do not have permission to perform this action.",
            ))
        }
    }

    pub fn require_superuser(ctx: &AuthContext) -> Result<()> {
        if ctx.is_superuser() {
            Ok(())
        } else {
            Err(PlatformError::forbidden(
                "You do not have permission to perform this action.",
            ))
        }
    }

    pub fn can_create_events(ctx: &AuthContext) -> Result<()> {
        if ctx.is_staff() || ctx.is_organizer() {
            Ok(())
        } else {
            Err(PlatformError::forbidden("Only organizers or staff can create events."))
        }
    }

    /// Staff, or the organizer that owns the event
    pub fn can_manage_event(ctx: &AuthContext, event_organizer_id: &str) -> Result<()> {
        if ctx.is_staff() || ctx.organizes(event_organizer_id) {
            Ok(())
        } else {
            Err(PlatformError::forbidden(
                "You do not have permission to perform this action.",
            ))
        }
    }

    pub fn can_register(ctx: &AuthContext) -> Result<()> {
        if ctx.is_staff() || ctx.is_participant() {
            Ok(())
        } else {
            Err(PlatformError::forbidden(
                "Only participants or staff can register for events.",
            ))
        }
    }

    pub fn can_update_registrations(ctx: &AuthContext) -> Result<()> {
        if ctx.is_staff() || ctx.is_organizer() {
            Ok(())
        } else {
            Err(PlatformError::forbidden(
                "Only organizers or staff can update registrations.",
            ))
        }
    }

    /// Organizers may only touch registrations of their own events
    pub fn can_modify_registration(ctx: &AuthContext, event_organizer_id: &str) -> Result<()> {
        if ctx.is_organizer() && !ctx.organizes(event_organizer_id) && !ctx.is_staff() {
            return Err(PlatformError::forbidden(
                "You cannot modify registrations for this event.",
            ));
        }
        can_update_registrations(ctx)
    }
}
