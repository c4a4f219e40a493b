use crate::model::notification::RecipientRole;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Role {
    Admin = 1,
    Hr = 2,
    Employee = 3,
    System = 4,
    ApiUser = 5,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Hr),
            3 => Some(Role::Employee),
            4 => Some(Role::System),
            5 => Some(Role::ApiUser),
            _ => None,
        }
    }

    /// Broadcast audience this role reads from.
    pub fn recipient_role(&self) -> RecipientRole {
        match self {
            Role::Admin | Role::Hr => RecipientRole::Admin,
            Role::Employee => RecipientRole::Staff,
            Role::System | Role::ApiUser => RecipientRole::All,
        }
    }
}
