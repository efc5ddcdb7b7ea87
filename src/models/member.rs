use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of roles a member can hold at an event. Anything else is
/// rejected at the intake boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Participant,
    Volunteer,
    Organizer,
    Supervisor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Participant => "Participant",
            Role::Volunteer => "Volunteer",
            Role::Organizer => "Organizer",
            Role::Supervisor => "Supervisor",
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Participant" => Ok(Role::Participant),
            "Volunteer" => Ok(Role::Volunteer),
            "Organizer" => Ok(Role::Organizer),
            "Supervisor" => Ok(Role::Supervisor),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An approved member holding a durable verification ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub user_name: String,
    pub father_name: String,
    pub cnic: String,
    pub event: String,
    pub role: Role,
    pub approved: bool,
    pub created_at: String,
}

/// A submitted registration awaiting review. `id` is the opaque storage
/// key assigned at submission time, not a verification ID.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMember {
    #[serde(rename = "id")]
    pub key: String,
    pub user_name: String,
    pub father_name: String,
    pub cnic: String,
    pub event: String,
    pub role: Role,
    pub submitted_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMember {
    pub user_name: String,
    pub father_name: String,
    pub cnic: String,
    pub role: Role,
    pub event: Option<String>,
}

/// Partial update for a member or pending registration. Identity and
/// approval state are never part of a patch.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMember {
    pub user_name: Option<String>,
    pub father_name: Option<String>,
    pub cnic: Option<String>,
    pub event: Option<String>,
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_known_variants() {
        assert_eq!("Participant".parse(), Ok(Role::Participant));
        assert_eq!("Volunteer".parse(), Ok(Role::Volunteer));
        assert_eq!("Organizer".parse(), Ok(Role::Organizer));
        assert_eq!("Supervisor".parse(), Ok(Role::Supervisor));
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        assert!("participant".parse::<Role>().is_err());
        assert!("Admin".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_member_serializes_camel_case() {
        let member = Member {
            id: "GES101".to_string(),
            user_name: "Ali".to_string(),
            father_name: "Khan".to_string(),
            cnic: "11111-1111111-1".to_string(),
            event: "Cleanup".to_string(),
            role: Role::Volunteer,
            approved: true,
            created_at: "2024-08-15T00:00:00".to_string(),
        };
        let json = serde_json::to_value(&member).unwrap();
        assert_eq!(json["userName"], "Ali");
        assert_eq!(json["fatherName"], "Khan");
        assert_eq!(json["role"], "Volunteer");
        assert_eq!(json["approved"], true);
    }

    #[test]
    fn test_pending_member_key_serializes_as_id() {
        let pending = PendingMember {
            key: "abc-123".to_string(),
            user_name: "Sana".to_string(),
            father_name: "Javed".to_string(),
            cnic: "42201-4567890-4".to_string(),
            event: String::new(),
            role: Role::Participant,
            submitted_at: "2024-08-15T00:00:00".to_string(),
        };
        let json = serde_json::to_value(&pending).unwrap();
        assert_eq!(json["id"], "abc-123");
        assert!(json.get("key").is_none());
    }
}
