// Request payloads sent to the board API
use crate::model::item::{ListId, Priority, UserId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input rejected before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("A title is required")]
    MissingTitle,
    #[error("A start date is required")]
    MissingStartDate,
    #[error("An end date is required")]
    MissingEndDate,
    #[error("End date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("The {0} field is required")]
    MissingField(&'static str),
    #[error("Your profile has no company; users cannot be created")]
    MissingCompany,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewBoard {
    pub title: String,
    pub priority: Priority,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl NewBoard {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        let start = self.start_date.ok_or(ValidationError::MissingStartDate)?;
        let end = self.end_date.ok_or(ValidationError::MissingEndDate)?;
        if end < start {
            return Err(ValidationError::EndBeforeStart { start, end });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BoardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewList {
    pub title: String,
}

impl NewList {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.trim().to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ListPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCard {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewCard {
    /// Splits `"title // description"` quick input. A blank description is dropped.
    pub fn from_input(input: &str) -> Self {
        let (title, description) = match input.split_once("//") {
            Some((t, d)) => (t, Some(d.trim().to_string())),
            None => (input, None),
        };
        Self {
            title: title.trim().to_string(),
            description: description.filter(|d| !d.is_empty()),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of the `move/` endpoint. Without a position the server appends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoveCard {
    pub list_id: ListId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MemberChange {
    pub user_id: UserId,
}

#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

// Keep the password out of logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Body of `register/`. New users join the company of whoever creates them.
#[derive(Clone, Default, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    pub role: String,
    pub company_id: Option<u64>,
}

impl NewUser {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("username", &self.username),
            ("password", &self.password),
            ("full_name", &self.full_name),
            ("email", &self.email),
            ("role", &self.role),
        ];
        if let Some((name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(ValidationError::MissingField(*name));
        }
        if self.company_id.is_none() {
            return Err(ValidationError::MissingCompany);
        }
        Ok(())
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("username", &self.username)
            .field("password", &"***")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("company_id", &self.company_id)
            .finish()
    }
}

/// Partial profile edit for `users/{id}/`. An absent password is left unchanged.
#[derive(Clone, Default, PartialEq, Serialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl std::fmt::Debug for UserPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPatch")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_board_requires_title_and_dates() {
        let mut draft = NewBoard {
            title: "  ".into(),
            priority: Priority::High,
            start_date: Some(date(2025, 1, 1)),
            end_date: Some(date(2025, 2, 1)),
        };
        assert_eq!(draft.validate(), Err(ValidationError::MissingTitle));

        draft.title = "Alpha".into();
        assert_eq!(draft.validate(), Ok(()));

        draft.start_date = None;
        assert_eq!(draft.validate(), Err(ValidationError::MissingStartDate));

        draft.start_date = Some(date(2025, 1, 1));
        draft.end_date = None;
        assert_eq!(draft.validate(), Err(ValidationError::MissingEndDate));
    }

    #[test]
    fn test_new_board_rejects_inverted_range() {
        let draft = NewBoard {
            title: "Alpha".into(),
            priority: Priority::Low,
            start_date: Some(date(2025, 3, 1)),
            end_date: Some(date(2025, 2, 1)),
        };
        assert!(matches!(
            draft.validate(),
            Err(ValidationError::EndBeforeStart { .. })
        ));
    }

    #[test]
    fn test_new_card_quick_input() {
        let card = NewCard::from_input("Write docs // for the API ");
        assert_eq!(card.title, "Write docs");
        assert_eq!(card.description.as_deref(), Some("for the API"));

        let bare = NewCard::from_input("Ship it //  ");
        assert_eq!(bare.description, None);
        assert!(NewCard::from_input("   ").validate().is_err());
    }

    #[test]
    fn test_move_payload_omits_missing_position() {
        let body = MoveCard {
            list_id: ListId(4),
            position: None,
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"list_id":4}"#);
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let c = Credentials {
            username: "ana".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{:?}", c).contains("hunter2"));
    }

    #[test]
    fn test_new_user_requires_fields_and_company() {
        let mut user = NewUser {
            username: "bia".into(),
            password: "pw".into(),
            full_name: "Bia Lima".into(),
            email: "bia@example.com".into(),
            role: "dev".into(),
            ..NewUser::default()
        };
        assert_eq!(user.validate(), Err(ValidationError::MissingCompany));

        user.company_id = Some(3);
        assert_eq!(user.validate(), Ok(()));

        user.email = " ".into();
        assert_eq!(user.validate(), Err(ValidationError::MissingField("email")));
        assert!(!format!("{:?}", user).contains("pw"));
    }

    #[test]
    fn test_user_patch_is_partial() {
        let patch = UserPatch {
            role: Some("lead".into()),
            ..UserPatch::default()
        };
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"role":"lead"}"#);
    }
}
