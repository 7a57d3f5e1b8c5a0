//! Member record model and the partial draft used by create/update requests.

use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::errors::AppError;

/// A directory member as stored and served by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub teams: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_no: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publications: Option<Vec<Publication>>,
}

/// A publication entry on a member profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub title: String,
    pub journal: String,
    pub year: i32,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

/// Request body for creating or updating a member.
///
/// Every field is optional on the wire; which ones must be present depends on
/// the operation and is checked by [`MemberDraft::validate_create`] and
/// [`MemberDraft::validate_update`]. An empty string counts as missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teams: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publications: Option<Vec<Publication>>,
}

impl MemberDraft {
    /// Validate the create contract.
    ///
    /// Required fields are checked in a fixed order (name, username, email,
    /// role, status) and the first missing one decides the error message.
    /// Provided teams must come from the fixed vocabulary.
    pub fn validate_create(&self) -> Result<(), AppError> {
        require(&self.name, "name")?;
        require(&self.username, "username")?;
        require(&self.email, "email")?;
        require(&self.role, "role")?;
        require(&self.status, "status")?;
        check_teams(self.teams.as_deref().unwrap_or(&[]))
    }

    /// Validate the update contract and return the addressed id.
    ///
    /// The id leads the check order; the remaining required fields follow the
    /// create order. An id of zero counts as missing.
    pub fn validate_update(&self) -> Result<i64, AppError> {
        let id = match self.id {
            Some(id) if id != 0 => id,
            _ => return Err(AppError::Validation("id is required".to_string())),
        };
        self.validate_create()?;
        Ok(id)
    }

    /// Build the stored record under a freshly assigned id.
    ///
    /// Only meaningful after [`MemberDraft::validate_create`] has passed.
    pub fn into_member(self, id: i64) -> Member {
        Member {
            id,
            name: self.name.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            role: self.role.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
            avatar: self.avatar,
            teams: self.teams.unwrap_or_default(),
            date_of_birth: self.date_of_birth,
            gender: self.gender,
            nationality: self.nationality,
            contact_no: self.contact_no,
            work_email: self.work_email,
            publications: self.publications,
        }
    }
}

impl Member {
    /// Merge a draft over this record, field by field.
    ///
    /// Fields absent from the draft keep their stored value; the id never
    /// changes.
    pub fn merged_with(&self, draft: &MemberDraft) -> Member {
        Member {
            id: self.id,
            name: draft.name.as_ref().unwrap_or(&self.name).clone(),
            username: draft.username.as_ref().unwrap_or(&self.username).clone(),
            email: draft.email.as_ref().unwrap_or(&self.email).clone(),
            role: draft.role.as_ref().unwrap_or(&self.role).clone(),
            status: draft.status.as_ref().unwrap_or(&self.status).clone(),
            avatar: draft.avatar.clone().or(self.avatar.clone()),
            teams: draft.teams.clone().unwrap_or(self.teams.clone()),
            date_of_birth: draft.date_of_birth.clone().or(self.date_of_birth.clone()),
            gender: draft.gender.clone().or(self.gender.clone()),
            nationality: draft.nationality.clone().or(self.nationality.clone()),
            contact_no: draft.contact_no.clone().or(self.contact_no.clone()),
            work_email: draft.work_email.clone().or(self.work_email.clone()),
            publications: draft.publications.clone().or(self.publications.clone()),
        }
    }

    /// Texts the free-text search runs over.
    ///
    /// Every top-level field is stringified: numbers and booleans via their
    /// display form, arrays of strings joined with commas. Nested records
    /// (publications) stay out of the search surface.
    pub fn search_texts(&self) -> Vec<String> {
        let Ok(serde_json::Value::Object(fields)) = serde_json::to_value(self) else {
            return Vec::new();
        };
        fields.values().filter_map(value_text).collect()
    }
}

impl From<Member> for MemberDraft {
    /// A fully populated draft, the starting point of an edit form.
    fn from(member: Member) -> Self {
        MemberDraft {
            id: Some(member.id),
            name: Some(member.name),
            username: Some(member.username),
            email: Some(member.email),
            role: Some(member.role),
            status: Some(member.status),
            avatar: member.avatar,
            teams: Some(member.teams),
            date_of_birth: member.date_of_birth,
            gender: member.gender,
            nationality: member.nationality,
            contact_no: member.contact_no,
            work_email: member.work_email,
            publications: member.publications,
        }
    }
}

fn require(value: &Option<String>, field: &str) -> Result<(), AppError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(AppError::Validation(format!("{} is required", field))),
    }
}

/// Check every provided team against the fixed vocabulary.
pub fn check_teams(teams: &[String]) -> Result<(), AppError> {
    match teams.iter().find(|team| !catalog::is_team(team)) {
        Some(unknown) => Err(AppError::Validation(format!("unknown team: {}", unknown))),
        None => Ok(()),
    }
}

fn value_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .filter_map(value_text)
                .collect::<Vec<_>>()
                .join(","),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_draft() -> MemberDraft {
        MemberDraft {
            name: Some("Amy Ito".to_string()),
            username: Some("amy".to_string()),
            email: Some("amy@edunova.io".to_string()),
            role: Some("Software Engineer".to_string()),
            status: Some("Active".to_string()),
            teams: Some(vec!["Engineering".to_string(), "Product".to_string()]),
            ..MemberDraft::default()
        }
    }

    #[test]
    fn test_create_validation_checks_fields_in_order() {
        let mut draft = MemberDraft::default();
        for field in ["name", "username", "email", "role", "status"] {
            let err = draft.validate_create().unwrap_err();
            assert_eq!(err.message(), format!("{} is required", field));
            match field {
                "name" => draft.name = Some("Amy Ito".to_string()),
                "username" => draft.username = Some("amy".to_string()),
                "email" => draft.email = Some("amy@edunova.io".to_string()),
                "role" => draft.role = Some("Software Engineer".to_string()),
                "status" => draft.status = Some("Active".to_string()),
                _ => unreachable!(),
            }
        }
        assert!(draft.validate_create().is_ok());
    }

    #[test]
    fn test_empty_string_counts_as_missing() {
        let mut draft = full_draft();
        draft.username = Some(String::new());
        let err = draft.validate_create().unwrap_err();
        assert_eq!(err.message(), "username is required");
    }

    #[test]
    fn test_unknown_team_rejected() {
        let mut draft = full_draft();
        draft.teams = Some(vec!["Engineering".to_string(), "Gardening".to_string()]);
        let err = draft.validate_create().unwrap_err();
        assert_eq!(err.message(), "unknown team: Gardening");
    }

    #[test]
    fn test_absent_or_empty_teams_accepted() {
        let mut draft = full_draft();
        draft.teams = None;
        assert!(draft.validate_create().is_ok());
        draft.teams = Some(Vec::new());
        assert!(draft.validate_create().is_ok());
    }

    #[test]
    fn test_update_requires_nonzero_id_first() {
        let mut draft = MemberDraft::default();
        assert_eq!(draft.validate_update().unwrap_err().message(), "id is required");
        draft.id = Some(0);
        assert_eq!(draft.validate_update().unwrap_err().message(), "id is required");
        draft.id = Some(3);
        assert_eq!(draft.validate_update().unwrap_err().message(), "name is required");

        let mut full = full_draft();
        full.id = Some(3);
        assert_eq!(full.validate_update().unwrap(), 3);
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let mut stored = full_draft().into_member(7);
        stored.avatar = Some("/avatars/amy.png".to_string());
        stored.nationality = Some("Japan".to_string());

        let patch = MemberDraft {
            id: Some(7),
            role: Some("Product Manager".to_string()),
            ..MemberDraft::default()
        };
        let merged = stored.merged_with(&patch);

        assert_eq!(merged.id, 7);
        assert_eq!(merged.role, "Product Manager");
        assert_eq!(merged.name, "Amy Ito");
        assert_eq!(merged.avatar.as_deref(), Some("/avatars/amy.png"));
        assert_eq!(merged.nationality.as_deref(), Some("Japan"));
        assert_eq!(merged.teams, vec!["Engineering", "Product"]);
    }

    #[test]
    fn test_merge_accepts_explicit_empty_teams() {
        let stored = full_draft().into_member(7);
        let patch = MemberDraft {
            id: Some(7),
            teams: Some(Vec::new()),
            ..MemberDraft::default()
        };
        assert!(stored.merged_with(&patch).teams.is_empty());
    }

    #[test]
    fn test_search_texts_cover_scalar_fields_and_teams() {
        let mut member = full_draft().into_member(12);
        member.publications = Some(vec![Publication {
            title: "Hidden".to_string(),
            journal: "Hidden Letters".to_string(),
            year: 2020,
            abstract_text: "Hidden entirely".to_string(),
        }]);
        let texts = member.search_texts();

        assert!(texts.contains(&"Amy Ito".to_string()));
        assert!(texts.contains(&"amy@edunova.io".to_string()));
        assert!(texts.contains(&"12".to_string()));
        assert!(texts.contains(&"Engineering,Product".to_string()));
        assert!(!texts.iter().any(|t| t.contains("Hidden")));
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let mut member = full_draft().into_member(1);
        member.date_of_birth = Some("1994-02-01".to_string());
        member.contact_no = Some("555-0101".to_string());
        member.work_email = Some("amy@work.edunova.io".to_string());
        member.publications = Some(vec![Publication {
            title: "On Rosters".to_string(),
            journal: "Directory Systems".to_string(),
            year: 2021,
            abstract_text: "Short".to_string(),
        }]);

        let value = serde_json::to_value(&member).unwrap();
        assert!(value.get("dateOfBirth").is_some());
        assert!(value.get("contactNo").is_some());
        assert!(value.get("workEmail").is_some());
        assert!(value["publications"][0].get("abstract").is_some());
        assert!(value.get("date_of_birth").is_none());
    }

    #[test]
    fn test_draft_from_member_round_trips_every_field() {
        let mut member = full_draft().into_member(4);
        member.gender = Some("Female".to_string());
        let draft = MemberDraft::from(member.clone());
        assert_eq!(draft.id, Some(4));
        assert_eq!(draft.clone().into_member(4), member);
        assert!(draft.validate_update().is_ok());
    }
}
