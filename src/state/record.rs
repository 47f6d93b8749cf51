//! Records exchanged with the users API

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single hobby entry in a submitted record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HobbyRecord {
    pub name: String,
}

/// Snapshot of a valid form, built at submit time and posted to the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub first_name: String,
    pub last_name: String,
    /// Canonical `yyyy-MM-dd`
    pub date_of_birth: String,
    pub framework: String,
    /// Omitted when the version field is disabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework_version: Option<String>,
    pub email: String,
    pub hobbies: Vec<HobbyRecord>,
}

/// Identifier assigned by the backend (string or numeric depending on server)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Text(String),
    Number(u64),
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Text(s) => f.write_str(s),
            UserId::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A stored user, as returned by the create endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(flatten)]
    pub record: SubmissionRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_record() -> SubmissionRecord {
        SubmissionRecord {
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            date_of_birth: "2001-03-09".to_string(),
            framework: "vue".to_string(),
            framework_version: Some("3.3.1".to_string()),
            email: "alice@example.com".to_string(),
            hobbies: vec![HobbyRecord {
                name: "reading".to_string(),
            }],
        }
    }

    #[test]
    fn test_record_serializes_with_wire_names() {
        let value = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(
            value,
            json!({
                "firstName": "Alice",
                "lastName": "Smith",
                "dateOfBirth": "2001-03-09",
                "framework": "vue",
                "frameworkVersion": "3.3.1",
                "email": "alice@example.com",
                "hobbies": [{ "name": "reading" }]
            })
        );
    }

    #[test]
    fn test_missing_version_is_omitted() {
        let record = SubmissionRecord {
            framework_version: None,
            ..sample_record()
        };
        let value = serde_json::to_value(record).unwrap();
        assert!(value.get("frameworkVersion").is_none());
    }

    #[test]
    fn test_user_accepts_numeric_and_text_ids() {
        let mut body = serde_json::to_value(sample_record()).unwrap();
        body["id"] = json!(7);
        let user: User = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(user.id, UserId::Number(7));
        assert_eq!(user.record, sample_record());

        body["id"] = json!("a1b2");
        let user: User = serde_json::from_value(body).unwrap();
        assert_eq!(user.id.to_string(), "a1b2");
    }
}
