use std::collections::BTreeMap;

use foundation::ParticipantId;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::CatalogError;

/// Display names of one participant's team.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamInfo {
    pub shortname: String,
    pub fullname: String,
}

/// Parsed roster document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    pub project_title: String,
    pub teams: BTreeMap<String, TeamInfo>,
}

fn string_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

impl Roster {
    /// Parses the roster leniently.
    ///
    /// Only a non-object root is an error. Missing titles, missing team tables
    /// and malformed team entries become empty strings.
    pub fn from_value(value: &Value, path: &str) -> Result<Self, CatalogError> {
        let Some(root) = value.as_object() else {
            return Err(CatalogError::Malformed {
                path: path.to_string(),
                reason: "roster root is not an object".to_string(),
            });
        };

        let project_title = string_field(value, "project_title");
        let mut teams = BTreeMap::new();

        match root.get("teams") {
            Some(Value::Object(entries)) => {
                for (id, entry) in entries {
                    if !entry.is_object() {
                        warn!(path, team = %id, "ignoring malformed roster entry");
                    }
                    teams.insert(
                        id.clone(),
                        TeamInfo {
                            shortname: string_field(entry, "shortname"),
                            fullname: string_field(entry, "fullname"),
                        },
                    );
                }
            }
            Some(_) => warn!(path, "roster teams is not an object"),
            None => {}
        }

        Ok(Self {
            project_title,
            teams,
        })
    }

    pub fn team(&self, id: &ParticipantId) -> TeamInfo {
        self.teams.get(id.as_str()).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{Roster, TeamInfo};
    use crate::CatalogError;
    use foundation::ParticipantId;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_teams() {
        let roster = Roster::from_value(
            &json!({"project_title": "Spring Fair", "teams": {"3": {"shortname": "Owls", "fullname": "Night Owls"}}}),
            "teams.json",
        )
        .unwrap();
        assert_eq!(roster.project_title, "Spring Fair");
        assert_eq!(
            roster.team(&ParticipantId::new("3")),
            TeamInfo {
                shortname: "Owls".to_string(),
                fullname: "Night Owls".to_string()
            }
        );
    }

    #[test]
    fn malformed_entries_degrade_to_empty() {
        let roster = Roster::from_value(
            &json!({"teams": {"1": null, "2": {"shortname": 42}, "3": "oops"}}),
            "teams.json",
        )
        .unwrap();
        assert_eq!(roster.project_title, "");
        assert_eq!(roster.team(&ParticipantId::new("1")), TeamInfo::default());
        assert_eq!(roster.team(&ParticipantId::new("2")).shortname, "42");
        assert_eq!(roster.team(&ParticipantId::new("3")).fullname, "");
        assert_eq!(roster.team(&ParticipantId::new("99")), TeamInfo::default());
    }

    #[test]
    fn non_object_root_is_rejected() {
        let err = Roster::from_value(&json!([1, 2]), "teams.json").unwrap_err();
        assert!(matches!(err, CatalogError::Malformed { .. }));
    }
}
