use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo::Goal;

/// Request body shared by goal creation and update.
#[derive(Debug, Deserialize)]
pub struct GoalBody {
    pub name: String,
    pub target: f64,
    pub unit: String,
}

#[derive(Debug, Serialize)]
pub struct GoalResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub target: f64,
    pub unit: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Goal> for GoalResponse {
    fn from(g: Goal) -> Self {
        Self {
            id: g.id,
            user_id: g.user_id,
            name: g.name,
            target: g.target,
            unit: g.unit,
            created_at: g.created_at,
            updated_at: g.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goal_response_uses_rfc3339_timestamps() {
        let now = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        let response = GoalResponse {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "run".into(),
            target: 10.0,
            unit: "km".into(),
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("2023-11-14T22:13:20Z"));
        assert!(json.contains("\"unit\":\"km\""));
    }

    #[test]
    fn pagination_defaults_apply() {
        let p: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(p.limit, 20);
        assert_eq!(p.offset, 0);
    }
}
