use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for household members
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MemberRow {
    pub id: String,
    pub household_id: String,
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
}

impl MemberRow {
    pub fn to_shared(&self) -> Result<shared::Member, uuid::Error> {
        Ok(shared::Member {
            id: Uuid::parse_str(&self.id)?,
            household_id: Uuid::parse_str(&self.household_id)?,
            user_id: Uuid::parse_str(&self.user_id)?,
            joined_at: self.joined_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_row_to_shared() {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let household_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();

        let row = MemberRow {
            id: id.to_string(),
            household_id: household_id.to_string(),
            user_id: user_id.to_string(),
            joined_at: now,
        };

        let shared = row.to_shared().unwrap();

        assert_eq!(shared.id, id);
        assert_eq!(shared.household_id, household_id);
        assert_eq!(shared.user_id, user_id);
        assert_eq!(shared.joined_at, now);
    }
}
