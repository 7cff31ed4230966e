use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::constants::MAX_GROUP_NAME_LEN;
use crate::errors::{Error, Result, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub owner_id: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGroup {
    pub name: String,
}

impl NewGroup {
    pub fn validate(&self) -> Result<()> {
        let len = self.name.trim().chars().count();
        if len == 0 {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if len > MAX_GROUP_NAME_LEN {
            return Err(Error::invalid_input(format!(
                "Group name must be at most {} characters",
                MAX_GROUP_NAME_LEN
            )));
        }
        Ok(())
    }
}
