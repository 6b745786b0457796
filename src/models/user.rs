use mongodb::bson::oid::ObjectId;
use serde::Deserialize;

pub const USERS: &str = "users";

/// Projection of a `users` document; other stored fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
}

/// An account resolved through the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: String,
    pub email: String,
}

impl From<UserRecord> for Account {
    fn from(record: UserRecord) -> Self {
        Account {
            id: record.id.to_hex(),
            email: record.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{self, doc};

    #[test]
    fn user_documents_project_to_accounts() {
        let id = ObjectId::new();
        let document = doc! {
            "_id": id,
            "email": "user@example.com",
            "password_hash": "$2b$12$abc",
            "display_name": "Ada",
        };

        let record: UserRecord = bson::from_document(document).unwrap();
        let account = Account::from(record);
        assert_eq!(account.id, id.to_hex());
        assert_eq!(account.email, "user@example.com");
    }
}
