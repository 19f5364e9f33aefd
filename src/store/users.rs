//! # User Store
//!
//! Users are keyed solely by email. Registration is idempotent: an email that
//! already exists is reported back instead of being inserted twice.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::collection::{from_document, to_document, InsertOutcome, ID_FIELD};
use super::database::Database;
use super::errors::StoreResult;
use super::filter::{Filter, FilterExpr};

pub const EMAIL: &str = "email";

/// User record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Unique key
    pub email: String,

    /// Free-form profile fields (name, photo URL, ...)
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl User {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            profile: Map::new(),
        }
    }
}

/// Outcome of a registration request
#[derive(Debug, Clone, PartialEq)]
pub enum Registration {
    /// A user with that email was already registered
    Existing(User),

    /// The user was stored
    Created(User),
}

/// Typed access to the `users` collection
#[derive(Debug, Clone)]
pub struct UserStore {
    db: Database,
}

impl UserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn email_filter(email: &str) -> Filter {
        FilterExpr::eq(EMAIL, email).into()
    }

    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.db
            .users()?
            .find_one(&Self::email_filter(email))?
            .map(from_document)
            .transpose()
    }

    /// Store the user unless the email is already registered
    pub fn register(&self, user: &User) -> StoreResult<Registration> {
        let mut doc = to_document(user)?;
        doc.remove(ID_FIELD);

        match self
            .db
            .users()?
            .insert_unless(&Self::email_filter(&user.email), doc)?
        {
            InsertOutcome::Existing(existing) => Ok(Registration::Existing(from_document(existing)?)),
            InsertOutcome::Inserted(created) => Ok(Registration::Created(from_document(created)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_register_twice_keeps_one_record() {
        let db = Database::open("test");
        let store = UserStore::new(db.clone());

        let mut user = User::new("a@x.com");
        user.profile.insert("name".to_string(), json!("Alice"));

        let first = store.register(&user).unwrap();
        let Registration::Created(created) = first else {
            panic!("expected a created user");
        };
        assert!(created.id.is_some());
        assert_eq!(created.profile["name"], "Alice");

        let second = store.register(&User::new("a@x.com")).unwrap();
        assert!(matches!(second, Registration::Existing(_)));

        assert_eq!(db.users().unwrap().count(&Filter::All).unwrap(), 1);
    }

    #[test]
    fn test_find_by_email() {
        let store = UserStore::new(Database::open("test"));
        store.register(&User::new("b@x.com")).unwrap();

        assert!(store.find_by_email("b@x.com").unwrap().is_some());
        assert!(store.find_by_email("c@x.com").unwrap().is_none());
    }
}
