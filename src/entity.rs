//! Plain data entities and the generic seam shared by controllers and stores.
//!
//! Each persisted kind implements [`Entity`]: a wire payload for creation
//! (`New`), a partial-update payload (`Patch`), and a storage-level change set
//! (`Changes`). Patches carry what the client sent; change sets carry what the
//! store writes (for accounts that means a credential hash, never a plaintext
//! password).

use crate::error::AppError;
use crate::service::password;
use crate::service::Validate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub trait Entity: Clone + Serialize + Send + Sync + 'static {
    type New: Validate + DeserializeOwned + Send + 'static;
    type Patch: Validate + DeserializeOwned + Send + 'static;
    type Changes: Send + Sync + 'static;
    /// String-keyed fields addressable by `Store::find_by_field`.
    type Field: Copy + Eq + Send + Sync + 'static;

    /// Entity kind name used in error messages ("account", "catalog item").
    const KIND: &'static str;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);

    /// Build a record from a creation payload. The id is a placeholder; the
    /// store assigns the real one.
    fn new_record(new: Self::New) -> Result<Self, AppError>;

    /// Translate a wire patch into a storage-level change set.
    fn changes(patch: Self::Patch) -> Result<Self::Changes, AppError>;

    /// Merge a change set onto this record. Fields absent from the change set
    /// keep their stored values.
    fn apply(&mut self, changes: &Self::Changes);

    fn field(&self, field: Self::Field) -> &str;
    fn field_name(field: Self::Field) -> &'static str;

    /// The field covered by a uniqueness constraint, if any.
    fn unique_field() -> Option<Self::Field>;
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Account {
    pub id: i64,
    pub handle: String,
    /// Argon2 PHC string. Never serialized outward.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    pub handle: String,
    pub password: String,
    #[serde(default)]
    pub display_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountPatch {
    pub handle: Option<String>,
    pub password: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Storage-level account changes. The credential is already hashed.
#[derive(Debug, Clone)]
pub struct AccountChanges {
    pub handle: Option<String>,
    pub password_hash: Option<String>,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Handle,
    Email,
}

impl Entity for Account {
    type New = NewAccount;
    type Patch = AccountPatch;
    type Changes = AccountChanges;
    type Field = AccountField;

    const KIND: &'static str = "account";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn new_record(new: Self::New) -> Result<Self, AppError> {
        Ok(Account {
            id: 0,
            handle: new.handle,
            password_hash: password::hash(&new.password)?,
            display_name: new.display_name,
            email: new.email,
        })
    }

    fn changes(patch: Self::Patch) -> Result<Self::Changes, AppError> {
        let password_hash = match patch.password {
            Some(plain) => Some(password::hash(&plain)?),
            None => None,
        };
        Ok(AccountChanges {
            handle: patch.handle,
            password_hash,
            display_name: patch.display_name,
            email: patch.email,
        })
    }

    fn apply(&mut self, changes: &Self::Changes) {
        if let Some(handle) = &changes.handle {
            self.handle = handle.clone();
        }
        if let Some(hash) = &changes.password_hash {
            self.password_hash = hash.clone();
        }
        if let Some(display_name) = &changes.display_name {
            self.display_name = display_name.clone();
        }
        if let Some(email) = &changes.email {
            self.email = email.clone();
        }
    }

    fn field(&self, field: Self::Field) -> &str {
        match field {
            AccountField::Handle => &self.handle,
            AccountField::Email => &self.email,
        }
    }

    fn field_name(field: Self::Field) -> &'static str {
        match field {
            AccountField::Handle => "handle",
            AccountField::Email => "email",
        }
    }

    fn unique_field() -> Option<Self::Field> {
        Some(AccountField::Handle)
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CatalogItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Name,
}

impl Entity for CatalogItem {
    type New = NewItem;
    type Patch = ItemPatch;
    type Changes = ItemPatch;
    type Field = ItemField;

    const KIND: &'static str = "catalog item";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn new_record(new: Self::New) -> Result<Self, AppError> {
        Ok(CatalogItem {
            id: 0,
            name: new.name,
            price: new.price,
        })
    }

    fn changes(patch: Self::Patch) -> Result<Self::Changes, AppError> {
        Ok(patch)
    }

    fn apply(&mut self, changes: &Self::Changes) {
        if let Some(name) = &changes.name {
            self.name = name.clone();
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
    }

    fn field(&self, field: Self::Field) -> &str {
        match field {
            ItemField::Name => &self.name,
        }
    }

    fn field_name(field: Self::Field) -> &'static str {
        match field {
            ItemField::Name => "name",
        }
    }

    fn unique_field() -> Option<Self::Field> {
        None
    }
}
