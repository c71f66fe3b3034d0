//! JSON catalog files: an app set plus the user table needed to order it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::entry::{AppEntry, UserHandle};
use crate::catalog::ordering::{CaseInsensitiveCollator, OrderingPolicy};
use crate::catalog::users::StaticUserDirectory;
use crate::core::errors::{DrawerError, Result};

/// On-disk catalog.
///
/// ```json
/// {
///   "primary_user": 0,
///   "user_priorities": { "0": 0, "10": 1 },
///   "apps": [{ "component": "com.example.mail/.Inbox", "user": 0, "title": "Mail" }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    pub primary_user: UserHandle,
    pub user_priorities: HashMap<UserHandle, i64>,
    pub apps: Vec<AppEntry>,
}

impl CatalogFile {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| DrawerError::io(path, source))?;
        serde_json::from_str(&raw).map_err(|error| DrawerError::CatalogParse {
            path: path.to_path_buf(),
            details: error.to_string(),
        })
    }

    #[must_use]
    pub fn users(&self) -> StaticUserDirectory {
        StaticUserDirectory {
            primary_user: self.primary_user,
            priorities: self.user_priorities.clone(),
        }
    }

    /// Case-insensitive titles with this catalog's user table.
    #[must_use]
    pub fn ordering(&self) -> OrderingPolicy {
        OrderingPolicy::new(Box::new(CaseInsensitiveCollator), Box::new(self.users()))
    }
}
