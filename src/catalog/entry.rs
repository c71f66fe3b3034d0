//! App entries and their identity: component reference + user handle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Launchable component reference, ordered package-first then class.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentName {
    package: String,
    class: String,
}

impl ComponentName {
    #[must_use]
    pub fn new(package: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            class: class.into(),
        }
    }

    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    #[must_use]
    pub fn class(&self) -> &str {
        &self.class
    }
}

impl fmt::Display for ComponentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.package, self.class)
    }
}

/// Rejected `package/class` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentNameParseError(String);

impl fmt::Display for ComponentNameParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid component name {:?}: expected \"package/class\"",
            self.0
        )
    }
}

impl std::error::Error for ComponentNameParseError {}

impl FromStr for ComponentName {
    type Err = ComponentNameParseError;

    /// Parses `package/class`; a class starting with `.` is relative to the package.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let Some((package, class)) = raw.split_once('/') else {
            return Err(ComponentNameParseError(raw.to_string()));
        };
        if package.is_empty() || class.is_empty() {
            return Err(ComponentNameParseError(raw.to_string()));
        }
        let class = if class.starts_with('.') {
            format!("{package}{class}")
        } else {
            class.to_string()
        };
        Ok(Self::new(package, class))
    }
}

impl TryFrom<String> for ComponentName {
    type Error = ComponentNameParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ComponentName> for String {
    fn from(value: ComponentName) -> Self {
        value.to_string()
    }
}

/// Profile the app is installed for (primary user, work profile, ...).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct UserHandle(pub u32);

impl fmt::Display for UserHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user{}", self.0)
    }
}

/// One launchable app as seen by the drawer.
///
/// Equality of two entries for registry purposes is [`AppEntry::same_identity`],
/// not structural equality: an updated title still refers to the same app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppEntry {
    pub component: ComponentName,
    #[serde(default)]
    pub user: UserHandle,
    pub title: String,
    /// Host data carried through untouched (icon key, intent URI, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl AppEntry {
    #[must_use]
    pub fn new(component: ComponentName, user: UserHandle, title: impl Into<String>) -> Self {
        Self {
            component,
            user,
            title: title.into(),
            payload: None,
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Same component installed for the same user.
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.user == other.user && self.component == other.component
    }
}
