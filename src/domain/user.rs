use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Login(pub String);

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Login {
    fn from(s: String) -> Self {
        Login(s)
    }
}

impl From<&str> for Login {
    fn from(s: &str) -> Self {
        Login(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub login: Login,
    pub avatar_url: Option<String>,
}

impl User {
    pub fn new(login: impl Into<Login>) -> Self {
        Self {
            login: login.into(),
            avatar_url: None,
        }
    }

    /// Two users are the same account when their logins match; avatars are cosmetic.
    pub fn is_same_account(&self, other: &User) -> bool {
        self.login == other.login
    }
}
