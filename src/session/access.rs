//! Admin allow-list.

use std::collections::HashSet;

/// Environment variable holding the comma-separated admin emails.
pub const ADMIN_EMAILS_ENV: &str = "ADMIN_EMAILS";

/// Set of lowercase admin emails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminAllowList {
    emails: HashSet<String>,
}

impl AdminAllowList {
    /// Parse a comma-separated list. Entries are trimmed and lowercased;
    /// empty entries are dropped.
    pub fn parse(raw: &str) -> Self {
        let emails = raw
            .split(',')
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { emails }
    }

    /// Read the list from `ADMIN_EMAILS`; unset means nobody is admin.
    pub fn from_env() -> Self {
        std::env::var(ADMIN_EMAILS_ENV)
            .map(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }

    pub fn from_emails<I, S>(emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined: Vec<String> = emails.into_iter().map(|e| e.as_ref().to_string()).collect();
        Self::parse(&joined.join(","))
    }

    pub fn is_admin(&self, email: Option<&str>) -> bool {
        match email {
            Some(email) => self.emails.contains(&email.trim().to_lowercase()),
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }
}
