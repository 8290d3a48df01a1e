//! Recipient model

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::domain::recipients::EmailAddress;

/// A single dispatch target.
///
/// Identity is the email address alone: two recipients with the same
/// normalized address are equal regardless of name or company.
#[derive(Clone, Debug)]
pub struct Recipient {
    name: Option<String>,
    email: EmailAddress,
    company: Option<String>,
}

impl Recipient {
    /// Create a new recipient
    ///
    /// A blank or whitespace-only name collapses to `None`, so template
    /// rendering falls back to its default salutation.
    pub fn new(name: Option<String>, email: EmailAddress) -> Self {
        Self {
            name: name.filter(|n| !n.trim().is_empty()),
            email,
            company: None,
        }
    }

    /// Attach a company used by the `{company}` placeholder
    pub fn with_company(mut self, company: &str) -> Self {
        if !company.trim().is_empty() {
            self.company = Some(company.to_string());
        }
        self
    }

    /// The recipient's name, if one was provided
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The recipient's email address
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The recipient's company, if one was provided
    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }
}

impl PartialEq for Recipient {
    fn eq(&self, other: &Self) -> bool {
        self.email == other.email
    }
}

impl Eq for Recipient {}

impl Hash for Recipient {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.email.hash(state);
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} <{}>", name, self.email),
            None => write!(f, "{}", self.email),
        }
    }
}
