//! Ordered, deduplicating recipient list

use crate::domain::recipients::{EmailAddress, Recipient};

/// An ordered recipient list, deduplicated by normalized email.
///
/// Dispatch order is significant: the engine contacts recipients in list
/// order and reports progress in the same order. Duplicates are resolved
/// at ingestion, case-insensitively, keeping the first occurrence.
#[derive(Clone, Debug, Default)]
pub struct RecipientList {
    recipients: Vec<Recipient>,
}

impl RecipientList {
    /// Create an empty recipient list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a recipient unless its email is already present
    ///
    /// # Returns
    /// `true` if the recipient was added, `false` if it was a duplicate.
    pub fn push(&mut self, recipient: Recipient) -> bool {
        if self.contains(recipient.email()) {
            return false;
        }

        self.recipients.push(recipient);
        true
    }

    /// Whether an email address is already in the list
    pub fn contains(&self, email: &EmailAddress) -> bool {
        self.recipients.iter().any(|r| r.email() == email)
    }

    /// The number of recipients in the list
    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    /// Iterate over the recipients in dispatch order
    pub fn iter(&self) -> impl Iterator<Item = &Recipient> {
        self.recipients.iter()
    }

    /// The recipient emails in dispatch order
    pub fn emails(&self) -> Vec<String> {
        self.recipients
            .iter()
            .map(|r| r.email().as_str().to_string())
            .collect()
    }
}

impl FromIterator<Recipient> for RecipientList {
    fn from_iter<I: IntoIterator<Item = Recipient>>(iter: I) -> Self {
        let mut list = Self::new();
        for recipient in iter {
            list.push(recipient);
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn recipient(name: &str, email: &str) -> Recipient {
        Recipient::new(Some(name.into()), EmailAddress::new_unchecked(email))
    }

    #[test]
    fn test_push_preserves_insertion_order() {
        let mut list = RecipientList::new();
        list.push(recipient("Ann", "ann@x.com"));
        list.push(recipient("Bob", "bob@x.com"));
        list.push(recipient("Cyd", "cyd@x.com"));

        assert_eq!(list.emails(), vec!["ann@x.com", "bob@x.com", "cyd@x.com"]);
    }

    #[test]
    fn test_duplicate_email_is_rejected_keeping_first() -> TestResult {
        let mut list = RecipientList::new();

        assert!(list.push(recipient("Ann", "ann@x.com")));
        assert!(!list.push(recipient("Annie", "ann@x.com")));

        assert_eq!(list.len(), 1);
        let kept = list.iter().next().ok_or("empty list")?;
        assert_eq!(kept.name(), Some("Ann"));

        Ok(())
    }

    #[test]
    fn test_dedup_is_case_insensitive() -> TestResult {
        let mut list = RecipientList::new();
        list.push(recipient("Ann", "ann@x.com"));

        // Normalization lower-cases, so this is the same identity.
        assert!(!list.push(Recipient::new(None, EmailAddress::new("ANN@X.COM")?)));
        assert_eq!(list.len(), 1);

        Ok(())
    }

    #[test]
    fn test_from_iterator_dedupes() {
        let list: RecipientList = vec![
            recipient("Ann", "ann@x.com"),
            recipient("Bob", "bob@x.com"),
            recipient("Ann again", "ann@x.com"),
        ]
        .into_iter()
        .collect();

        assert_eq!(list.emails(), vec!["ann@x.com", "bob@x.com"]);
    }
}
