//! Recipients module

mod email_address;
mod list;
mod recipient;

pub use email_address::{EmailAddress, EmailAddressError};
pub use list::RecipientList;
pub use recipient::Recipient;
