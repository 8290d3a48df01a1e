//! Email infrastructure

pub mod smtp;

pub use smtp::SmtpMailer;
