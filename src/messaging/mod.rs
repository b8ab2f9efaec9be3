//! SMS delivery through Twilio

pub mod client;

pub use client::{AccountRecord, MessagingProvider, SentMessage, TwilioClient};
