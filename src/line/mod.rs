//! LINE Messaging API adapter: request signatures, webhook payloads and the
//! reply client.

pub mod client;
pub mod signature;
pub mod webhook;

pub use client::{LineClient, ReplySender};
pub use signature::{verify_signature, SIGNATURE_HEADER};
pub use webhook::{WebhookBody, WebhookEvent};
