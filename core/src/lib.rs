//! Synchronous client core for the Telnyx REST API.
//!
//! # Overview
//! Typed request and response models for calls, messages, phone numbers,
//! number orders and webhooks, plus thin services that turn them into
//! `HttpRequest` values and parse `HttpResponse` values back. The network
//! round-trip sits behind the `Transport` trait; `UreqTransport` is the
//! bundled implementation.
//!
//! # Design
//! - Every model is declared once with `wire_model!`, which yields the struct,
//!   its static field table, a builder and `with_*` mutators. One generic
//!   engine in `model` decodes and encodes all of them.
//! - Polymorphic JSON is resolved once at decode time into closed Rust enums
//!   (`wire_union!`), either by ordered trial or by a discriminator field.
//! - `TelnyxClient` is immutable after construction and can be shared across
//!   threads.
//!
//! ```no_run
//! use telnyx_core::{ClientConfig, TelnyxClient};
//! use telnyx_core::resources::messages::MessageSendParams;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TelnyxClient::new(&ClientConfig::from_env()?)?;
//! let params = MessageSendParams::builder()
//!     .to("+18665550001")
//!     .from("+18445550001")
//!     .text("Hello, World!")
//!     .build()?;
//! let sent = client.messages().send(&params)?;
//! println!("queued {}", sent.data.id);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod resources;
pub mod transport;

#[doc(hidden)]
pub mod __private {
    pub use serde;
    pub use serde_json;
    pub use tracing;
}

pub use client::{Endpoint, TelnyxClient};
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ModelError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use model::{decode, encode, Builder, Model, Nullable, WireValue};
pub use transport::UreqTransport;
