//! Network transport abstraction.
//!
//! This module defines the [`Transport`] and [`Reply`] traits the lifecycle
//! controller fetches through.  Concrete transports live in sub-modules:
//! [`HttpTransport`] talks to a real server and [`FlakyTransport`] wraps any
//! other transport to simulate an unreliable one.
//!
//! ## For contributors — adding a new transport
//!
//! 1. Create a new file in this directory (e.g. `file.rs`).
//! 2. Define a struct and implement [`Transport`] for it, returning a boxed
//!    [`Reply`] whose body is only read when [`Reply::bytes`] is called.
//! 3. Add `mod file;` below and re-export your struct in the `pub use` block.
//! 4. Construct it in `main.rs` where the transport stack is assembled.
//!
//! The controller only sees `Arc<dyn Transport>`, so nothing else changes.

mod flaky;
mod http;

pub use flaky::FlakyTransport;
#[cfg(test)]
pub use flaky::SyntheticReply;
pub use http::HttpTransport;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::FetchError;

/// A response whose status line has arrived but whose body has not been read.
///
/// Status and status text are available immediately.  The body is read only
/// when [`bytes`](Reply::bytes) is called, which consumes the reply.
#[async_trait]
pub trait Reply: Send {
    fn status(&self) -> u16;

    /// Reason phrase, e.g. `"Server Error"`.  May be empty.
    fn status_text(&self) -> &str;

    /// `true` for statuses in `200..=299`.
    fn ok(&self) -> bool {
        (200..=299).contains(&self.status())
    }

    /// Read the full body.
    async fn bytes(self: Box<Self>) -> Result<Bytes, FetchError>;
}

/// Something that can issue a `GET` and hand back a [`Reply`].
///
/// Implementations must be [`Send`] + [`Sync`]: one transport is shared by
/// every fetch cycle the controller spawns.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Human-readable label used in logs.
    fn name(&self) -> &str;

    /// Issue a `GET` to `url`.  An `Err` means no response was obtained.
    async fn get(&self, url: &str) -> Result<Box<dyn Reply>, FetchError>;
}
