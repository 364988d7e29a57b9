//! Infrastructure Adapters
//!
//! Adapter implementations for the domain ports, following the Port/Adapter
//! (Hexagonal) architecture pattern.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Domain Layer                              │
//! │  ┌────────────────────────────────────────────────────────────┐ │
//! │  │                    Ports (Traits)                           │ │
//! │  │      ClusterManager │ CommandRunner │ EventPublisher       │ │
//! │  └────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Adapters                                     │
//! │  ┌────────────────────────────────────────────────────────────┐ │
//! │  │ rest::GlusterRestClient │ ShellCommandRunner               │ │
//! │  │ Logging / InMemory / Composite event publishers            │ │
//! │  └────────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The REST client lives in [`crate::rest`] next to its wire types.

mod event_publisher;
mod shell;

pub use event_publisher::{CompositeEventPublisher, InMemoryEventCollector, LoggingEventPublisher};
pub use shell::ShellCommandRunner;
