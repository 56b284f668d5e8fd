// nifi-api: Async Rust client for the NiFi flow-management REST API

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod connections;
mod process_groups;
mod processors;

pub use client::{Client, ClientConfig, Outcome, Scheme};
pub use error::Error;
pub use models::{
    Connection, ConnectionComponent, ConnectionEndpoint, EndpointKind, Entity, Position,
    ProcessGroup, ProcessGroupComponent, Processor, ProcessorComponent, ProcessorConfig,
    ProcessorState, Properties, Relationship, Revision,
};
pub use processors::{auto_terminated_relationships, normalize_properties};
pub use transport::{TlsMode, TransportConfig};

/// Re-exported so callers can drive [`Client::json_call`] without a direct reqwest dependency.
pub use reqwest::Method;
