// Wire models for the flow-management REST API.
//
// Every resource travels in an `{ revision, component }` envelope. Field
// names are camelCase on the wire. Server responses carry many more fields
// (permissions, status, uri, ...) than modelled here; serde drops them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// ── Common ───────────────────────────────────────────────────────────

/// Server-assigned optimistic-concurrency version.
///
/// The client never bumps this itself. Whatever the server last returned is
/// what must be sent back on the next update or delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub version: u64,
}

impl Revision {
    pub fn new(version: u64) -> Self {
        Self { version }
    }
}

/// Canvas coordinate. Layout only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The `{ revision, component }` envelope shared by all resource kinds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity<C> {
    #[serde(default)]
    pub revision: Revision,
    pub component: C,
}

impl<C> Entity<C> {
    /// Wrap a component that has not been created yet (revision 0).
    pub fn new(component: C) -> Self {
        Self {
            revision: Revision::default(),
            component,
        }
    }
}

pub type ProcessGroup = Entity<ProcessGroupComponent>;
pub type Processor = Entity<ProcessorComponent>;
pub type Connection = Entity<ConnectionComponent>;

// ── Process group ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessGroupComponent {
    /// Empty until the server assigns one.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    /// Empty for the root group.
    #[serde(default)]
    pub parent_group_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub position: Position,
}

// ── Processor ────────────────────────────────────────────────────────

/// Run state of a processor.
///
/// States this client does not model are kept verbatim in `Other` and sent
/// back unchanged on update.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessorState {
    Running,
    Stopped,
    Disabled,
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for ProcessorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Running => f.write_str("RUNNING"),
            Self::Stopped => f.write_str("STOPPED"),
            Self::Disabled => f.write_str("DISABLED"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// Processor configuration property values. `None` (JSON `null`) means
/// "unset, inherit the default"; the client strips those on read.
pub type Properties = BTreeMap<String, Option<String>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorConfig {
    #[serde(default)]
    pub scheduling_strategy: String,
    #[serde(default)]
    pub scheduling_period: String,
    #[serde(default)]
    pub concurrently_schedulable_task_count: u32,
    #[serde(default)]
    pub properties: Properties,
    /// Derived from `relationships` on fetch; sent as-is on create/update.
    #[serde(default)]
    pub auto_terminated_relationships: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub name: String,
    #[serde(default)]
    pub auto_terminate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessorComponent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub parent_group_id: String,
    #[serde(default)]
    pub name: String,
    /// Fully-qualified processor implementation, e.g.
    /// `org.apache.nifi.processors.standard.GenerateFlowFile`.
    #[serde(rename = "type", default)]
    pub processor_type: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ProcessorState>,
    #[serde(default)]
    pub config: ProcessorConfig,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

// ── Connection ───────────────────────────────────────────────────────

/// What a connection endpoint points at. Any tag outside the common ones
/// lands in `Other` and is passed back as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EndpointKind {
    Processor,
    InputPort,
    OutputPort,
    RemoteInputPort,
    RemoteOutputPort,
    Funnel,
    #[serde(untagged)]
    Other(String),
}

/// One end of a connection. The id is a reference, not ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionEndpoint {
    #[serde(rename = "type")]
    pub kind: EndpointKind,
    pub id: String,
}

impl ConnectionEndpoint {
    pub fn processor(id: impl Into<String>) -> Self {
        Self {
            kind: EndpointKind::Processor,
            id: id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionComponent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default)]
    pub parent_group_id: String,
    pub source: ConnectionEndpoint,
    pub destination: ConnectionEndpoint,
    #[serde(default)]
    pub selected_relationships: Vec<String>,
    #[serde(default)]
    pub bends: Vec<Position>,
}
