// Processor endpoints
//
// Same CRUD shape as process groups, plus two read-side rules and a
// revision-safe run-state transition:
//
// * null-valued properties are stripped on every read path (`reconcile`)
// * `config.autoTerminatedRelationships` is re-derived from `relationships`
//   on fetch
// * start/stop send only `{id, state}` so unrelated edits are not clobbered

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::client::Client;
use crate::error::Error;
use crate::models::{Entity, Processor, ProcessorState, Properties, Relationship, Revision};

/// Drop every property whose value is `null`.
///
/// Idempotent: a second pass finds nothing to remove.
pub fn normalize_properties(properties: &mut Properties) {
    properties.retain(|_, value| value.is_some());
}

/// Names of the relationships flagged auto-terminate, in declaration order.
pub fn auto_terminated_relationships(relationships: &[Relationship]) -> Vec<String> {
    relationships
        .iter()
        .filter(|r| r.auto_terminate)
        .map(|r| r.name.clone())
        .collect()
}

/// Which read path a processor came back through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadPath {
    Fetch,
    Write,
}

/// Bring a server-returned processor into the shape callers may rely on.
fn reconcile(mut processor: Processor, path: ReadPath) -> Processor {
    normalize_properties(&mut processor.component.config.properties);
    if path == ReadPath::Fetch {
        processor.component.config.auto_terminated_relationships =
            auto_terminated_relationships(&processor.component.relationships);
    }
    processor
}

/// Component of a state-only update: nothing but id and target state.
#[derive(Serialize)]
struct StateComponent<'a> {
    id: &'a str,
    state: &'a ProcessorState,
}

/// The parts of a state-change response this client uses. The body is
/// optional: an empty or unparseable 2xx still counts as accepted.
#[derive(Deserialize)]
struct StateAck {
    #[serde(default)]
    revision: Option<Revision>,
}

impl Client {
    /// Create a processor under `processor.component.parent_group_id`.
    ///
    /// `POST /process-groups/{parent}/processors`
    pub async fn create_processor(&self, processor: &Processor) -> Result<Processor, Error> {
        let parent = &processor.component.parent_group_id;
        let url = self.url(&["process-groups", parent.as_str(), "processors"])?;
        debug!(
            parent = %parent,
            processor_type = %processor.component.processor_type,
            "creating processor"
        );

        let request = Entity::new(&processor.component);
        let created = self.post(url, &request).await?.found()?;
        Ok(reconcile(created, ReadPath::Write))
    }

    /// Fetch a processor. `Ok(None)` when the server has no such processor.
    ///
    /// `GET /processors/{id}`
    pub async fn get_processor(&self, id: &str) -> Result<Option<Processor>, Error> {
        let url = self.url(&["processors", id])?;
        debug!(id, "fetching processor");
        let fetched = self.get(url).await?.into_option();
        Ok(fetched.map(|p| reconcile(p, ReadPath::Fetch)))
    }

    /// Replace a processor's component, guarded by `processor.revision`.
    ///
    /// `PUT /processors/{id}`. A `None` property value is sent as `null`,
    /// which resets that property to its default.
    pub async fn update_processor(&self, processor: &Processor) -> Result<Processor, Error> {
        let url = self.url(&["processors", processor.component.id.as_str()])?;
        debug!(
            id = %processor.component.id,
            version = processor.revision.version,
            "updating processor"
        );
        let updated = self.put(url, processor).await?.found()?;
        Ok(reconcile(updated, ReadPath::Write))
    }

    /// `DELETE /processors/{id}?version={n}`. Already-absent is success.
    pub async fn delete_processor(&self, id: &str, revision: Revision) -> Result<(), Error> {
        let url = self.versioned_url(&["processors", id], revision)?;
        debug!(id, version = revision.version, "deleting processor");
        self.delete(url).await?;
        Ok(())
    }

    /// Ask the server to move a processor to `state`.
    ///
    /// Sends `{"revision":{"version":N},"component":{"id":…,"state":…}}` and
    /// nothing else. On success the returned processor is `processor` with
    /// `state` set and the revision the server answered with; every other
    /// field is untouched. If the server accepts the change without a
    /// readable revision in the body, the old revision is kept. On failure
    /// `processor` is still the caller's last-known value.
    ///
    /// The server may apply the change asynchronously; this does not wait for it.
    pub async fn set_processor_state(
        &self,
        processor: &Processor,
        state: ProcessorState,
    ) -> Result<Processor, Error> {
        let id = processor.component.id.as_str();
        let url = self.url(&["processors", id])?;
        debug!(id, version = processor.revision.version, %state, "changing processor state");

        let request = Entity {
            revision: processor.revision,
            component: StateComponent { id, state: &state },
        };
        let raw = self.put_text(url, &request).await?.found()?;
        let revision = serde_json::from_str::<StateAck>(&raw)
            .ok()
            .and_then(|ack| ack.revision);
        if revision.is_none() {
            trace!(id, "state change accepted without a revision in the response");
        }

        let mut next = processor.clone();
        next.component.state = Some(state);
        if let Some(revision) = revision {
            next.revision = revision;
        }
        Ok(next)
    }

    /// Shorthand for [`set_processor_state`](Self::set_processor_state) with `RUNNING`.
    pub async fn start_processor(&self, processor: &Processor) -> Result<Processor, Error> {
        self.set_processor_state(processor, ProcessorState::Running)
            .await
    }

    /// Shorthand for [`set_processor_state`](Self::set_processor_state) with `STOPPED`.
    pub async fn stop_processor(&self, processor: &Processor) -> Result<Processor, Error> {
        self.set_processor_state(processor, ProcessorState::Stopped)
            .await
    }
}
