// Process group endpoints
//
// Groups are created under their parent's collection
// (`process-groups/{parent}/process-groups`) and addressed directly by id
// afterwards.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{Entity, ProcessGroup, Revision};

impl Client {
    /// Create a process group under `group.component.parent_group_id`.
    ///
    /// `POST /process-groups/{parent}/process-groups`. The revision sent is
    /// always 0; the returned entity carries the server-assigned id and revision.
    pub async fn create_process_group(&self, group: &ProcessGroup) -> Result<ProcessGroup, Error> {
        let parent = &group.component.parent_group_id;
        let url = self.url(&["process-groups", parent.as_str(), "process-groups"])?;
        debug!(parent = %parent, name = %group.component.name, "creating process group");

        let request = Entity::new(&group.component);
        self.post(url, &request).await?.found()
    }

    /// Fetch a process group. `Ok(None)` when the server has no such group.
    ///
    /// `GET /process-groups/{id}`
    pub async fn get_process_group(&self, id: &str) -> Result<Option<ProcessGroup>, Error> {
        let url = self.url(&["process-groups", id])?;
        debug!(id, "fetching process group");
        Ok(self.get(url).await?.into_option())
    }

    /// Replace a process group's component, guarded by `group.revision`.
    ///
    /// `PUT /process-groups/{id}`. A stale revision comes back as
    /// [`Error::Api`] (see [`Error::is_conflict`]).
    pub async fn update_process_group(&self, group: &ProcessGroup) -> Result<ProcessGroup, Error> {
        let url = self.url(&["process-groups", group.component.id.as_str()])?;
        debug!(id = %group.component.id, version = group.revision.version, "updating process group");
        self.put(url, group).await?.found()
    }

    /// Delete a process group. Children are the server's concern.
    ///
    /// `DELETE /process-groups/{id}?version={n}`. Deleting a group that is
    /// already gone succeeds.
    pub async fn delete_process_group(&self, id: &str, revision: Revision) -> Result<(), Error> {
        let url = self.versioned_url(&["process-groups", id], revision)?;
        debug!(id, version = revision.version, "deleting process group");
        self.delete(url).await?;
        Ok(())
    }
}
