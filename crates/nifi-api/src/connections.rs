// Connection endpoints
//
// Endpoints and selected relationships are passed through as given; the
// server decides whether they make sense.

use tracing::debug;

use crate::client::Client;
use crate::error::Error;
use crate::models::{Connection, Entity, Revision};

impl Client {
    /// Create a connection inside `connection.component.parent_group_id`.
    ///
    /// `POST /process-groups/{parent}/connections`
    pub async fn create_connection(&self, connection: &Connection) -> Result<Connection, Error> {
        let component = &connection.component;
        let url = self.url(&[
            "process-groups",
            component.parent_group_id.as_str(),
            "connections",
        ])?;
        debug!(
            parent = %component.parent_group_id,
            source = %component.source.id,
            destination = %component.destination.id,
            "creating connection"
        );

        let request = Entity::new(component);
        self.post(url, &request).await?.found()
    }

    /// `GET /connections/{id}`, `Ok(None)` on 404.
    pub async fn get_connection(&self, id: &str) -> Result<Option<Connection>, Error> {
        let url = self.url(&["connections", id])?;
        debug!(id, "fetching connection");
        Ok(self.get(url).await?.into_option())
    }

    /// `PUT /connections/{id}` guarded by `connection.revision`.
    pub async fn update_connection(&self, connection: &Connection) -> Result<Connection, Error> {
        let url = self.url(&["connections", connection.component.id.as_str()])?;
        debug!(
            id = %connection.component.id,
            version = connection.revision.version,
            "updating connection"
        );
        self.put(url, connection).await?.found()
    }

    /// `DELETE /connections/{id}?version={n}`. Already-absent is success.
    pub async fn delete_connection(&self, id: &str, revision: Revision) -> Result<(), Error> {
        let url = self.versioned_url(&["connections", id], revision)?;
        debug!(id, version = revision.version, "deleting connection");
        self.delete(url).await?;
        Ok(())
    }
}
