use crate::api::client::ApiClient;
use crate::api::request::ApiRequest;
use crate::error::DataplatError;
use crate::types::common::Pagination;
use crate::types::connection::{
    Connection, ConnectionCreate, ConnectionTest, ConnectionTestResult, ConnectionUpdate,
};
use tracing::info;
use uuid::Uuid;

pub const CONNECTORS_PATH: &str = "/resources/connectors/";
pub const CONNECTORS_TEST_PATH: &str = "/resources/connectors/test/";

fn connector_path(id: Uuid) -> String {
    format!("{CONNECTORS_PATH}{id}")
}

/// CRUD over data-source connections.
pub struct ConnectionsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ConnectionsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Ask the backend to try the connection without storing it.
    pub async fn test(&self, config: &ConnectionTest) -> Result<ConnectionTestResult, DataplatError> {
        let req = ApiRequest::post(CONNECTORS_TEST_PATH)
            .json(config)?
            .on_failure("Failed to test connection");
        let result: ConnectionTestResult = self.client.send(req).await?;
        info!(
            db_type = %config.db_type,
            host = %config.host,
            success = result.success,
            "connection tested"
        );
        Ok(result)
    }

    pub async fn create(&self, connection: &ConnectionCreate) -> Result<Connection, DataplatError> {
        let req = ApiRequest::post(CONNECTORS_PATH)
            .json(connection)?
            .on_failure("Failed to create data connection");
        let created: Connection = self.client.send(req).await?;
        self.client
            .notify_success("Data connection created successfully");
        info!(id = %created.id, name = %created.name, "data connection created");
        Ok(created)
    }

    pub async fn list(&self, page: Pagination) -> Result<Vec<Connection>, DataplatError> {
        let req = ApiRequest::get(CONNECTORS_PATH)
            .query(page.to_query())
            .on_failure("Failed to fetch data connections");
        self.client.send(req).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Connection, DataplatError> {
        let req = ApiRequest::get(connector_path(id)).on_failure("Failed to fetch data connection");
        self.client.send(req).await
    }

    /// Partial update; fields left as `None` (and a blank password) are not sent.
    pub async fn update(
        &self,
        id: Uuid,
        update: &ConnectionUpdate,
    ) -> Result<Connection, DataplatError> {
        let req = ApiRequest::put(connector_path(id))
            .json(update)?
            .on_failure("Failed to update data connection");
        let updated: Connection = self.client.send(req).await?;
        self.client
            .notify_success("Data connection updated successfully");
        info!(%id, "data connection updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DataplatError> {
        let req = ApiRequest::delete(connector_path(id)).on_failure("Failed to delete data connection");
        self.client.send_unit(req).await?;
        self.client
            .notify_success("Data connection deleted successfully");
        info!(%id, "data connection deleted");
        Ok(())
    }
}
