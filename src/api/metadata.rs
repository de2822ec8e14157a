use crate::api::client::ApiClient;
use crate::api::request::{ApiRequest, encode_segment};
use crate::error::DataplatError;
use crate::types::common::Pagination;
use crate::types::metadata::{
    MetadataColumn, MetadataColumnCreate, MetadataColumnUpdate, MetadataTable,
    MetadataTableCreate, MetadataTableUpdate, MetadataTableWithColumns, TableData, TableQuery,
};
use tracing::info;
use uuid::Uuid;

pub const METADATA_PATH: &str = "/resources/metadata/";

/// Registered tables, their columns, and paged reads of their rows.
pub struct MetadataApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MetadataApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn create_table(
        &self,
        table: &MetadataTableCreate,
    ) -> Result<MetadataTable, DataplatError> {
        let req = ApiRequest::post(METADATA_PATH)
            .json(table)?
            .on_failure("Failed to create metadata table");
        let created: MetadataTable = self.client.send(req).await?;
        self.client
            .notify_success("Metadata table created successfully");
        info!(id = %created.id, table = %created.table_name, "metadata table created");
        Ok(created)
    }

    /// Table description together with its columns.
    pub async fn get_table(&self, id: Uuid) -> Result<MetadataTableWithColumns, DataplatError> {
        let req = ApiRequest::get(format!("{METADATA_PATH}{id}"))
            .on_failure("Failed to fetch metadata table");
        self.client.send(req).await
    }

    pub async fn list_tables(&self, page: Pagination) -> Result<Vec<MetadataTable>, DataplatError> {
        let req = ApiRequest::get(METADATA_PATH)
            .query(page.to_query())
            .on_failure("Failed to fetch metadata tables");
        self.client.send(req).await
    }

    pub async fn update_table(
        &self,
        id: Uuid,
        update: &MetadataTableUpdate,
    ) -> Result<MetadataTable, DataplatError> {
        let req = ApiRequest::put(format!("{METADATA_PATH}{id}"))
            .json(update)?
            .on_failure("Failed to update metadata table");
        let updated: MetadataTable = self.client.send(req).await?;
        self.client
            .notify_success("Metadata table updated successfully");
        Ok(updated)
    }

    pub async fn delete_table(&self, id: Uuid) -> Result<(), DataplatError> {
        let req = ApiRequest::delete(format!("{METADATA_PATH}{id}"))
            .on_failure("Failed to delete metadata table");
        self.client.send_unit(req).await?;
        self.client
            .notify_success("Metadata table deleted successfully");
        info!(%id, "metadata table deleted");
        Ok(())
    }

    pub async fn create_column(
        &self,
        table_id: Uuid,
        column: &MetadataColumnCreate,
    ) -> Result<MetadataColumn, DataplatError> {
        let req = ApiRequest::post(format!("{METADATA_PATH}{table_id}/columns/"))
            .json(column)?
            .on_failure("Failed to create column");
        let created: MetadataColumn = self.client.send(req).await?;
        self.client.notify_success("Column created successfully");
        Ok(created)
    }

    pub async fn list_columns(&self, table_id: Uuid) -> Result<Vec<MetadataColumn>, DataplatError> {
        let req = ApiRequest::get(format!("{METADATA_PATH}{table_id}/columns/"))
            .on_failure("Failed to fetch columns");
        self.client.send(req).await
    }

    /// Columns are addressed by their sequence number, not by table.
    pub async fn update_column(
        &self,
        seq: i64,
        update: &MetadataColumnUpdate,
    ) -> Result<MetadataColumn, DataplatError> {
        let req = ApiRequest::put(format!("{METADATA_PATH}columns/{seq}"))
            .json(update)?
            .on_failure("Failed to update column");
        let updated: MetadataColumn = self.client.send(req).await?;
        self.client.notify_success("Column updated successfully");
        Ok(updated)
    }

    pub async fn delete_column(&self, seq: i64) -> Result<(), DataplatError> {
        let req = ApiRequest::delete(format!("{METADATA_PATH}columns/{seq}"))
            .on_failure("Failed to delete column");
        self.client.send_unit(req).await?;
        self.client.notify_success("Column deleted successfully");
        Ok(())
    }

    /// Read a page of rows from the table registered under `table_name`.
    pub async fn query_table(
        &self,
        table_name: &str,
        query: &TableQuery,
    ) -> Result<TableData, DataplatError> {
        let path = format!("{METADATA_PATH}{}/query", encode_segment(table_name));
        let req = ApiRequest::post(path)
            .json(query)?
            .on_failure("Failed to query table data");
        self.client.send(req).await
    }
}
