mod common;

use common::{client_for, drain};
use dataplat_client::types::{
    MetadataColumnUpdate, MetadataTableCreate, Pagination, SortOrder, TableQuery,
};
use dataplat_client::{ApiClient, ClientEvent, Notice, Session};
use serde_json::json;
use url::Url;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn setup() -> (MockServer, ApiClient, tokio::sync::broadcast::Receiver<ClientEvent>) {
    let server = MockServer::start().await;
    let session = Session::in_memory();
    session.set("meta-token").await;
    let (client, rx) = client_for(Url::parse(&server.uri()).unwrap(), session);
    (server, client, rx)
}

fn envelope(data: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"code": 200, "message": "success", "data": data}))
}

fn table_json(id: Uuid, connection_id: Uuid) -> serde_json::Value {
    json!({
        "id": id,
        "name": "students",
        "database_name": "school",
        "table_name": "students_performance",
        "description": null,
        "connection_id": connection_id,
        "display_name": "Students"
    })
}

#[tokio::test]
async fn list_and_create_tables() {
    let (server, client, mut rx) = setup().await;
    let id = Uuid::new_v4();
    let connection_id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/resources/metadata/"))
        .and(query_param("skip", "0"))
        .and(query_param("limit", "100"))
        .and(header("authorization", "Bearer meta-token"))
        .respond_with(envelope(json!([table_json(id, connection_id)])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/resources/metadata/"))
        .and(body_json(json!({
            "name": "students",
            "database_name": "school",
            "table_name": "students_performance",
            "connection_id": connection_id,
            "display_name": "Students"
        })))
        .respond_with(envelope(table_json(id, connection_id)))
        .expect(1)
        .mount(&server)
        .await;

    let tables = client.metadata().list_tables(Pagination::default()).await.unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].table_name, "students_performance");

    let created = client
        .metadata()
        .create_table(&MetadataTableCreate {
            name: "students".into(),
            database_name: "school".into(),
            table_name: "students_performance".into(),
            description: None,
            connection_id,
            display_name: Some("Students".into()),
        })
        .await
        .unwrap();
    assert_eq!(created, tables[0]);
    assert_eq!(
        drain(&mut rx),
        vec![ClientEvent::Notice(Notice::success(
            "Metadata table created successfully"
        ))]
    );
}

#[tokio::test]
async fn get_table_includes_columns() {
    let (server, client, _rx) = setup().await;
    let id = Uuid::new_v4();
    let mut body = table_json(id, Uuid::new_v4());
    body["columns"] = json!([{
        "seq": 7,
        "table_id": id,
        "column_name": "math score",
        "display_name": null,
        "data_type": "integer",
        "ordinal_position": 6,
        "is_nullable": "YES",
        "state": "active",
        "column_default": null,
        "description": null
    }]);

    Mock::given(method("GET"))
        .and(path(format!("/resources/metadata/{id}")))
        .respond_with(envelope(body))
        .mount(&server)
        .await;

    let table = client.metadata().get_table(id).await.unwrap();
    assert_eq!(table.table.id, id);
    assert_eq!(table.columns.len(), 1);
    assert_eq!(table.columns[0].column_name, "math score");
    assert_eq!(table.columns[0].seq, 7);
}

#[tokio::test]
async fn column_updates_are_addressed_by_sequence() {
    let (server, client, mut rx) = setup().await;
    let table_id = Uuid::new_v4();

    Mock::given(method("PUT"))
        .and(path("/resources/metadata/columns/7"))
        .and(body_json(json!({"display_name": "Math"})))
        .respond_with(envelope(json!({
            "seq": 7,
            "table_id": table_id,
            "column_name": "math score",
            "display_name": "Math",
            "data_type": "integer",
            "ordinal_position": 6
        })))
        .expect(1)
        .mount(&server)
        .await;

    let update = MetadataColumnUpdate {
        display_name: Some("Math".into()),
        ..Default::default()
    };
    let column = client.metadata().update_column(7, &update).await.unwrap();
    assert_eq!(column.display_name.as_deref(), Some("Math"));
    assert_eq!(column.is_nullable, None);
    assert_eq!(
        drain(&mut rx),
        vec![ClientEvent::Notice(Notice::success("Column updated successfully"))]
    );
}

#[tokio::test]
async fn query_table_encodes_name_and_keeps_data_payload() {
    let (server, client, _rx) = setup().await;

    Mock::given(method("POST"))
        .and(path("/resources/metadata/sales%202024/query"))
        .and(body_json(json!({
            "page": 2,
            "page_size": 5,
            "sort_by": "amount",
            "sort_order": "asc"
        })))
        .respond_with(envelope(json!({
            "data": [{"region": "north", "amount": 10}],
            "total": 6,
            "page": 2,
            "page_size": 5,
            "total_pages": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = TableQuery::default()
        .page(2, 5)
        .sort("amount", SortOrder::Asc);
    let rows = client
        .metadata()
        .query_table("sales 2024", &query)
        .await
        .unwrap();
    assert_eq!(rows.total, 6);
    assert_eq!(rows.total_pages, 2);
    assert_eq!(rows.data[0]["region"], "north");
}

#[tokio::test]
async fn missing_table_reports_backend_detail() {
    let (server, client, mut rx) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path(format!("/resources/metadata/{id}")))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Metadata table not found"})),
        )
        .mount(&server)
        .await;

    client.metadata().delete_table(id).await.unwrap_err();
    assert!(client.session().is_authenticated());
    assert_eq!(
        drain(&mut rx),
        vec![ClientEvent::Notice(Notice::error("Metadata table not found"))]
    );
}
