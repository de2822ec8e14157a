pub mod auth;
pub mod common;
pub mod connection;
pub mod envelope;
pub mod metadata;

pub use auth::{LoginRequest, ResetPasswordRequest, TokenResponse, User, UserCreate};
pub use common::Pagination;
pub use connection::{
    Connection, ConnectionCreate, ConnectionTest, ConnectionTestResult, ConnectionUpdate, DbType,
};
pub use metadata::{
    MetadataColumn, MetadataColumnCreate, MetadataColumnUpdate, MetadataTable,
    MetadataTableCreate, MetadataTableUpdate, MetadataTableWithColumns, SortOrder, TableData,
    TableQuery,
};
