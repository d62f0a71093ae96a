//! PostGIS implementation of [`GeoStore`]

use super::client::PostGisClient;
use super::sql;
use crate::adapters::database::traits::GeoStore;
use crate::config::DatabaseConfig;
use crate::domain::{ClassifiedRecord, GeometryKind, RecordField, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use tokio_postgres::types::ToSql;

/// Layer tables in a PostGIS schema
pub struct PostGisStore {
    client: PostGisClient,
    schema: String,
    tables: [(GeometryKind, String); 3],
}

impl PostGisStore {
    /// Create a store over the configured schema and layer tables
    pub fn new(client: PostGisClient, config: &DatabaseConfig) -> Self {
        let tables = GeometryKind::ALL.map(|kind| (kind, config.table_for(kind).to_string()));
        Self {
            client,
            schema: config.schema.clone(),
            tables,
        }
    }

    fn table(&self, kind: GeometryKind) -> &str {
        self.tables
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, table)| table.as_str())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GeoStore for PostGisStore {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    fn table_name(&self, kind: GeometryKind) -> String {
        format!("{}.{}", self.schema, self.table(kind))
    }

    async fn table_exists(&self, kind: GeometryKind) -> Result<bool> {
        let client = self.client.get_connection().await?;
        let row = client
            .query_one(sql::table_exists(), &[&self.schema, &self.table(kind)])
            .await?;
        Ok(row.get(0))
    }

    async fn max_modified(&self, kind: GeometryKind) -> Result<Option<NaiveDate>> {
        if !self.table_exists(kind).await? {
            tracing::info!(table = %self.table_name(kind), "Table does not exist, skipping");
            return Ok(None);
        }

        let client = self.client.get_connection().await?;
        let row = client
            .query_one(&sql::max_modified(&self.schema, self.table(kind)), &[])
            .await?;
        Ok(row.get::<_, Option<NaiveDate>>(0))
    }

    async fn delete_modified_on(&self, date: NaiveDate) -> Result<u64> {
        let mut client = self.client.get_connection().await?;
        let tx = client.transaction().await?;

        let mut deleted = 0u64;
        for (kind, table) in &self.tables {
            let exists: bool = tx
                .query_one(sql::table_exists(), &[&self.schema, table])
                .await?
                .get(0);
            if !exists {
                continue;
            }

            let rows = tx
                .execute(&sql::delete_modified_on(&self.schema, table), &[&date])
                .await?;
            tracing::debug!(layer = %kind, table = %table, rows, "Deleted boundary rows");
            deleted += rows;
        }

        tx.commit().await?;
        Ok(deleted)
    }

    async fn append(&self, kind: GeometryKind, rows: &[ClassifiedRecord]) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let table = self.table(kind);
        let mut client = self.client.get_connection().await?;
        let tx = client.transaction().await?;

        tx.batch_execute(&format!(
            "{}; {}",
            sql::create_schema(&self.schema),
            sql::create_table(&self.schema, table)
        ))
        .await?;

        let statement = tx.prepare(&sql::insert(&self.schema, table)).await?;

        let mut inserted = 0u64;
        for row in rows {
            let fields: Vec<Option<&str>> = row.record.fields.iter().map(|(_, v)| v).collect();
            let modified = row.record.fields.modified_date();
            let derived = row.record.derived_values();
            let geometry = row.geometry_wkt();

            let mut params: Vec<&(dyn ToSql + Sync)> = Vec::with_capacity(fields.len() + 7);
            for (field, value) in RecordField::ALL.iter().zip(&fields) {
                if *field == RecordField::Modified {
                    params.push(&modified);
                } else {
                    params.push(value);
                }
            }
            for value in &derived {
                params.push(value);
            }
            params.push(&geometry);

            inserted += tx.execute(&statement, &params).await?;
        }

        tx.commit().await?;
        tracing::debug!(layer = %kind, table = %table, inserted, "Appended rows");
        Ok(inserted)
    }
}
