//! Service status rows written by the database status reporter.

use anyhow::Result;
use sqlx::Row;
use tracing::{debug, error};

use super::records::ServiceStatusRecord;
use super::Database;

impl Database {
    pub async fn store_service_status(&self, record: &ServiceStatusRecord) -> Result<()> {
        debug!("Storing service status for: {}", record.name);

        match sqlx::query(
            r#"
            INSERT OR REPLACE INTO service_status (
                name, instance_id, executable, version, pid,
                status, metadata, last_update
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.name)
        .bind(&record.instance_id)
        .bind(&record.executable)
        .bind(&record.version)
        .bind(record.pid)
        .bind(&record.status)
        .bind(&record.metadata)
        .bind(record.last_update)
        .execute(&self.pool)
        .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Failed to store service status for {}: {}", record.name, e);
                Err(e.into())
            }
        }
    }

    pub async fn get_service_status(&self, name: &str) -> Result<Vec<ServiceStatusRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT name, instance_id, executable, version, pid,
                   status, metadata, last_update
            FROM service_status
            WHERE name = ?
            ORDER BY last_update DESC
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(ServiceStatusRecord {
                name: row.try_get("name")?,
                instance_id: row.try_get("instance_id")?,
                executable: row.try_get("executable")?,
                version: row.try_get("version")?,
                pid: row.try_get("pid")?,
                status: row.try_get("status")?,
                metadata: row.try_get("metadata")?,
                last_update: row.try_get("last_update")?,
            });
        }
        Ok(records)
    }
}
