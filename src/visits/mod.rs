use crate::app::config::{ServerConfig, VisitStoreKind};
use crate::app::time::now_millis;
use anyhow::Context;
use dashmap::DashMap;
use serde::Serialize;
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    pub ip: String,
    pub first_seen: i64,
    pub last_seen: i64,
    pub visit_count: i64,
}

/// Per-IP visit counter. Recording is best-effort and never touches game state.
#[derive(Debug, Clone)]
pub enum VisitStore {
    Sqlite(SqlitePool),
    Memory(Arc<DashMap<String, VisitRecord>>),
}

impl VisitStore {
    pub async fn connect(config: &ServerConfig) -> anyhow::Result<Self> {
        match config.visit_store {
            VisitStoreKind::Memory => Ok(Self::memory()),
            VisitStoreKind::Sqlite => Self::sqlite(&config.database_url).await,
        }
    }

    pub fn memory() -> Self {
        Self::Memory(Arc::new(DashMap::new()))
    }

    pub async fn sqlite(database_url: &str) -> anyhow::Result<Self> {
        ensure_db_dir(database_url)?;
        let db = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .with_context(|| format!("failed to open visit database {database_url}"))?;
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("failed to run visit migrations")?;
        Ok(Self::Sqlite(db))
    }

    pub async fn record_visit(&self, ip: &str, now: i64) -> anyhow::Result<()> {
        match self {
            Self::Sqlite(db) => {
                sqlx::query(
                    "INSERT INTO visits (ip, first_seen, last_seen, visit_count) VALUES (?, ?, ?, 1) \
                     ON CONFLICT(ip) DO UPDATE SET last_seen = excluded.last_seen, \
                     visit_count = visits.visit_count + 1",
                )
                .bind(ip)
                .bind(now)
                .bind(now)
                .execute(db)
                .await
                .context("failed to record visit")?;
            }
            Self::Memory(records) => {
                records
                    .entry(ip.to_string())
                    .and_modify(|record| {
                        record.last_seen = now;
                        record.visit_count += 1;
                    })
                    .or_insert_with(|| VisitRecord {
                        ip: ip.to_string(),
                        first_seen: now,
                        last_seen: now,
                        visit_count: 1,
                    });
            }
        }
        Ok(())
    }

    /// Fire-and-forget variant used by the socket path.
    pub fn record_in_background(&self, ip: String) {
        let store = self.clone();
        tokio::spawn(async move {
            if let Err(error) = store.record_visit(&ip, now_millis()).await {
                tracing::warn!(?error, ip, "visit tracking failed");
            }
        });
    }

    /// All visitors, most recently seen first.
    pub async fn list(&self) -> anyhow::Result<Vec<VisitRecord>> {
        match self {
            Self::Sqlite(db) => {
                let rows = sqlx::query(
                    "SELECT ip, first_seen, last_seen, visit_count FROM visits \
                     ORDER BY last_seen DESC, ip ASC",
                )
                .fetch_all(db)
                .await
                .context("failed to load visits")?;
                rows.into_iter()
                    .map(|row| -> anyhow::Result<VisitRecord> {
                        Ok(VisitRecord {
                            ip: row.try_get("ip")?,
                            first_seen: row.try_get("first_seen")?,
                            last_seen: row.try_get("last_seen")?,
                            visit_count: row.try_get("visit_count")?,
                        })
                    })
                    .collect()
            }
            Self::Memory(records) => {
                let mut visits: Vec<VisitRecord> =
                    records.iter().map(|entry| entry.value().clone()).collect();
                visits.sort_by(|a, b| b.last_seen.cmp(&a.last_seen).then_with(|| a.ip.cmp(&b.ip)));
                Ok(visits)
            }
        }
    }
}

fn ensure_db_dir(database_url: &str) -> anyhow::Result<()> {
    if database_url.starts_with("sqlite::memory:") {
        return Ok(());
    }
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"));
    let Some(path) = path else { return Ok(()) };
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }
    let db_path = PathBuf::from(path);
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    if !db_path.exists() {
        std::fs::File::create(&db_path)
            .with_context(|| format!("failed to create {}", db_path.display()))?;
    }
    Ok(())
}
