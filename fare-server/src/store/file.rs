//! Disk-backed store using a JSON snapshot.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::{
    Cost, FareEntry, NewStation, RouteKey, RouteRecord, Station, StationId, StationName,
};

use super::tables::{Snapshot, Tables};
use super::{FareStore, RouteStore, StationStore, StoreError};

/// Store that keeps tables in memory and rewrites a JSON snapshot after
/// every successful insert.
///
/// The snapshot is written while the write lock is held, so the file
/// always reflects a prefix of the insert order. An insert becomes
/// visible only after its snapshot has been written.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    tables: RwLock<Tables>,
}

impl JsonFileStore {
    /// Open a store at `path`.
    ///
    /// A missing file yields an empty store; the file is created on the
    /// first insert.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let tables = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let snapshot: Snapshot = serde_json::from_str(&contents)?;
                Tables::from_snapshot(snapshot)?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Tables::new(),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        Ok(Self {
            path,
            tables: RwLock::new(tables),
        })
    }

    /// Get the snapshot file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Apply `insert` to a copy of the tables and commit the copy only
    /// once its snapshot is on disk. A failed write leaves no trace.
    async fn insert_with<T, F>(&self, insert: F) -> Result<Option<T>, StoreError>
    where
        T: Send,
        F: FnOnce(&mut Tables) -> Result<Option<T>, StoreError> + Send,
    {
        let mut tables = self.tables.write().await;
        let mut staged = tables.clone();

        let inserted = insert(&mut staged)?;
        if inserted.is_some() {
            self.save(&staged)?;
            *tables = staged;
        }
        Ok(inserted)
    }

    /// Write the snapshot atomically (temp file, then rename).
    ///
    /// Creates parent directories if they don't exist.
    fn save(&self, tables: &Tables) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(&tables.snapshot())?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StoreError::Io { path: tmp, source })?;

        debug!(path = %self.path.display(), "snapshot written");
        Ok(())
    }
}

#[async_trait]
impl StationStore for JsonFileStore {
    async fn insert_station(&self, station: NewStation) -> Result<Option<Station>, StoreError> {
        self.insert_with(move |t| t.insert_station(station)).await
    }

    async fn station_by_id(&self, id: StationId) -> Result<Option<Station>, StoreError> {
        Ok(self.tables.read().await.station_by_id(id).cloned())
    }

    async fn station_by_name(&self, name: &StationName) -> Result<Option<Station>, StoreError> {
        Ok(self.tables.read().await.station_by_name(name).cloned())
    }

    async fn stations(&self) -> Result<Vec<Station>, StoreError> {
        Ok(self.tables.read().await.stations().to_vec())
    }
}

#[async_trait]
impl FareStore for JsonFileStore {
    async fn insert_fare(
        &self,
        from: StationId,
        to: StationId,
        cost: Cost,
    ) -> Result<Option<FareEntry>, StoreError> {
        self.insert_with(move |t| t.insert_fare(from, to, cost)).await
    }

    async fn fare(&self, from: StationId, to: StationId) -> Result<Option<FareEntry>, StoreError> {
        Ok(self.tables.read().await.fare(from, to).cloned())
    }
}

#[async_trait]
impl RouteStore for JsonFileStore {
    async fn insert_route(&self, key: RouteKey) -> Result<Option<RouteRecord>, StoreError> {
        self.insert_with(move |t| t.insert_route(key)).await
    }

    async fn route(&self, key: &RouteKey) -> Result<Option<RouteRecord>, StoreError> {
        Ok(self.tables.read().await.route(key).cloned())
    }
}
