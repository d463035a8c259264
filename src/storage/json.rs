//! File-backed JSON snapshot persistence.

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::protocol::NeighborId;
use crate::routing::Snapshot;
use crate::storage::SnapshotStore;

/// The serialized document: routes and ordering keyed by each identity's
/// string rendering. A route `x -> y` appears once as `"x": "y"`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotDoc {
    routes_map: BTreeMap<String, String>,
    ordered_neighbors_list: Vec<String>,
}

/// A [`SnapshotStore`] backed by a single JSON file
///
/// Identities are written using their `Display` rendering and reconstructed
/// with `From<String>`, so the identity type must round-trip through its
/// string form. Loaded snapshots are validated before they are returned.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store reading and writing the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file path this store reads and writes
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<N> SnapshotStore<N> for JsonFileStore
where
    N: NeighborId + From<String>,
{
    fn store(&self, snapshot: &Snapshot<N>) -> Result<()> {
        let doc = SnapshotDoc {
            routes_map: snapshot
                .routes()
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            ordered_neighbors_list: snapshot
                .ordered_neighbors()
                .iter()
                .map(|n| n.to_string())
                .collect(),
        };

        let text = serde_json::to_string_pretty(&doc).map_err(into_io)?;
        std::fs::write(&self.path, text)?;

        Ok(())
    }

    fn load(&self) -> Result<Snapshot<N>> {
        let text = std::fs::read_to_string(&self.path)?;
        let doc: SnapshotDoc = serde_json::from_str(&text).map_err(into_io)?;

        let routes: HashMap<N, N> = doc
            .routes_map
            .into_iter()
            .map(|(from, to)| (N::from(from), N::from(to)))
            .collect();
        let ordered = doc
            .ordered_neighbors_list
            .into_iter()
            .map(N::from)
            .collect();

        let snapshot = Snapshot::new(routes, ordered);
        snapshot.validate()?;

        Ok(snapshot)
    }
}

fn into_io(err: serde_json::Error) -> Error {
    Error::Io(io::Error::new(io::ErrorKind::InvalidData, err))
}
