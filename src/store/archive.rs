use super::StationStore;
use crate::{
    config::StoreConfig,
    error::{AnalysisError, Result},
};
use std::{
    collections::{hash_map::Entry, HashMap},
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

/// A directory of per-station historical data files, `XXXX.gz`, loaded on first use.
///
/// Once loaded a station's store is kept for the life of the archive.
#[derive(Debug)]
pub struct Archive {
    data_dir: PathBuf,
    config: StoreConfig,
    station_ids: Vec<String>,
    stations: HashMap<String, StationStore>,
}

impl Archive {
    /// Open an archive.
    ///
    /// `stations` is a colon separated list of station identifiers. If it is empty the data
    /// directory is surveyed for files named with four upper case letters and a `.gz`
    /// extension.
    pub fn new<P: AsRef<Path>>(data_dir: P, stations: &str, config: StoreConfig) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();

        let station_ids = if stations.trim().is_empty() {
            survey(&data_dir)?
        } else {
            stations
                .split(':')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_owned)
                .collect()
        };

        Ok(Archive {
            data_dir,
            config,
            station_ids,
            stations: HashMap::new(),
        })
    }

    /// The stations available, in listing order.
    pub fn station_ids(&self) -> &[String] {
        &self.station_ids
    }

    /// The directory holding the data files.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get a station's store, reading its data file the first time it is requested.
    pub fn station(&mut self, id: &str) -> Result<&StationStore> {
        if !self.station_ids.iter().any(|s| s == id) && !self.stations.contains_key(id) {
            return Err(AnalysisError::UnknownStation(id.to_owned()));
        }

        match self.stations.entry(id.to_owned()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = self.data_dir.join(format!("{}.gz", id));
                let store = StationStore::read(id, self.config, &path)?;
                info!(station = id, records = store.len(), path = %path.display(), "loaded station");
                Ok(entry.insert(store))
            }
        }
    }

    /// Register a store built elsewhere, replacing any loaded store for the same station.
    pub fn insert(&mut self, store: StationStore) {
        let id = store.station().to_owned();
        if !self.station_ids.contains(&id) {
            self.station_ids.push(id.clone());
        }
        self.stations.insert(id, store);
    }

    /// True if the station's data has already been loaded.
    pub fn is_loaded(&self, id: &str) -> bool {
        self.stations.contains_key(id)
    }
}

/// The station identifier a data file name belongs to, if it is one.
pub(crate) fn station_id(file_name: &str) -> Option<&str> {
    let id = file_name.strip_suffix(".gz")?;
    if id.len() == 4 && id.bytes().all(|b| b.is_ascii_uppercase()) {
        Some(id)
    } else {
        None
    }
}

fn survey(data_dir: &Path) -> Result<Vec<String>> {
    let io_err = |source| AnalysisError::Io {
        path: data_dir.to_path_buf(),
        source,
    };

    let mut ids = Vec::new();
    for entry in fs::read_dir(data_dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if let Some(id) = entry.file_name().to_str().and_then(station_id) {
            ids.push(id.to_owned());
        }
    }
    ids.sort();

    Ok(ids)
}
