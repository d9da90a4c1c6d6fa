//! Test helpers for building incident databases in a scratch workspace.

use camino::{Utf8Path, Utf8PathBuf};
use saferoute_core::IncidentRecord;
use saferoute_core::test_support::write_incident_database;
use tempfile::TempDir;

/// Coordinates of the landmarks used across CLI tests, as `"lat,lng"`.
pub(super) const INDIA_GATE: &str = "28.6129,77.2295";
pub(super) const CONNAUGHT_PLACE: &str = "28.6304,77.2177";

#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Write `incidents` into `crime.db` and return its path.
    pub(super) fn incidents_db(&self, incidents: &[IncidentRecord]) -> Utf8PathBuf {
        let path = self.path("crime.db");
        write_incident_database(path.as_std_path(), incidents).expect("write incident database");
        path
    }
}
