#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, NaiveDate, TimeZone};
use once_cell::sync::Lazy;
use output_tracker::core::LedgerSession;
use tempfile::TempDir;
use tracker_core::Clock;
use tracker_storage_csv::CsvLedgerStorage;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique directory that is cleaned up when the test binary exits.
pub fn test_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// A clock whose date the test can move forward.
#[derive(Clone)]
pub struct ManualClock(Arc<Mutex<DateTime<Local>>>);

impl ManualClock {
    pub fn on(year: i32, month: u32, day: u32) -> Self {
        let now = Local
            .with_ymd_and_hms(year, month, day, 9, 0, 0)
            .single()
            .expect("valid local time");
        ManualClock(Arc::new(Mutex::new(now)))
    }

    pub fn advance_days(&self, days: i64) {
        let mut now = self.0.lock().expect("lock clock");
        *now += chrono::Duration::days(days);
    }

    pub fn date(&self) -> NaiveDate {
        self.today()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Local> {
        *self.0.lock().expect("lock clock")
    }
}

/// Opens a CSV-backed session in a fresh directory. Returns the data file path too.
pub fn open_session(clock: &ManualClock) -> (LedgerSession, PathBuf) {
    let path = test_dir().join("output_progress.csv");
    let session = reopen_session(&path, clock);
    (session, path)
}

pub fn reopen_session(path: &PathBuf, clock: &ManualClock) -> LedgerSession {
    LedgerSession::open(
        Box::new(CsvLedgerStorage::new(path.clone())),
        Box::new(clock.clone()),
    )
    .expect("open session")
}
