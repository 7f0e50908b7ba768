//! Keys of the persisted blobs.

/// The values the tracker persists, one blob per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    DailyData,
    History,
    WorkoutLogs,
    ActiveSession,
}

impl StoreKey {
    pub const ALL: [StoreKey; 4] = [
        StoreKey::DailyData,
        StoreKey::History,
        StoreKey::WorkoutLogs,
        StoreKey::ActiveSession,
    ];

    /// Returns the key name as written to storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::DailyData => "dailyData",
            StoreKey::History => "history",
            StoreKey::WorkoutLogs => "workoutLogs",
            StoreKey::ActiveSession => "activeSession",
        }
    }

    /// Returns the filename used by file-backed storage.
    pub fn filename(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl std::fmt::Display for StoreKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
