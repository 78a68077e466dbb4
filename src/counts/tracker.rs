//! Count bookkeeping for the focused image, and the files it is saved to.

use std::path::{Path, PathBuf};

use super::{CountError, CountLedger, GameCountData};
use crate::constants::{COUNTS_FILE_NAME, SUMMARY_FILE_NAME, SUMMARY_SEPARATOR};

/// Records counts against whichever image currently has focus.
#[derive(Debug, Clone, Default)]
pub struct CountTracker {
    ledger: CountLedger,
    /// File name of the focused image
    current_image: String,
    counts_path: Option<PathBuf>,
    summary_path: Option<PathBuf>,
}

impl CountTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch the image new counts are recorded against.
    pub fn on_focus_changed(&mut self, image_key: &str) {
        if self.current_image != image_key {
            log::trace!("Count tracker now on {:?}", image_key);
            self.current_image = image_key.to_string();
        }
    }

    pub fn current_image(&self) -> &str {
        &self.current_image
    }

    pub fn ledger(&self) -> &CountLedger {
        &self.ledger
    }

    /// Entries for the focused image.
    pub fn current_entries(&self) -> &[GameCountData] {
        self.ledger
            .get(&self.current_image)
            .map(|counts| counts.entries())
            .unwrap_or(&[])
    }

    /// Record animals for the focused image.
    ///
    /// A zero count is ignored and returns `Ok(false)`. More repeats than
    /// animals is rejected.
    pub fn add(&mut self, species: &str, count: u32, repeats: u32) -> Result<bool, CountError> {
        if count == 0 {
            return Ok(false);
        }
        if repeats > count {
            return Err(CountError::InvalidCount { count, repeats });
        }

        log::debug!(
            "Counted {} {} ({} repeats) in {:?}",
            count,
            species,
            repeats,
            self.current_image
        );
        self.ledger
            .add(&self.current_image, GameCountData::new(species, count, repeats))?;
        Ok(true)
    }

    /// Drop a species from the focused image.
    pub fn remove_species(&mut self, species: &str) -> Result<GameCountData, CountError> {
        self.ledger.remove_species(&self.current_image, species)
    }

    /// Forget every count. Files on disk are untouched until the next dump.
    pub fn clear(&mut self) {
        self.ledger.clear();
    }

    pub fn counts_path(&self) -> Option<&Path> {
        self.counts_path.as_deref()
    }

    /// Set the JSON dump target. The summary goes beside it unless set explicitly.
    pub fn set_counts_path(&mut self, path: impl Into<PathBuf>) {
        self.counts_path = Some(path.into());
    }

    pub fn set_summary_path(&mut self, path: impl Into<PathBuf>) {
        self.summary_path = Some(path.into());
    }

    /// Where the summary is written for a given counts file.
    pub fn summary_path_for(&self, counts_path: &Path) -> PathBuf {
        match &self.summary_path {
            Some(path) => path.clone(),
            None => counts_path
                .parent()
                .unwrap_or_else(|| Path::new(""))
                .join(SUMMARY_FILE_NAME),
        }
    }

    /// Replace all counts with the contents of `path` and dump there from now on.
    ///
    /// On a read or parse failure the current counts and paths are kept.
    pub fn load(&mut self, path: &Path) -> Result<(), CountError> {
        let json = std::fs::read_to_string(path)?;
        self.ledger = CountLedger::from_json(&json)?;
        self.counts_path = Some(path.to_path_buf());
        log::info!("Loaded counts from {:?}", path);
        Ok(())
    }

    /// Totals, a separator line, then the per-image listing.
    pub fn summarize(&self) -> String {
        format!(
            "{}\n{}\n{}",
            self.ledger.totals_summary(),
            SUMMARY_SEPARATOR,
            self.ledger
        )
    }

    /// Write the JSON counts and the text summary.
    ///
    /// Without a counts path this writes `counts.json` in the working
    /// directory and remembers it. Returns the counts path.
    pub fn dump(&mut self) -> Result<PathBuf, CountError> {
        let counts_path = match &self.counts_path {
            Some(path) => path.clone(),
            None => std::env::current_dir()?.join(COUNTS_FILE_NAME),
        };
        let summary_path = self.summary_path_for(&counts_path);

        std::fs::write(&counts_path, self.ledger.to_json()?)?;
        std::fs::write(&summary_path, self.summarize())?;

        log::info!("Wrote counts to {:?} and {:?}", counts_path, summary_path);
        self.counts_path = Some(counts_path.clone());
        Ok(counts_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("transect-counts-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_counts_follow_focus() {
        let mut tracker = CountTracker::new();
        tracker.on_focus_changed("a.jpg");
        tracker.add("Zebra", 4, 1).unwrap();
        tracker.on_focus_changed("b.jpg");
        tracker.add("Zebra", 2, 0).unwrap();

        assert_eq!(tracker.current_entries(), &[GameCountData::new("Zebra", 2, 0)]);
        tracker.on_focus_changed("a.jpg");
        assert_eq!(tracker.current_entries(), &[GameCountData::new("Zebra", 4, 1)]);
        tracker.on_focus_changed("c.jpg");
        assert!(tracker.current_entries().is_empty());
    }

    #[test]
    fn test_add_validation() {
        let mut tracker = CountTracker::new();
        tracker.on_focus_changed("a.jpg");

        assert!(!tracker.add("Kudu", 0, 0).unwrap());
        assert!(matches!(
            tracker.add("Kudu", 2, 3),
            Err(CountError::InvalidCount {
                count: 2,
                repeats: 3
            })
        ));
        assert!(tracker.ledger().is_empty());
    }

    #[test]
    fn test_add_overflow_keeps_entry() {
        let mut tracker = CountTracker::new();
        tracker.on_focus_changed("a.jpg");
        tracker.add("Buffalo", u32::MAX, 0).unwrap();

        assert!(matches!(
            tracker.add("Buffalo", 1, 0),
            Err(CountError::CountOverflow { .. })
        ));
        assert_eq!(tracker.current_entries()[0].count, u32::MAX);
    }

    #[test]
    fn test_overflowing_file_keeps_counts() {
        let dir = scratch_dir("overflow");
        let path = dir.join("counts.json");
        std::fs::write(
            &path,
            r#"{ "b.jpg": [
                { "Species": "Zebra", "Count": 4294967295 },
                { "Species": "Zebra", "Count": 1 }
            ] }"#,
        )
        .unwrap();

        let mut tracker = CountTracker::new();
        tracker.on_focus_changed("a.jpg");
        tracker.add("Rhino", 1, 0).unwrap();

        assert!(matches!(
            tracker.load(&path),
            Err(CountError::CountOverflow { .. })
        ));
        assert_eq!(tracker.current_entries().len(), 1);
        assert!(tracker.counts_path().is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_remove_and_clear() {
        let mut tracker = CountTracker::new();
        tracker.on_focus_changed("a.jpg");
        tracker.add("Kudu", 2, 0).unwrap();
        tracker.add("Eland", 1, 0).unwrap();

        assert_eq!(tracker.remove_species("Kudu").unwrap().count, 2);
        assert!(tracker.remove_species("Kudu").is_err());
        assert_eq!(tracker.current_entries().len(), 1);

        tracker.clear();
        assert!(tracker.ledger().is_empty());
    }

    #[test]
    fn test_summary_layout() {
        let mut tracker = CountTracker::new();
        tracker.on_focus_changed("a.jpg");
        tracker.add("Giraffe", 3, 1).unwrap();

        assert_eq!(
            tracker.summarize(),
            "2 Giraffe\n\n-------------------------\na.jpg\n\t3 Giraffe, (2 new)\n"
        );
    }

    #[test]
    fn test_dump_then_load() {
        let dir = scratch_dir("dump");
        let counts_path = dir.join("survey counts.json");

        let mut tracker = CountTracker::new();
        tracker.set_counts_path(&counts_path);
        tracker.on_focus_changed("a.jpg");
        tracker.add("Warthog", 6, 2).unwrap();

        assert_eq!(tracker.dump().unwrap(), counts_path);
        let summary = std::fs::read_to_string(dir.join(SUMMARY_FILE_NAME)).unwrap();
        assert!(summary.starts_with("4 Warthog\n"));

        let mut restored = CountTracker::new();
        restored.load(&counts_path).unwrap();
        assert_eq!(restored.ledger(), tracker.ledger());
        assert_eq!(restored.counts_path(), Some(counts_path.as_path()));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_bad_json_keeps_counts() {
        let dir = scratch_dir("bad");
        let bad = dir.join("broken.json");
        std::fs::write(&bad, "[1, 2").unwrap();

        let mut tracker = CountTracker::new();
        tracker.on_focus_changed("a.jpg");
        tracker.add("Rhino", 1, 0).unwrap();

        assert!(matches!(tracker.load(&bad), Err(CountError::Json(_))));
        assert_eq!(tracker.current_entries().len(), 1);
        assert!(tracker.counts_path().is_none());

        assert!(matches!(
            tracker.load(&dir.join("missing.json")),
            Err(CountError::Io(_))
        ));

        std::fs::remove_dir_all(&dir).ok();
    }
}
