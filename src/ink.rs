//! Naming policy for annotated ("inked") images.
//!
//! Saving an annotated image writes `<stem>_Inked<suffix>` beside the original.
//! When a batch of paths is opened, an inked file stands in for its original:
//! the original is skipped if both are present, and the inked grid keeps the
//! original's name as its base path so later saves overwrite the same inked file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::constants::INK_SUFFIX;

/// Path of the inked counterpart of `base`: `dir/stem_Inked.ext`.
pub fn ink_path(base: &Path) -> PathBuf {
    let mut name = OsString::new();
    if let Some(stem) = base.file_stem() {
        name.push(stem);
    }
    name.push(INK_SUFFIX);
    if let Some(ext) = base.extension() {
        name.push(".");
        name.push(ext);
    }
    base.with_file_name(name)
}

/// Whether the file stem ends in the ink suffix.
pub fn is_inked(path: &Path) -> bool {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .is_some_and(|stem| stem.ends_with(INK_SUFFIX) && stem.len() > INK_SUFFIX.len())
}

/// The original path an inked path was derived from, or `None` if `path` is not inked.
pub fn remove_ink(path: &Path) -> Option<PathBuf> {
    if !is_inked(path) {
        return None;
    }

    let stem = path.file_stem()?.to_str()?;
    let mut name = OsString::from(&stem[..stem.len() - INK_SUFFIX.len()]);
    if let Some(ext) = path.extension() {
        name.push(".");
        name.push(ext);
    }
    Some(path.with_file_name(name))
}

/// One image to open, with the base path override for inked files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenRequest {
    /// File to decode
    pub image_path: PathBuf,
    /// Path saves are derived from, when different from `image_path`
    pub base_path: Option<PathBuf>,
}

/// Result of applying the ink policy to a batch of paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenPlan {
    /// Images to open, in batch order
    pub requests: Vec<OpenRequest>,
    /// Originals skipped because their inked version is in the batch
    pub superseded: Vec<PathBuf>,
}

/// Decide which files of a batch to open and with which base paths.
pub fn plan_open(paths: &[PathBuf]) -> OpenPlan {
    let mut plan = OpenPlan::default();

    for path in paths {
        if paths.contains(&ink_path(path)) {
            log::debug!("Skipping {:?}: inked version is in the batch", path);
            plan.superseded.push(path.clone());
        } else if let Some(base) = remove_ink(path) {
            plan.requests.push(OpenRequest {
                image_path: path.clone(),
                base_path: Some(base),
            });
        } else {
            plan.requests.push(OpenRequest {
                image_path: path.clone(),
                base_path: None,
            });
        }
    }

    plan
}
