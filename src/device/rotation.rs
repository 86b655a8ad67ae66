//! Screen rotation sources.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::models::Rotation;

use super::RotationSource;

/// Reads the console rotation from sysfs (`fbcon/rotate`).
#[derive(Debug, Clone)]
pub struct SysfsRotation {
    path: PathBuf,
    warned: bool,
}

impl SysfsRotation {
    /// Reads rotations from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            warned: false,
        }
    }

    /// File this source reads.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RotationSource for SysfsRotation {
    fn current(&mut self) -> Option<Rotation> {
        let parsed = fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| raw.trim().parse::<u8>().ok())
            .and_then(Rotation::from_index);
        if parsed.is_none() && !self.warned {
            warn!("Cannot read rotation from {}", self.path.display());
            self.warned = true;
        }
        parsed
    }
}

/// Always reports the same rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRotation(pub Rotation);

impl RotationSource for FixedRotation {
    fn current(&mut self) -> Option<Rotation> {
        Some(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_rotation_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rotate");
        fs::write(&path, "1\n").unwrap();
        let mut source = SysfsRotation::new(&path);
        assert_eq!(source.current(), Some(Rotation::ClockwiseQuarter));

        fs::write(&path, "3").unwrap();
        assert_eq!(source.current(), Some(Rotation::CounterClockwiseQuarter));
    }

    #[test]
    fn test_rejects_unknown_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rotate");
        fs::write(&path, "7").unwrap();
        assert_eq!(SysfsRotation::new(&path).current(), None);
        assert_eq!(SysfsRotation::new(dir.path().join("missing")).current(), None);
    }

    #[test]
    fn test_fixed_rotation() {
        assert_eq!(FixedRotation(Rotation::Half).current(), Some(Rotation::Half));
    }
}
