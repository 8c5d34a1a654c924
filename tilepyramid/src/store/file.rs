//! Filesystem tile store.

use super::{replace::replace_file, StoreError, TileStore};
use crate::coord::TileCoord;
use crate::format::Format;
use rand::Rng;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Tiles laid out as `{base}/{layer}/{zoom}/{column}/{row}.{ext}`.
///
/// Each write stages into a sibling swap file unique to the process, thread
/// and a random suffix, then replaces the target in one step. Readers see
/// either the previous artifact or the new one.
#[derive(Debug, Clone)]
pub struct FileStore {
    base_path: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let base_path = base_path.into();
        if base_path.exists() && !base_path.is_dir() {
            return Err(StoreError::NotADirectory(base_path));
        }
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Directory holding every row of `coord`'s column.
    pub fn dir_path(&self, coord: TileCoord, layer: &str) -> PathBuf {
        self.base_path
            .join(layer)
            .join(coord.zoom().to_string())
            .join(coord.column().to_string())
    }

    pub fn file_path(&self, coord: TileCoord, format: &dyn Format, layer: &str) -> PathBuf {
        self.dir_path(coord, layer)
            .join(format!("{}.{}", coord.row(), format.extension()))
    }

    fn swap_path(target: &Path) -> PathBuf {
        let suffix: u32 = rand::thread_rng().gen_range(1..=1_000_000);
        let mut name = target.as_os_str().to_os_string();
        name.push(format!(
            ".swp-{}-{}-{}",
            std::process::id(),
            thread_number(),
            suffix
        ));
        PathBuf::from(name)
    }
}

/// Numeric part of the current thread's id.
fn thread_number() -> String {
    let id = format!("{:?}", std::thread::current().id());
    id.chars().filter(char::is_ascii_digit).collect()
}

impl TileStore for FileStore {
    fn write_tile(
        &self,
        data: &[u8],
        coord: TileCoord,
        format: &dyn Format,
        layer: &str,
    ) -> Result<(), StoreError> {
        // create_dir_all treats an existing directory as success
        fs::create_dir_all(self.dir_path(coord, layer))?;

        let target = self.file_path(coord, format, layer);
        let swap = Self::swap_path(&target);

        let result = fs::write(&swap, data)
            .map_err(StoreError::Io)
            .and_then(|()| replace_file(&swap, &target));

        if let Err(e) = result {
            let _ = fs::remove_file(&swap);
            return Err(e);
        }

        debug!(
            path = %target.display(),
            bytes = data.len(),
            "Wrote tile"
        );
        Ok(())
    }

    fn read_tile(
        &self,
        coord: TileCoord,
        format: &dyn Format,
        layer: &str,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        let path = self.file_path(coord, format, layer);
        match fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn delete_tiles(
        &self,
        coords: &[TileCoord],
        format: &dyn Format,
        layer: &str,
    ) -> Result<usize, StoreError> {
        let mut deleted = 0;
        for &coord in coords {
            let path = self.file_path(coord, format, layer);
            match fs::remove_file(&path) {
                Ok(()) => deleted += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(StoreError::Io(e)),
            }
        }
        debug!(layer, requested = coords.len(), deleted, "Deleted tiles");
        Ok(deleted)
    }
}
