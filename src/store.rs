//! The folder of images being browsed and the cursor into it.

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{CropperError, Result};

/// Extensions that are picked up from the chosen folder.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

pub fn is_supported(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| ext.eq_ignore_ascii_case(supported))
        })
}

/// Lists the supported image files in `dir`, in directory-listing order.
pub fn list(dir: &Path) -> Result<Vec<String>> {
    let unreadable = |source| CropperError::DirectoryUnreadable {
        path: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        // Follows symlinks, unlike DirEntry::file_type.
        if !entry.path().is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(name) => debug!("Skipping non UTF-8 file name {:?}", name),
        }
    }
    Ok(filter_supported(names))
}

fn filter_supported(names: impl IntoIterator<Item = String>) -> Vec<String> {
    names.into_iter().filter(|name| is_supported(name)).collect()
}

#[derive(Debug)]
pub struct ImageStore {
    dir: PathBuf,
    files: Vec<String>,
    index: usize,
}

impl ImageStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let files = list(&dir)?;
        Self::from_names(dir, files)
    }

    /// Builds a store from an already listed set of names, keeping their order.
    pub fn from_names(dir: impl Into<PathBuf>, names: Vec<String>) -> Result<Self> {
        let dir = dir.into();
        let files = filter_supported(names);
        if files.is_empty() {
            return Err(CropperError::NoSupportedImages(dir));
        }
        Ok(Self {
            dir,
            files,
            index: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &str {
        &self.files[self.index]
    }

    pub fn current_path(&self) -> PathBuf {
        self.dir.join(self.current())
    }

    pub fn next(&mut self) -> &str {
        self.index = (self.index + 1) % self.files.len();
        self.current()
    }

    pub fn previous(&mut self) -> &str {
        self.index = (self.index + self.files.len() - 1) % self.files.len();
        self.current()
    }
}
