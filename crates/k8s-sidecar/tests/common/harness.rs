//! Test harness for isolated materializer runs.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use assert_fs::TempDir;

use k8s_sidecar::config::DEFAULT_FOLDER_ANNOTATION;
use k8s_sidecar::{FileMaterializer, MaterializerOptions, ObjectMeta};

pub struct MaterializerHarness {
    /// Root of everything the test writes.
    temp_dir: TempDir,
    /// Default target folder inside `temp_dir`.
    pub target_dir: PathBuf,
    pub materializer: FileMaterializer,
}

impl MaterializerHarness {
    pub fn new() -> Self {
        Self::with_options(|_| {})
    }

    /// Builds a harness after letting the caller adjust the options.
    pub fn with_options(adjust: impl FnOnce(&mut MaterializerOptions)) -> Self {
        k8s_sidecar::logging::init_test_logging();

        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let target = temp_dir.child("target");
        target.create_dir_all().expect("Failed to create target dir");
        let target_dir = target.path().to_path_buf();

        let mut options = MaterializerOptions::new(&target_dir);
        adjust(&mut options);

        Self {
            temp_dir,
            target_dir,
            materializer: FileMaterializer::new(options),
        }
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A folder inside the temp dir, for folder-annotation tests.
    pub fn other_folder(&self, name: &str) -> PathBuf {
        self.temp_dir.child(name).path().to_path_buf()
    }

    /// Metadata that routes a resource into `folder`.
    pub fn meta_for_folder(&self, name: &str, folder: &Path) -> ObjectMeta {
        ObjectMeta::new(name).with_annotation(DEFAULT_FOLDER_ANNOTATION, folder.to_string_lossy())
    }

    /// Pre-populates a file in the default target folder.
    pub fn seed(&self, name: &str, content: &str) {
        self.temp_dir
            .child("target")
            .child(name)
            .write_str(content)
            .expect("Failed to seed file");
    }

    pub fn read(&self, name: &str) -> String {
        std::fs::read_to_string(self.target_dir.join(name)).expect("Failed to read target file")
    }

    pub fn exists(&self, name: &str) -> bool {
        self.target_dir.join(name).exists()
    }

    /// Sorted names of the files in `dir`.
    pub fn file_names_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .expect("Failed to list directory")
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn file_names(&self) -> Vec<String> {
        Self::file_names_in(&self.target_dir)
    }
}
