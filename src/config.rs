// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the configuration that tells the URDF reader where robot descriptions live.
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable which overrides the default description root.
pub const DESCRIPTION_PATH_ENV: &str = "KINOVA_DESCRIPTION_PATH";

/// Description root shipped with this crate.
pub const BUNDLED_DESCRIPTION_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/data");

/// Directory against which description-relative paths and `package://` URIs are resolved.
///
/// The root is chosen in the following order:
/// 1. an explicit path given to [`DescriptionConfig::new`],
/// 2. the environment variable [`KINOVA_DESCRIPTION_PATH`](`DESCRIPTION_PATH_ENV`),
/// 3. the `data` directory bundled with this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionConfig {
    root: PathBuf,
}

impl DescriptionConfig {
    /// Creates a new DescriptionConfig.
    /// # Arguments
    /// * `root` - Description root. If it is None, the environment and then the bundled
    /// data directory are used.
    pub fn new<Root: Into<Option<PathBuf>>>(root: Root) -> Self {
        let root = root
            .into()
            .or_else(|| env::var_os(DESCRIPTION_PATH_ENV).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(BUNDLED_DESCRIPTION_ROOT));
        DescriptionConfig { root }
    }
    /// Description root of this config.
    pub fn root(&self) -> &Path {
        &self.root
    }
    /// Resolves `path` against the description root. Absolute paths are returned unchanged.
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        DescriptionConfig::new(None)
    }
}
