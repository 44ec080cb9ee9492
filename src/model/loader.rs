// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the sources the URDF reader gets description XML from.
use crate::exception::KinovaException;
use crate::KinovaResult;
use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

/// Provides the URDF XML text of a robot description.
#[cfg_attr(test, automock)]
pub trait DescriptionLoader {
    /// Returns the expanded URDF XML of the description at `path`.
    /// # Errors
    /// * DescriptionNotFound if there is no description at `path`.
    /// * IoException or XacroException if it can not be turned into URDF XML.
    fn load(&self, path: &Path) -> KinovaResult<String>;
}

/// Loads descriptions from the file system.
///
/// Files with the `xacro` extension are expanded by the ROS `xacro` tool, which therefore has
/// to be installed and on the `PATH`. All other files are read as plain URDF.
#[derive(Debug, Copy, Clone, Default)]
pub struct FileLoader;

impl DescriptionLoader for FileLoader {
    fn load(&self, path: &Path) -> KinovaResult<String> {
        if !path.is_file() {
            return Err(KinovaException::DescriptionNotFound {
                path: path.to_path_buf(),
            });
        }
        match path.extension().and_then(OsStr::to_str) {
            Some("xacro") => {
                debug!("expanding xacro file {:?}", path);
                urdf_rs::utils::convert_xacro_to_urdf(path).map_err(|e| {
                    KinovaException::XacroException {
                        message: format!("Can not expand {:?}: {}", path, e),
                    }
                })
            }
            _ => fs::read_to_string(path).map_err(|e| KinovaException::IoException {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }
}
