// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains exception and Result definitions
use std::path::PathBuf;
use thiserror::Error;

/// Represents all kind of errors which can occur while loading a robot description or
/// working with the resulting model.
#[derive(Error, Debug)]
pub enum KinovaException {
    /// DescriptionNotFound is returned if the resolved URDF/xacro file does not exist.
    #[error("Robot description not found: {path:?}")]
    DescriptionNotFound {
        /// Resolved path of the description file.
        path: PathBuf,
    },

    /// IoException is returned if the description file exists but can not be read.
    #[error("Can not read {path:?}: {message}")]
    IoException {
        /// Resolved path of the description file.
        path: PathBuf,
        /// Explanatory string.
        message: String,
    },

    /// XacroException is returned if the xacro preprocessor is missing or fails.
    #[error("{message:?}")]
    XacroException { message: String },

    /// UrdfException is returned if the description is not a valid URDF or the link tree
    /// described by it is malformed.
    #[error("{message:?}")]
    UrdfException { message: String },

    /// ModelException is returned if a link list and its options do not form a robot.
    #[error("{message:?}")]
    ModelException { message: String },

    /// ConfigurationException is returned if a joint configuration is invalid or unknown.
    #[error("{message:?}")]
    ConfigurationException { message: String },
}

/// creates a UrdfException from anything that can be turned into a String
pub(crate) fn create_urdf_exception<S: Into<String>>(message: S) -> KinovaException {
    KinovaException::UrdfException {
        message: message.into(),
    }
}

/// creates a ConfigurationException from anything that can be turned into a String
pub(crate) fn create_configuration_exception<S: Into<String>>(message: S) -> KinovaException {
    KinovaException::ConfigurationException {
        message: message.into(),
    }
}

/// Result type which can have KinovaException as Error
pub type KinovaResult<T> = Result<T, KinovaException>;
