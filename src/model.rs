// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the generic robot model and everything needed to read it from a URDF description.
pub mod link;
mod loader;
mod robot_model;
mod urdf_reader;

pub use link::{Geometry, Inertial, Joint, JointLimits, JointType, Link, Shape};
pub use loader::{DescriptionLoader, FileLoader};
#[cfg(test)]
pub(crate) use loader::MockDescriptionLoader;
pub use robot_model::{JointConfiguration, RobotModel, RobotOptions};
pub use urdf_reader::{urdf_parse, urdf_read, UrdfDescription};
