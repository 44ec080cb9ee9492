// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! # kinova-rs
//! kinova-rs provides a model of the [Kinova Gen3](https://www.kinovarobotics.com) manipulator
//! which is read from its URDF description.
//!
//! ## Design
//! The library is divided into three main Modules:
//! * [model](`crate::model`) - the generic [`RobotModel`] and the routine which reads its links
//! from a URDF or xacro description.
//! * [robot](`crate::robot`) - concrete robots, currently the [`KinovaGen3`].
//! * [config](`crate::config`) - where robot descriptions are looked up.
//!
//! Parsing the XML is left to [urdf-rs](https://docs.rs/urdf-rs), expanding xacro files to the
//! ROS `xacro` tool. This library neither computes kinematics nor dynamics, it describes the
//! robot.
//!
//! # Example:
//!```no_run
//! use kinova::{KinovaGen3, KinovaResult};
//! fn main() -> KinovaResult<()> {
//!     let mut robot = KinovaGen3::new()?;
//!     robot.set_q_named("qr")?;
//!     println!("{}", robot);
//!     for link in robot.links() {
//!         println!("{} {}", link.name, link.is_joint());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! `KinovaGen3::new()` reads `kortex_description/robots/gen3.xacro` from the description root.
//! The root is the `data` directory shipped with this crate unless the environment variable
//! `KINOVA_DESCRIPTION_PATH` or an explicit [`DescriptionConfig`] says otherwise. If the xacro
//! tool is not installed, the bundled pre-expanded description can be loaded instead:
//!```no_run
//! # use kinova::{KinovaGen3, KinovaResult};
//! # fn main() -> KinovaResult<()> {
//! let robot = KinovaGen3::from_file("kortex_description/robots/gen3.urdf", None)?;
//! # Ok(())
//! # }
//! ```
//!
//! Every fallible function returns a [`KinovaResult`], which is either the value or a
//! [`KinovaException`](`crate::exception::KinovaException`) describing what went wrong.
pub mod config;
pub mod exception;
pub mod model;
pub mod robot;
pub mod utils;

pub use config::DescriptionConfig;
pub use exception::KinovaResult;
pub use model::JointConfiguration;
pub use model::RobotModel;
pub use model::RobotOptions;
pub use robot::kinova_gen3::KinovaGen3;
pub use robot::Robot;
pub use utils::*;
