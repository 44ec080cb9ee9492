// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the concrete robot models and the [`Robot`] trait they implement.

pub mod kinova_gen3;

use crate::model::RobotModel;
use crate::KinovaResult;

/// A concrete robot which is backed by a [`RobotModel`].
pub trait Robot {
    /// Returns the generic model with the links and configurations of this robot.
    fn model(&self) -> &RobotModel;
    /// Returns the generic model mutably, e.g. to add configurations or to set `q`.
    fn model_mut(&mut self) -> &mut RobotModel;

    /// Moves the current joint coordinates to the named configuration.
    /// # Errors
    /// * ConfigurationException if the robot has no configuration with this name.
    fn set_configuration(&mut self, name: &str) -> KinovaResult<()> {
        self.model_mut().set_q_named(name)
    }
}
