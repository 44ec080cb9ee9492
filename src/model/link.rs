// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the link types a [`RobotModel`](`crate::RobotModel`) is built from.
use nalgebra::{Isometry3, Matrix3, Unit, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::path::PathBuf;

/// Type of the joint which connects a link to its parent.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum JointType {
    /// Rotation about the joint axis, with position limits.
    Revolute,
    /// Unlimited rotation about the joint axis.
    Continuous,
    /// Translation along the joint axis, with position limits.
    Prismatic,
    /// No relative motion between parent and child.
    Fixed,
    Floating,
    Planar,
}

impl JointType {
    /// Whether this joint contributes a joint coordinate to the robot.
    pub const fn is_actuated(self) -> bool {
        matches!(
            self,
            JointType::Revolute | JointType::Continuous | JointType::Prismatic
        )
    }
    /// Whether this joint rotates about its axis.
    pub const fn is_revolute(self) -> bool {
        matches!(self, JointType::Revolute | JointType::Continuous)
    }
}

/// Limits of a joint. Unit: \[rad\] or \[m\], \[Nm\] or \[N\], \[rad/s\] or \[m/s\].
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Default)]
pub struct JointLimits {
    /// Lower position limit, None if the joint is unbounded.
    pub lower: Option<f64>,
    /// Upper position limit, None if the joint is unbounded.
    pub upper: Option<f64>,
    /// Maximum effort.
    pub effort: f64,
    /// Maximum velocity.
    pub velocity: f64,
}

/// The joint connecting a link to its parent link.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    pub name: String,
    pub joint_type: JointType,
    /// Pose of the child link frame in the parent link frame at zero joint position.
    pub origin: Isometry3<f64>,
    /// Joint axis expressed in the child link frame.
    pub axis: Unit<Vector3<f64>>,
    pub limits: JointLimits,
}

/// Mass properties of a link.
#[derive(Debug, Clone, PartialEq)]
pub struct Inertial {
    /// Unit: \[kg\].
    pub mass: f64,
    /// Center of mass in the link frame. Unit: \[m\].
    pub center_of_mass: Vector3<f64>,
    /// Inertia tensor about the center of mass. Unit: [kg * m^2].
    pub inertia: Matrix3<f64>,
}

/// Primitive or mesh geometry attached to a link.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Box { size: [f64; 3] },
    Cylinder { radius: f64, length: f64 },
    Sphere { radius: f64 },
    /// Mesh file, resolved against the description root.
    Mesh { filename: PathBuf, scale: [f64; 3] },
}

/// A visual or collision element of a link.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    /// Pose of the shape in the link frame.
    pub origin: Isometry3<f64>,
    pub geometry: Geometry,
    /// RGBA color, each entry in `0.0..=1.0`.
    pub color: Option<[f64; 4]>,
}

/// One link of the kinematic tree.
///
/// Links are stored in a flat list ordered depth-first from the base link, so a parent
/// always has a smaller index than its children.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub name: String,
    /// Index of the parent link, None for the base link.
    pub parent: Option<usize>,
    /// Indices of the child links.
    pub children: Vec<usize>,
    /// Joint to the parent link, None for the base link.
    pub joint: Option<Joint>,
    /// Index of the joint coordinate of this link in `q`, if its joint is actuated.
    pub jindex: Option<usize>,
    pub inertial: Option<Inertial>,
    pub geometry: Vec<Shape>,
    pub collision: Vec<Shape>,
}

impl Link {
    /// Creates a link with only a name.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Link {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            joint: None,
            jindex: None,
            inertial: None,
            geometry: Vec::new(),
            collision: Vec::new(),
        }
    }
    /// Whether the joint to the parent link is actuated.
    pub fn is_joint(&self) -> bool {
        self.joint
            .as_ref()
            .map_or(false, |joint| joint.joint_type.is_actuated())
    }
    /// Type of the joint to the parent link.
    pub fn joint_type(&self) -> Option<JointType> {
        self.joint.as_ref().map(|joint| joint.joint_type)
    }
    /// Whether this link has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
    /// Position limits of the joint to the parent link as `(lower, upper)`.
    ///
    /// Revolute joints without limits report `[-pi, pi]`, prismatic joints without limits
    /// report infinite bounds. Returns None if the link is not a joint.
    pub fn qlim(&self) -> Option<(f64, f64)> {
        let joint = self.joint.as_ref().filter(|j| j.joint_type.is_actuated())?;
        let (default_lower, default_upper) = if joint.joint_type.is_revolute() {
            (-PI, PI)
        } else {
            (f64::NEG_INFINITY, f64::INFINITY)
        };
        Some((
            joint.limits.lower.unwrap_or(default_lower),
            joint.limits.upper.unwrap_or(default_upper),
        ))
    }
}
