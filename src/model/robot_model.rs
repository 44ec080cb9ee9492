// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the generic URDF robot model.
use crate::exception::{create_configuration_exception, KinovaException};
use crate::model::link::{JointType, Link};
use crate::KinovaResult;
use nalgebra::Matrix2xX;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metadata of a [`RobotModel`].
#[derive(Debug, Clone, Default)]
pub struct RobotOptions {
    /// Name of the robot.
    pub name: String,
    /// Manufacturer of the robot.
    pub manufacturer: String,
    /// Expanded URDF XML the links were read from.
    pub urdf_string: String,
    /// Path of the description file the links were read from.
    pub urdf_filepath: PathBuf,
    /// Names of the links at which a gripper is attached.
    pub gripper_links: Vec<String>,
    /// Free form keywords, e.g. "dynamics".
    pub keywords: Vec<String>,
}

/// A named vector of joint angles.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct JointConfiguration {
    pub name: String,
    /// Joint coordinates. Unit: \[rad\] or \[m\].
    pub q: Vec<f64>,
}

/// A robot described by a tree of links, together with named joint configurations.
///
/// The links are usually read by [`urdf_read`](`crate::model::urdf_read`). Concrete robots
/// like [`KinovaGen3`](`crate::KinovaGen3`) create a RobotModel and register their
/// configurations of interest.
#[derive(Debug, Clone)]
pub struct RobotModel {
    links: Vec<Link>,
    link_index: HashMap<String, usize>,
    n: usize,
    options: RobotOptions,
    gripper_indices: Vec<usize>,
    configurations: Vec<JointConfiguration>,
    q: Vec<f64>,
}

impl RobotModel {
    /// Creates a new RobotModel.
    /// # Arguments
    /// * `links` - Links ordered such that every parent comes before its children.
    /// * `options` - Name and metadata of the robot.
    /// # Errors
    /// * ModelException if there are no links, the first link is not the root, a parent comes
    /// after its child, a child index does not point back to its parent, link names are not
    /// unique or a gripper link is unknown.
    pub fn new(links: Vec<Link>, options: RobotOptions) -> KinovaResult<Self> {
        if links.is_empty() {
            return Err(KinovaException::ModelException {
                message: format!("Robot {} has no links", options.name),
            });
        }
        check_link_tree(&links)?;
        let mut link_index = HashMap::with_capacity(links.len());
        for (i, link) in links.iter().enumerate() {
            if link_index.insert(link.name.clone(), i).is_some() {
                return Err(KinovaException::ModelException {
                    message: format!("Link name {} is not unique", link.name),
                });
            }
        }
        let gripper_indices = options
            .gripper_links
            .iter()
            .map(|name| {
                link_index
                    .get(name)
                    .copied()
                    .ok_or_else(|| KinovaException::ModelException {
                        message: format!("Gripper link {} is not part of {}", name, options.name),
                    })
            })
            .collect::<KinovaResult<Vec<usize>>>()?;
        let n = links.iter().filter(|link| link.is_joint()).count();
        Ok(RobotModel {
            links,
            link_index,
            n,
            options,
            gripper_indices,
            configurations: Vec::new(),
            q: vec![0.; n],
        })
    }
    /// Number of joints.
    pub fn n(&self) -> usize {
        self.n
    }
    /// Number of links.
    pub fn nlinks(&self) -> usize {
        self.links.len()
    }
    pub fn name(&self) -> &str {
        &self.options.name
    }
    pub fn manufacturer(&self) -> &str {
        &self.options.manufacturer
    }
    pub fn keywords(&self) -> &[String] {
        &self.options.keywords
    }
    /// Expanded URDF XML the robot was read from.
    pub fn urdf_string(&self) -> &str {
        &self.options.urdf_string
    }
    /// Path of the description file the robot was read from.
    pub fn urdf_filepath(&self) -> &Path {
        &self.options.urdf_filepath
    }
    pub fn links(&self) -> &[Link] {
        &self.links
    }
    /// Gets a link by name.
    pub fn link(&self, name: &str) -> Option<&Link> {
        self.link_index.get(name).map(|&i| &self.links[i])
    }
    /// The root of the link tree.
    pub fn base_link(&self) -> &Link {
        &self.links[0]
    }
    /// Links at which a gripper is attached.
    pub fn gripper_links(&self) -> Vec<&Link> {
        self.gripper_indices.iter().map(|&i| &self.links[i]).collect()
    }
    /// End-effector links: the gripper links if there are any, otherwise all leaf links.
    pub fn ee_links(&self) -> Vec<&Link> {
        if self.gripper_indices.is_empty() {
            self.links.iter().filter(|link| link.is_leaf()).collect()
        } else {
            self.gripper_links()
        }
    }
    /// Joint structure as one letter per joint, `R` for revolute and `P` for prismatic.
    pub fn structure(&self) -> String {
        self.joint_links()
            .map(|link| match link.joint_type() {
                Some(JointType::Prismatic) => 'P',
                _ => 'R',
            })
            .collect()
    }
    /// Links with an actuated joint, in joint order.
    pub fn joint_links(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|link| link.is_joint())
    }

    /// Stores the joint configuration `q` under `name`.
    ///
    /// Adding a configuration with an existing name replaces it.
    /// # Errors
    /// * ConfigurationException if the name is empty, `q` does not have [`n`](`Self::n`)
    /// entries or contains non-finite values.
    pub fn add_configuration<S: Into<String>>(&mut self, name: S, q: &[f64]) -> KinovaResult<()> {
        let name = name.into();
        if name.is_empty() {
            return Err(create_configuration_exception(
                "Configuration name must not be empty",
            ));
        }
        self.check_q(&name, q)?;
        match self.configurations.iter().position(|c| c.name == name) {
            Some(index) => {
                debug!("replacing configuration {} of {}", name, self.options.name);
                self.configurations[index].q = q.to_vec();
            }
            None => {
                debug!("adding configuration {} to {}", name, self.options.name);
                self.configurations.push(JointConfiguration {
                    name,
                    q: q.to_vec(),
                });
            }
        }
        Ok(())
    }
    /// Gets the joint configuration stored under `name`.
    pub fn configuration(&self, name: &str) -> Option<&[f64]> {
        self.configurations
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.q.as_slice())
    }
    /// Names of all stored configurations in the order they were added.
    pub fn configuration_names(&self) -> Vec<&str> {
        self.configurations.iter().map(|c| c.name.as_str()).collect()
    }
    pub fn configurations(&self) -> &[JointConfiguration] {
        &self.configurations
    }

    /// Current joint coordinates, all zero after construction.
    pub fn q(&self) -> &[f64] {
        &self.q
    }
    /// Sets the current joint coordinates.
    /// # Errors
    /// * ConfigurationException if `q` does not have [`n`](`Self::n`) entries or contains
    /// non-finite values.
    pub fn set_q(&mut self, q: &[f64]) -> KinovaResult<()> {
        self.check_q("q", q)?;
        self.q.copy_from_slice(q);
        Ok(())
    }
    /// Sets the current joint coordinates to the configuration stored under `name`.
    /// # Errors
    /// * ConfigurationException if there is no such configuration.
    pub fn set_q_named(&mut self, name: &str) -> KinovaResult<()> {
        let index = self
            .configurations
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| {
                create_configuration_exception(format!(
                    "{} has no configuration named {}",
                    self.options.name, name
                ))
            })?;
        self.q.copy_from_slice(&self.configurations[index].q);
        Ok(())
    }

    /// Joint limits, lower limits in the first row and upper limits in the second row.
    pub fn qlim(&self) -> Matrix2xX<f64> {
        let limits: Vec<(f64, f64)> = self.joint_links().filter_map(Link::qlim).collect();
        Matrix2xX::from_fn(limits.len(), |row, column| {
            if row == 0 {
                limits[column].0
            } else {
                limits[column].1
            }
        })
    }
    /// Whether every entry of `q` is within the joint limits. Returns false if `q` does not
    /// have [`n`](`Self::n`) entries.
    pub fn within_limits(&self, q: &[f64]) -> bool {
        let qlim = self.qlim();
        q.len() == self.n
            && q
                .iter()
                .enumerate()
                .all(|(i, &value)| qlim[(0, i)] <= value && value <= qlim[(1, i)])
    }

    fn check_q(&self, name: &str, q: &[f64]) -> KinovaResult<()> {
        if q.len() != self.n {
            return Err(create_configuration_exception(format!(
                "Configuration {} has {} values but {} has {} joints",
                name,
                q.len(),
                self.options.name,
                self.n
            )));
        }
        if let Some(value) = q.iter().find(|value| !value.is_finite()) {
            return Err(create_configuration_exception(format!(
                "Configuration {} contains the non-finite value {}",
                name, value
            )));
        }
        Ok(())
    }
}

fn check_link_tree(links: &[Link]) -> KinovaResult<()> {
    let model_exception = |message: String| KinovaException::ModelException { message };
    for (i, link) in links.iter().enumerate() {
        match link.parent {
            None if i > 0 => {
                return Err(model_exception(format!(
                    "Link {} has no parent but is not the first link",
                    link.name
                )))
            }
            Some(_) if i == 0 => {
                return Err(model_exception(format!(
                    "First link {} is not the root, it has a parent",
                    link.name
                )))
            }
            Some(parent) if parent >= i => {
                return Err(model_exception(format!(
                    "Parent {} of link {} does not come before it",
                    parent, link.name
                )))
            }
            _ => {}
        }
        for &child in &link.children {
            if links.get(child).and_then(|child| child.parent) != Some(i) {
                return Err(model_exception(format!(
                    "Child {} of link {} does not refer back to it",
                    child, link.name
                )));
            }
        }
    }
    Ok(())
}

impl fmt::Display for RobotModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())?;
        if !self.manufacturer().is_empty() {
            write!(f, " (by {})", self.manufacturer())?;
        }
        write!(f, ", {} joints ({})", self.n, self.structure())?;
        if !self.gripper_indices.is_empty() {
            write!(f, ", {} gripper", self.gripper_indices.len())?;
        }
        writeln!(f)?;
        writeln!(
            f,
            "{:>4} {:<24} {:<6} {:<24} {:<12}",
            "link", "name", "joint", "parent", "type"
        )?;
        for (i, link) in self.links.iter().enumerate() {
            let parent = link
                .parent
                .map_or("BASE", |parent| self.links[parent].name.as_str());
            let joint = link
                .jindex
                .map_or_else(String::new, |jindex| format!("q{}", jindex));
            let joint_type = link
                .joint_type()
                .map_or_else(String::new, |joint_type| format!("{:?}", joint_type));
            writeln!(
                f,
                "{:>4} {:<24} {:<6} {:<24} {:<12}",
                i, link.name, joint, parent, joint_type
            )?;
        }
        for configuration in &self.configurations {
            write!(f, "{:<6}", configuration.name)?;
            for q in &configuration.q {
                write!(f, " {:>8.1}", q.to_degrees())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::exception::KinovaException;
    use crate::model::link::{Joint, JointLimits, JointType, Link};
    use crate::model::robot_model::{JointConfiguration, RobotModel, RobotOptions};
    use nalgebra::{Isometry3, Vector3};
    use std::f64::consts::PI;

    fn joint(name: &str, joint_type: JointType, limits: JointLimits) -> Joint {
        Joint {
            name: name.to_string(),
            joint_type,
            origin: Isometry3::identity(),
            axis: Vector3::z_axis(),
            limits,
        }
    }

    fn two_joint_links() -> Vec<Link> {
        let base = Link {
            children: vec![1],
            ..Link::new("base")
        };
        let upper = Link {
            parent: Some(0),
            children: vec![2],
            joint: Some(joint("j1", JointType::Continuous, JointLimits::default())),
            jindex: Some(0),
            ..Link::new("upper")
        };
        let lower = Link {
            parent: Some(1),
            children: vec![3],
            joint: Some(joint(
                "j2",
                JointType::Revolute,
                JointLimits {
                    lower: Some(-1.),
                    upper: Some(2.),
                    effort: 1.,
                    velocity: 1.,
                },
            )),
            jindex: Some(1),
            ..Link::new("lower")
        };
        let tool = Link {
            parent: Some(2),
            joint: Some(joint("tool_joint", JointType::Fixed, JointLimits::default())),
            ..Link::new("tool")
        };
        vec![base, upper, lower, tool]
    }

    fn model() -> RobotModel {
        RobotModel::new(
            two_joint_links(),
            RobotOptions {
                name: "TwoJoint".to_string(),
                manufacturer: "Acme".to_string(),
                gripper_links: vec!["tool".to_string()],
                ..RobotOptions::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn counts_joints_and_links() {
        let model = model();
        assert_eq!(model.n(), 2);
        assert_eq!(model.nlinks(), 4);
        assert_eq!(model.structure(), "RR");
        assert_eq!(model.base_link().name, "base");
        assert_eq!(model.q(), &[0., 0.]);
    }

    #[test]
    fn gripper_links_are_the_ee_links() {
        let model = model();
        let grippers: Vec<&str> = model.gripper_links().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(grippers, vec!["tool"]);
        assert_eq!(model.ee_links().len(), 1);
    }

    #[test]
    fn leaf_links_are_the_ee_links_without_gripper() {
        let model = RobotModel::new(two_joint_links(), RobotOptions::default()).unwrap();
        let ee: Vec<&str> = model.ee_links().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(ee, vec!["tool"]);
    }

    #[test]
    fn unknown_gripper_link_is_rejected() {
        let result = RobotModel::new(
            two_joint_links(),
            RobotOptions {
                gripper_links: vec!["hand".to_string()],
                ..RobotOptions::default()
            },
        );
        assert!(matches!(result, Err(KinovaException::ModelException { .. })));
    }

    #[test]
    fn empty_and_duplicate_links_are_rejected() {
        assert!(RobotModel::new(Vec::new(), RobotOptions::default()).is_err());
        let mut links = two_joint_links();
        links[3].name = "upper".to_string();
        assert!(RobotModel::new(links, RobotOptions::default()).is_err());
    }

    fn expect_model_exception(links: Vec<Link>) {
        assert!(matches!(
            RobotModel::new(links, RobotOptions::default()),
            Err(KinovaException::ModelException { .. })
        ));
    }

    #[test]
    fn parent_out_of_range_is_rejected() {
        let mut links = two_joint_links();
        links[3].parent = Some(9);
        expect_model_exception(links);
    }

    #[test]
    fn root_must_be_the_first_link() {
        let mut links = two_joint_links();
        links.swap(0, 1);
        expect_model_exception(links);
        let mut links = two_joint_links();
        links[0].parent = Some(0);
        expect_model_exception(links);
    }

    #[test]
    fn parent_after_child_is_rejected() {
        let mut links = two_joint_links();
        links[1].parent = Some(2);
        expect_model_exception(links);
    }

    #[test]
    fn second_root_is_rejected() {
        let mut links = two_joint_links();
        links[2].children.clear();
        links[3].parent = None;
        expect_model_exception(links);
    }

    #[test]
    fn child_out_of_range_is_rejected() {
        let mut links = two_joint_links();
        links[3].children.push(7);
        expect_model_exception(links);
        let mut links = two_joint_links();
        links[0].children.push(2);
        expect_model_exception(links);
    }

    #[test]
    fn add_and_get_configuration() {
        let mut model = model();
        model.add_configuration("qr", &[0.5, 1.0]).unwrap();
        model.add_configuration("qz", &[0., 0.]).unwrap();
        assert_eq!(model.configuration("qr"), Some(&[0.5, 1.0][..]));
        assert_eq!(model.configuration("qs"), None);
        assert_eq!(model.configuration_names(), vec!["qr", "qz"]);
    }

    #[test]
    fn adding_an_existing_name_replaces_it() {
        let mut model = model();
        model.add_configuration("qr", &[0.5, 1.0]).unwrap();
        model.add_configuration("qr", &[0.1, 0.2]).unwrap();
        assert_eq!(model.configurations().len(), 1);
        assert_eq!(model.configuration("qr"), Some(&[0.1, 0.2][..]));
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        let mut model = model();
        for (name, q) in [
            ("short", vec![0.]),
            ("long", vec![0., 0., 0.]),
            ("nan", vec![0., f64::NAN]),
            ("", vec![0., 0.]),
        ] {
            assert!(matches!(
                model.add_configuration(name, &q),
                Err(KinovaException::ConfigurationException { .. })
            ));
        }
        assert!(model.configurations().is_empty());
    }

    #[test]
    fn set_q_from_configuration() {
        let mut model = model();
        model.add_configuration("qr", &[0.5, 1.0]).unwrap();
        model.set_q_named("qr").unwrap();
        assert_eq!(model.q(), &[0.5, 1.0]);
        assert!(model.set_q_named("qs").is_err());
        model.set_q(&[0.25, -0.5]).unwrap();
        assert_eq!(model.q(), &[0.25, -0.5]);
        assert!(model.set_q(&[0.25]).is_err());
    }

    #[test]
    fn qlim_and_within_limits() {
        let model = model();
        let qlim = model.qlim();
        assert_eq!(qlim.ncols(), 2);
        assert_eq!(qlim[(0, 0)], -PI);
        assert_eq!(qlim[(1, 0)], PI);
        assert_eq!(qlim[(0, 1)], -1.);
        assert_eq!(qlim[(1, 1)], 2.);
        assert!(model.within_limits(&[3., 1.5]));
        assert!(!model.within_limits(&[0., -1.5]));
        assert!(!model.within_limits(&[0.]));
    }

    #[test]
    fn display_lists_links_and_configurations() {
        let mut model = model();
        model.add_configuration("qr", &[PI / 2., 0.]).unwrap();
        let text = model.to_string();
        assert!(text.starts_with("TwoJoint (by Acme), 2 joints (RR), 1 gripper"));
        assert!(text.contains("lower"));
        assert!(text.contains("q1"));
        assert!(text.contains("90.0"));
    }

    #[test]
    fn joint_configuration_serializes() {
        let configuration = JointConfiguration {
            name: "qr".to_string(),
            q: vec![0.1, 0.2],
        };
        let bytes = bincode::serialize(&configuration).unwrap();
        let decoded: JointConfiguration = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, configuration);
    }
}
