// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Reads URDF and xacro descriptions into the flat link list of a
//! [`RobotModel`](`crate::RobotModel`).
//!
//! XML parsing is done by `urdf-rs`. This module turns its output into [`Link`]s: links are
//! ordered depth-first from the single root link, children in the order their joints appear
//! in the file, and actuated joints are numbered in that order.
use crate::config::DescriptionConfig;
use crate::exception::create_urdf_exception;
use crate::model::link::{Geometry, Inertial, Joint, JointLimits, JointType, Link, Shape};
use crate::model::loader::DescriptionLoader;
use crate::utils::pose_to_isometry;
use crate::KinovaResult;
use nalgebra::{Matrix3, Unit, Vector3};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything [`urdf_read`] extracts from a description file.
#[derive(Debug, Clone)]
pub struct UrdfDescription {
    /// Links ordered depth-first from the base link.
    pub links: Vec<Link>,
    /// Name of the `<robot>` element.
    pub name: String,
    /// Expanded URDF XML.
    pub urdf_string: String,
    /// Resolved path of the description file.
    pub urdf_filepath: PathBuf,
}

/// Reads a URDF or xacro description.
/// # Arguments
/// * `file_path` - Description file, relative to the description root of `config` or absolute.
/// * `config` - Where descriptions and the meshes they reference are located.
/// * `loader` - Source of the URDF XML, usually [`FileLoader`](`crate::model::FileLoader`).
/// # Errors
/// * DescriptionNotFound, IoException or XacroException from the loader.
/// * UrdfException if the XML is not a valid URDF or does not describe a single link tree.
pub fn urdf_read<P: AsRef<Path>, L: DescriptionLoader + ?Sized>(
    file_path: P,
    config: &DescriptionConfig,
    loader: &L,
) -> KinovaResult<UrdfDescription> {
    let urdf_filepath = config.resolve(file_path);
    debug!("reading robot description {:?}", urdf_filepath);
    let urdf_string = loader.load(&urdf_filepath)?;
    let (name, links) = urdf_parse(&urdf_string, config)?;
    info!(
        "loaded {} with {} links and {} joints from {:?}",
        name,
        links.len(),
        links.iter().filter(|link| link.is_joint()).count(),
        urdf_filepath
    );
    Ok(UrdfDescription {
        links,
        name,
        urdf_string,
        urdf_filepath,
    })
}

/// Parses URDF XML into the robot name and its ordered link list.
pub fn urdf_parse(xml: &str, config: &DescriptionConfig) -> KinovaResult<(String, Vec<Link>)> {
    let robot = urdf_rs::read_from_string(xml)
        .map_err(|e| create_urdf_exception(format!("Invalid URDF: {}", e)))?;
    let links = convert_links(&robot, config)?;
    Ok((robot.name.clone(), links))
}

fn convert_links(robot: &urdf_rs::Robot, config: &DescriptionConfig) -> KinovaResult<Vec<Link>> {
    if robot.links.is_empty() {
        return Err(create_urdf_exception(format!(
            "Robot {} has no links",
            robot.name
        )));
    }
    let mut index: HashMap<&str, usize> = HashMap::with_capacity(robot.links.len());
    for (i, link) in robot.links.iter().enumerate() {
        if index.insert(link.name.as_str(), i).is_some() {
            return Err(create_urdf_exception(format!(
                "Link {} is defined more than once",
                link.name
            )));
        }
    }
    let lookup = |name: &str, joint: &str| {
        index.get(name).copied().ok_or_else(|| {
            create_urdf_exception(format!("Joint {} references unknown link {}", joint, name))
        })
    };

    let mut parent_joint: Vec<Option<&urdf_rs::Joint>> = vec![None; robot.links.len()];
    let mut parent_of: Vec<Option<usize>> = vec![None; robot.links.len()];
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); robot.links.len()];
    for joint in &robot.joints {
        let parent = lookup(joint.parent.link.as_str(), joint.name.as_str())?;
        let child = lookup(joint.child.link.as_str(), joint.name.as_str())?;
        if parent_joint[child].is_some() {
            return Err(create_urdf_exception(format!(
                "Link {} has more than one parent joint",
                robot.links[child].name
            )));
        }
        parent_joint[child] = Some(joint);
        parent_of[child] = Some(parent);
        children[parent].push(child);
    }

    let roots: Vec<usize> = (0..robot.links.len())
        .filter(|&i| parent_joint[i].is_none())
        .collect();
    let root = match roots.as_slice() {
        [root] => *root,
        [] => return Err(create_urdf_exception("No root link found")),
        _ => {
            let names: Vec<&str> = roots
                .iter()
                .map(|&i| robot.links[i].name.as_str())
                .collect();
            return Err(create_urdf_exception(format!(
                "Found more than one root link: {}",
                names.join(", ")
            )));
        }
    };

    let mut order = Vec::with_capacity(robot.links.len());
    let mut stack = vec![root];
    while let Some(i) = stack.pop() {
        order.push(i);
        stack.extend(children[i].iter().rev());
    }
    if order.len() != robot.links.len() {
        return Err(create_urdf_exception(
            "Link tree contains a cycle which is not connected to the root link",
        ));
    }
    let mut position = vec![0; robot.links.len()];
    for (new_index, &old_index) in order.iter().enumerate() {
        position[old_index] = new_index;
    }

    let mut links = Vec::with_capacity(order.len());
    let mut jindex = 0;
    for &i in &order {
        let urdf_link = &robot.links[i];
        let joint = parent_joint[i].map(convert_joint).transpose()?;
        let link_jindex = match &joint {
            Some(joint) if joint.joint_type.is_actuated() => {
                jindex += 1;
                Some(jindex - 1)
            }
            _ => None,
        };
        links.push(Link {
            name: urdf_link.name.clone(),
            parent: parent_of[i].map(|parent| position[parent]),
            children: children[i].iter().map(|&child| position[child]).collect(),
            joint,
            jindex: link_jindex,
            inertial: convert_inertial(&urdf_link.inertial),
            geometry: urdf_link
                .visual
                .iter()
                .map(|visual| convert_visual(visual, config))
                .collect::<KinovaResult<_>>()?,
            collision: urdf_link
                .collision
                .iter()
                .map(|collision| convert_collision(collision, config))
                .collect::<KinovaResult<_>>()?,
        });
    }
    Ok(links)
}

fn convert_joint(joint: &urdf_rs::Joint) -> KinovaResult<Joint> {
    let joint_type = convert_joint_type(&joint.joint_type, joint.name.as_str())?;
    let axis = match Unit::try_new(vector3(&joint.axis.xyz), f64::EPSILON) {
        Some(axis) => axis,
        None if joint_type.is_actuated() => {
            return Err(create_urdf_exception(format!(
                "Joint {} has a zero axis",
                joint.name
            )))
        }
        None => Vector3::x_axis(),
    };
    Ok(Joint {
        name: joint.name.clone(),
        joint_type,
        origin: pose_to_isometry(&joint.origin.xyz, &joint.origin.rpy),
        axis,
        limits: convert_limits(&joint.limit, joint_type),
    })
}

fn convert_joint_type(joint_type: &urdf_rs::JointType, name: &str) -> KinovaResult<JointType> {
    match joint_type {
        urdf_rs::JointType::Revolute => Ok(JointType::Revolute),
        urdf_rs::JointType::Continuous => Ok(JointType::Continuous),
        urdf_rs::JointType::Prismatic => Ok(JointType::Prismatic),
        urdf_rs::JointType::Fixed => Ok(JointType::Fixed),
        urdf_rs::JointType::Floating => Ok(JointType::Floating),
        urdf_rs::JointType::Planar => Ok(JointType::Planar),
        #[allow(unreachable_patterns)]
        other => Err(create_urdf_exception(format!(
            "Joint {} has unsupported type {:?}",
            name, other
        ))),
    }
}

fn convert_limits(limit: &urdf_rs::JointLimit, joint_type: JointType) -> JointLimits {
    // continuous joints have no position range, whatever their <limit> says
    let has_range = joint_type != JointType::Continuous;
    JointLimits {
        lower: if has_range { Some(limit.lower) } else { None },
        upper: if has_range { Some(limit.upper) } else { None },
        effort: limit.effort,
        velocity: limit.velocity,
    }
}

fn convert_inertial(inertial: &urdf_rs::Inertial) -> Option<Inertial> {
    if inertial.mass.value <= 0. {
        return None;
    }
    let i = &inertial.inertia;
    let inertia = Matrix3::new(
        i.ixx, i.ixy, i.ixz, i.ixy, i.iyy, i.iyz, i.ixz, i.iyz, i.izz,
    );
    let frame = pose_to_isometry(&inertial.origin.xyz, &inertial.origin.rpy);
    let rotation = frame.rotation.to_rotation_matrix();
    Some(Inertial {
        mass: inertial.mass.value,
        center_of_mass: frame.translation.vector,
        inertia: rotation.matrix() * inertia * rotation.matrix().transpose(),
    })
}

/// Only inline `<color>` elements are kept. urdf-rs drops a visual's material when it merely
/// names a global `<material>`, so such visuals have no color.
fn convert_visual(visual: &urdf_rs::Visual, config: &DescriptionConfig) -> KinovaResult<Shape> {
    let color = visual
        .material
        .as_ref()
        .and_then(|material| material.color.as_ref())
        .map(|color| [color.rgba[0], color.rgba[1], color.rgba[2], color.rgba[3]]);
    Ok(Shape {
        origin: pose_to_isometry(&visual.origin.xyz, &visual.origin.rpy),
        geometry: convert_geometry(&visual.geometry, config)?,
        color,
    })
}

fn convert_collision(
    collision: &urdf_rs::Collision,
    config: &DescriptionConfig,
) -> KinovaResult<Shape> {
    Ok(Shape {
        origin: pose_to_isometry(&collision.origin.xyz, &collision.origin.rpy),
        geometry: convert_geometry(&collision.geometry, config)?,
        color: None,
    })
}

fn convert_geometry(
    geometry: &urdf_rs::Geometry,
    config: &DescriptionConfig,
) -> KinovaResult<Geometry> {
    match geometry {
        urdf_rs::Geometry::Box { size } => Ok(Geometry::Box {
            size: array3(size),
        }),
        urdf_rs::Geometry::Cylinder { radius, length } => Ok(Geometry::Cylinder {
            radius: *radius,
            length: *length,
        }),
        urdf_rs::Geometry::Sphere { radius } => Ok(Geometry::Sphere { radius: *radius }),
        urdf_rs::Geometry::Mesh { filename, scale } => Ok(Geometry::Mesh {
            filename: resolve_mesh_path(filename, config),
            scale: scale.as_ref().map_or([1., 1., 1.], |s| array3(s)),
        }),
        #[allow(unreachable_patterns)]
        other => Err(create_urdf_exception(format!(
            "Unsupported geometry {:?}",
            other
        ))),
    }
}

/// Resolves `package://` URIs and relative mesh paths against the description root.
fn resolve_mesh_path(filename: &str, config: &DescriptionConfig) -> PathBuf {
    if let Some(package_path) = filename.strip_prefix("package://") {
        config.resolve(package_path)
    } else if let Some(file_path) = filename.strip_prefix("file://") {
        PathBuf::from(file_path)
    } else {
        config.resolve(filename)
    }
}

fn array3(v: &[f64; 3]) -> [f64; 3] {
    [v[0], v[1], v[2]]
}

fn vector3(v: &[f64; 3]) -> Vector3<f64> {
    Vector3::new(v[0], v[1], v[2])
}
