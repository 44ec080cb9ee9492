// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the Kinova Gen3 robot model.
use crate::config::DescriptionConfig;
use crate::model::{
    urdf_read, DescriptionLoader, FileLoader, RobotModel, RobotOptions, UrdfDescription,
};
use crate::robot::Robot;
use crate::utils::deg2rad;
use crate::KinovaResult;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// Description file of the Gen3, relative to the description root.
pub const KINOVA_GEN3_DESCRIPTION: &str = "kortex_description/robots/gen3.xacro";

/// Link at which the gripper of the Gen3 is mounted.
pub const KINOVA_GEN3_GRIPPER_LINK: &str = "end_effector_link";

/// Vertical 'READY' configuration. Unit: \[deg\].
pub const QR_DEGREES: [f64; 7] = [0.0, 15.0, 180.0, 230.0, 0.0, 55.0, 90.0];

/// Zero joint angle configuration, 'L' shaped. Unit: \[rad\].
pub const QZ: [f64; 7] = [0.0; 7];

/// Kinova Gen3 7-DoF manipulator, read from its URDF description.
///
/// The model describes the kinematic and graphical characteristics of the robot.
/// It defines the joint configurations:
/// * `qr` - vertical 'READY' configuration.
/// * `qz` - zero joint angle configuration, 'L' shaped.
///
/// # Example
/// ```no_run
/// use kinova::{KinovaGen3, KinovaResult};
/// fn main() -> KinovaResult<()> {
///     let mut robot = KinovaGen3::new()?;
///     robot.set_q_named("qr")?;
///     println!("{}", *robot);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct KinovaGen3 {
    model: RobotModel,
}

impl KinovaGen3 {
    /// Loads the Gen3 from `kortex_description/robots/gen3.xacro` in the default
    /// description root. Expanding the xacro file requires the ROS `xacro` tool.
    /// # Errors
    /// * DescriptionNotFound if the description root does not contain the Gen3.
    /// * XacroException if the description can not be expanded.
    /// * UrdfException if the description is not a valid URDF.
    pub fn new() -> KinovaResult<Self> {
        KinovaGen3::with_config(None)
    }
    /// Loads the Gen3 from `kortex_description/robots/gen3.xacro` in the root of `config`.
    /// # Arguments
    /// * `config` - Description root. If it is None the default root is used.
    pub fn with_config<Config: Into<Option<DescriptionConfig>>>(
        config: Config,
    ) -> KinovaResult<Self> {
        KinovaGen3::with_loader(config, &FileLoader)
    }
    /// Loads the Gen3 description through `loader`.
    /// # Arguments
    /// * `config` - Description root. If it is None the default root is used.
    /// * `loader` - Source of the URDF XML.
    pub fn with_loader<Config: Into<Option<DescriptionConfig>>, L: DescriptionLoader + ?Sized>(
        config: Config,
        loader: &L,
    ) -> KinovaResult<Self> {
        let config = config.into().unwrap_or_default();
        KinovaGen3::from_description(urdf_read(KINOVA_GEN3_DESCRIPTION, &config, loader)?)
    }
    /// Loads the Gen3 from a different description file, e.g. an already expanded URDF.
    /// # Arguments
    /// * `path` - Description file, relative to the description root or absolute.
    /// * `config` - Description root. If it is None the default root is used.
    pub fn from_file<P: AsRef<Path>, Config: Into<Option<DescriptionConfig>>>(
        path: P,
        config: Config,
    ) -> KinovaResult<Self> {
        let config = config.into().unwrap_or_default();
        KinovaGen3::from_description(urdf_read(path, &config, &FileLoader)?)
    }

    fn from_description(description: UrdfDescription) -> KinovaResult<Self> {
        let UrdfDescription {
            links,
            name,
            urdf_string,
            urdf_filepath,
        } = description;
        let mut model = RobotModel::new(
            links,
            RobotOptions {
                name,
                manufacturer: "Kinova".to_string(),
                urdf_string,
                urdf_filepath,
                gripper_links: vec![KINOVA_GEN3_GRIPPER_LINK.to_string()],
                keywords: Vec::new(),
            },
        )?;
        model.add_configuration("qr", &KinovaGen3::qr())?;
        model.add_configuration("qz", &KinovaGen3::qz())?;
        Ok(KinovaGen3 { model })
    }

    /// Vertical 'READY' configuration. Unit: \[rad\].
    pub fn qr() -> [f64; 7] {
        deg2rad(QR_DEGREES)
    }
    /// Zero joint angle configuration. Unit: \[rad\].
    pub fn qz() -> [f64; 7] {
        QZ
    }
}

impl Robot for KinovaGen3 {
    fn model(&self) -> &RobotModel {
        &self.model
    }
    fn model_mut(&mut self) -> &mut RobotModel {
        &mut self.model
    }
}

impl Deref for KinovaGen3 {
    type Target = RobotModel;

    fn deref(&self) -> &RobotModel {
        &self.model
    }
}

impl DerefMut for KinovaGen3 {
    fn deref_mut(&mut self) -> &mut RobotModel {
        &mut self.model
    }
}

impl fmt::Display for KinovaGen3 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.model)
    }
}

#[cfg(test)]
mod test {
    use crate::config::{DescriptionConfig, BUNDLED_DESCRIPTION_ROOT};
    use crate::exception::KinovaException;
    use crate::model::MockDescriptionLoader;
    use crate::robot::kinova_gen3::{KinovaGen3, KINOVA_GEN3_DESCRIPTION, QZ};
    use crate::robot::Robot;
    use mockall::predicate::eq;
    use std::f64::consts::PI;
    use std::fs;
    use std::path::{Path, PathBuf};

    fn bundled_config() -> DescriptionConfig {
        DescriptionConfig::new(PathBuf::from(BUNDLED_DESCRIPTION_ROOT))
    }

    fn bundled_urdf() -> String {
        fs::read_to_string(
            Path::new(BUNDLED_DESCRIPTION_ROOT).join("kortex_description/robots/gen3.urdf"),
        )
        .unwrap()
    }

    fn gen3() -> KinovaGen3 {
        KinovaGen3::from_file("kortex_description/robots/gen3.urdf", bundled_config()).unwrap()
    }

    fn slice_compare(a: &[f64], b: &[f64], thresh: f64) {
        assert_eq!(a.len(), b.len());
        for i in 0..a.len() {
            assert!((a[i] - b[i]).abs() < thresh);
        }
    }

    #[test]
    fn loads_gen3_xacro_through_the_loader() {
        let urdf = bundled_urdf();
        let mut loader = MockDescriptionLoader::new();
        loader
            .expect_load()
            .with(eq(bundled_config().resolve(KINOVA_GEN3_DESCRIPTION)))
            .times(1)
            .returning(move |_| Ok(urdf.clone()));
        let robot = KinovaGen3::with_loader(bundled_config(), &loader).unwrap();
        assert_eq!(robot.name(), "gen3");
        assert_eq!(
            robot.urdf_filepath(),
            Path::new(BUNDLED_DESCRIPTION_ROOT).join("kortex_description/robots/gen3.xacro")
        );
        assert!(robot.urdf_string().contains("<robot name=\"gen3\">"));
    }

    #[test]
    fn gen3_metadata() {
        let robot = gen3();
        assert_eq!(robot.manufacturer(), "Kinova");
        assert_eq!(robot.n(), 7);
        assert_eq!(robot.nlinks(), 10);
        assert_eq!(robot.structure(), "RRRRRRR");
        assert_eq!(robot.base_link().name, "base_link");
        let grippers: Vec<&str> = robot
            .gripper_links()
            .iter()
            .map(|link| link.name.as_str())
            .collect();
        assert_eq!(grippers, vec!["end_effector_link"]);
    }

    #[test]
    fn gen3_configurations() {
        let robot = gen3();
        assert_eq!(robot.configuration_names(), vec!["qr", "qz"]);
        slice_compare(
            robot.configuration("qr").unwrap(),
            &[
                0.0,
                15.0 * PI / 180.,
                PI,
                230.0 * PI / 180.,
                0.0,
                55.0 * PI / 180.,
                PI / 2.,
            ],
            1e-12,
        );
        assert_eq!(robot.configuration("qz").unwrap(), &QZ);
        slice_compare(&KinovaGen3::qr(), robot.configuration("qr").unwrap(), 1e-15);
    }

    #[test]
    fn gen3_starts_at_zero_and_moves_to_ready() {
        let mut robot = gen3();
        assert_eq!(robot.q(), &QZ);
        robot.set_configuration("qr").unwrap();
        slice_compare(robot.q(), &KinovaGen3::qr(), 1e-15);
        assert!(matches!(
            robot.set_configuration("qs"),
            Err(KinovaException::ConfigurationException { .. })
        ));
    }

    #[test]
    fn gen3_joint_limits() {
        let robot = gen3();
        let qlim = robot.qlim();
        assert_eq!(qlim.ncols(), 7);
        assert!((qlim[(1, 1)] - 2.41).abs() < 1e-12);
        assert!((qlim[(1, 3)] - 2.66).abs() < 1e-12);
        assert!((qlim[(1, 5)] - 2.23).abs() < 1e-12);
        assert!((qlim[(1, 0)] - PI).abs() < 1e-12);
        assert!(robot.within_limits(&KinovaGen3::qz()));
        // joint 4 of qr is at 230 degrees, beyond its 2.66 rad limit
        assert!(!robot.within_limits(&KinovaGen3::qr()));
    }

    #[test]
    fn gen3_joints_and_meshes() {
        let robot = gen3();
        let joint_names: Vec<&str> = robot
            .joint_links()
            .map(|link| link.joint.as_ref().unwrap().name.as_str())
            .collect();
        assert_eq!(
            joint_names,
            vec!["joint_1", "joint_2", "joint_3", "joint_4", "joint_5", "joint_6", "joint_7"]
        );
        let shoulder = robot.link("shoulder_link").unwrap();
        assert!(shoulder.is_joint());
        assert_eq!(shoulder.jindex, Some(0));
        assert!(shoulder.inertial.is_some());
        assert_eq!(shoulder.geometry.len(), 1);
        assert!(!robot.link("tool_frame").unwrap().is_joint());
        assert!(robot.link("end_effector_link").unwrap().inertial.is_none());
    }

    #[test]
    fn wrong_number_of_joints_is_rejected() {
        let mut loader = MockDescriptionLoader::new();
        loader.expect_load().returning(|_| {
            Ok(r#"
                <robot name="stub">
                    <link name="base_link"/>
                    <link name="end_effector_link"/>
                    <joint name="joint_1" type="continuous">
                        <parent link="base_link"/>
                        <child link="end_effector_link"/>
                        <axis xyz="0 0 1"/>
                    </joint>
                </robot>
            "#
            .to_string())
        });
        assert!(matches!(
            KinovaGen3::with_loader(bundled_config(), &loader),
            Err(KinovaException::ConfigurationException { .. })
        ));
    }

    #[test]
    fn missing_description_root() {
        let config = DescriptionConfig::new(PathBuf::from("/nonexistent/descriptions"));
        assert!(matches!(
            KinovaGen3::with_config(config),
            Err(KinovaException::DescriptionNotFound { .. })
        ));
    }

    #[test]
    fn display_names_the_manufacturer() {
        let text = gen3().to_string();
        assert!(text.starts_with("gen3 (by Kinova), 7 joints (RRRRRRR), 1 gripper"));
        assert!(text.contains("bracelet_link"));
        assert!(text.contains("qr"));
    }
}
