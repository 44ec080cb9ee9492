// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! contains useful type definitions and conversion functions.
use nalgebra::{Isometry3, Translation3, UnitQuaternion};

/// converts an array of angles in degrees to radians
pub fn deg2rad<const N: usize>(degrees: [f64; N]) -> [f64; N] {
    degrees.map(f64::to_radians)
}

/// converts an array of angles in radians to degrees
pub fn rad2deg<const N: usize>(radians: [f64; N]) -> [f64; N] {
    radians.map(f64::to_degrees)
}

/// converts a URDF origin to an Isometry.
///
/// URDF uses fixed-axis roll, pitch, yaw angles: the rotation is
/// `Rz(yaw) * Ry(pitch) * Rx(roll)`.
pub fn pose_to_isometry(xyz: &[f64; 3], rpy: &[f64; 3]) -> Isometry3<f64> {
    Isometry3::from_parts(
        Translation3::new(xyz[0], xyz[1], xyz[2]),
        UnitQuaternion::from_euler_angles(rpy[0], rpy[1], rpy[2]),
    )
}

/// converts an Isometry to a 4x4 column-major homogenous matrix
pub fn isometry_to_array(isometry: &Isometry3<f64>) -> [f64; 16] {
    let mut output = [0.; 16];
    isometry
        .to_homogeneous()
        .iter()
        .enumerate()
        .for_each(|(i, &x)| output[i] = x);
    output
}
