// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kinova::{rad2deg, DescriptionConfig, KinovaGen3, KinovaResult, Robot};

/// An example which loads the Kinova Gen3 model, moves it to a named configuration and
/// prints the model together with the joint of every link.
#[derive(Parser, Debug)]
#[clap(author, version, name = "print_kinova_gen3")]
struct CommandLineArguments {
    /// Directory containing kortex_description
    #[clap(long)]
    pub description_root: Option<PathBuf>,

    /// Load this description file instead of kortex_description/robots/gen3.xacro
    #[clap(long)]
    pub file: Option<PathBuf>,

    /// Named configuration the robot is moved to
    #[clap(short, long, default_value = "qr")]
    pub configuration: String,
}

fn main() -> KinovaResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    let args = CommandLineArguments::parse();
    let config = DescriptionConfig::new(args.description_root);
    let mut robot = match args.file {
        Some(file) => KinovaGen3::from_file(file, config)?,
        None => KinovaGen3::with_config(config)?,
    };
    robot.set_configuration(&args.configuration)?;
    println!("{}", robot);
    let q_degrees: Vec<f64> = robot.q().iter().map(|q| q.to_degrees()).collect();
    println!("current q in degrees: {:?}", q_degrees);
    println!("qr in degrees: {:?}", rad2deg(KinovaGen3::qr()));
    for link in robot.links() {
        println!("{:<24} is joint: {}", link.name, link.is_joint());
    }
    Ok(())
}
