//! Lane Dodge Traffic Library
//!
//! The traffic generation, validation and kinematics core of a three-lane
//! arcade dodging game. It runs headless; drawing and input are left to the host.

pub mod simulation;
