//! Motion Common Library
//!
//! Shared constants and configuration loading for the CoreXY triplet
//! kinematics workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - Axis alphabet, triplet geometry, homing constants
//! - [`config`] - Configuration loading trait, shared config and errors
//! - [`machine`] - Machine, kinematics and rail configuration sections

pub mod config;
pub mod consts;
pub mod machine;
