//! Project configuration

mod cmbuild_toml;

pub use cmbuild_toml::*;
