//! Request and response types for the DataCrunch API.

pub mod balance;
pub mod clusters;
pub mod common;
pub mod containers;
pub mod images;
pub mod instance_types;
pub mod instances;
pub mod jobs;
pub mod locations;
pub mod ssh_keys;
pub mod startup_scripts;
pub mod volumes;
