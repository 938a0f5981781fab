//! Resource services for the DataCrunch API.
//!
//! Each service is a thin typed layer over the
//! [`RequestPipeline`](crate::client::RequestPipeline). Errors from the
//! pipeline are returned unchanged.

pub mod balance;
pub mod clusters;
pub mod containers;
pub mod images;
pub mod instance_types;
pub mod instances;
pub mod jobs;
pub mod locations;
pub mod ssh_keys;
pub mod startup_scripts;
pub mod volumes;

pub use balance::{BalanceService, DefaultBalanceService};
pub use clusters::{ClustersService, DefaultClustersService};
pub use containers::{ContainersService, DefaultContainersService};
pub use images::{DefaultImagesService, ImagesService};
pub use instance_types::{DefaultInstanceTypesService, InstanceTypesService};
pub use instances::{DefaultInstancesService, InstancesService};
pub use jobs::{DefaultJobsService, JobsService};
pub use locations::{DefaultLocationsService, LocationsService};
pub use ssh_keys::{DefaultSshKeysService, SshKeysService};
pub use startup_scripts::{DefaultStartupScriptsService, StartupScriptsService};
pub use volumes::{DefaultVolumesService, VolumesService};

use std::borrow::Cow;

/// Percent-encodes a single path segment.
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Appends the set parameters as a query string.
pub(crate) fn with_query(path: &str, params: &[(&str, Option<String>)]) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in params {
        if let Some(value) = value {
            query.append_pair(key, value);
            any = true;
        }
    }

    if any {
        format!("{}?{}", path, query.finish())
    } else {
        path.to_string()
    }
}
