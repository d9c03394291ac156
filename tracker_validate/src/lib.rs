/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

//! checks whether work orders (assignments, survey results or other point features) were edited by a
//! worker who was close to the feature at the time of the edit, based on the location tracks of that worker.
//!
//! A work order is corroborated if there is a track of its editor that is within the time tolerance of
//! the edit timestamp, has an accuracy of at most the configured minimum accuracy and is close enough to
//! the work order location (see [`proximity::is_corroborated`]). Work orders without corroborating tracks
//! are reported as invalid.

use tracker_build::define_load_config;

pub mod errors;
pub use errors::{Result,TrackerValidateError};

pub mod model;
pub use model::*;

pub mod proximity;
pub use proximity::*;

pub mod mapping;
pub use mapping::*;

pub mod source;
pub use source::*;

pub mod report;
pub use report::*;

pub mod validator;
pub use validator::*;

define_load_config!{}

/// the tolerance configuration from `tolerances.ron` (if there is one), or the defaults otherwise
pub fn load_tolerances ()->Result<ToleranceConfig> {
    match load_config::<ToleranceConfig>("tolerances.ron") {
        Ok(config) => Ok(config),
        Err(tracker_build::TrackerBuildError::ResourceNotFoundError(_)) => Ok(ToleranceConfig::default()),
        Err(e) => Err(e.into())
    }
}
