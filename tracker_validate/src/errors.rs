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

use thiserror::Error;
use tracker_features::TrackerFeatureError;

pub type Result<T> = std::result::Result<T,TrackerValidateError>;

#[derive(Error,Debug)]
pub enum TrackerValidateError {
    #[error("feature service error {0}")]
    FeatureError( #[from] TrackerFeatureError),

    #[error("config error {0}")]
    BuildError( #[from] tracker_build::TrackerBuildError),

    #[error("invalid configuration: {0}")]
    ConfigError(String),

    #[error("geometry error {0}")]
    GeometryError(String),

    #[error("invalid record {0}")]
    RecordError(String),

    #[error("operation failed {0}")]
    OpFailedError(String)
}

impl TrackerValidateError {
    /// errors that invalidate the whole run, as opposed to failures of individual queries
    pub fn is_fatal (&self)->bool {
        match self {
            TrackerValidateError::FeatureError(e) => {
                matches!( e, TrackerFeatureError::FieldNotFound(_) | TrackerFeatureError::GeometryError(_) | TrackerFeatureError::ConfigError(_))
            }
            TrackerValidateError::OpFailedError(_) => false,
            _ => true
        }
    }
}

macro_rules! config_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        crate::errors::TrackerValidateError::ConfigError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use config_error;

macro_rules! geometry_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        crate::errors::TrackerValidateError::GeometryError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use geometry_error;

macro_rules! record_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        crate::errors::TrackerValidateError::RecordError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use record_error;
