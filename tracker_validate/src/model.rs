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

use std::{fmt, time::Duration};
use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize};
use uom::si::{f64::Length, length::meter};
use tracker_common::datetime::minutes;
use tracker_common::planar::ProjectedPoint;
use crate::errors::{Result,config_error};

/// a feature whose last edit we want to check against the tracks of its editor
#[derive(Debug,Clone,PartialEq)]
pub struct WorkOrder {
    pub object_id: i64,
    pub editor: String,
    pub edit_timestamp: Option<DateTime<Utc>>,
    pub location: ProjectedPoint,
}

/// a recorded location of a mobile worker
#[derive(Debug,Clone,PartialEq)]
pub struct Track {
    pub creator: String,
    pub timestamp: DateTime<Utc>,
    pub location: ProjectedPoint,
    pub horizontal_accuracy: Length,
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {} {} (±{:.0}m)", self.creator, self.timestamp.format("%Y-%m-%dT%H:%M:%SZ"), self.location, self.horizontal_accuracy.get::<meter>())
    }
}

/// how a track location that has a horizontal accuracy is compared with a work order location
#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,Default)]
pub enum CorroborationPolicy {
    /// the track location or one of its four (±accuracy,±accuracy) corners is closer than the distance tolerance
    #[default]
    FivePoint,

    /// the accuracy circle around the track location overlaps the distance tolerance circle
    CircleOverlap,
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct ToleranceConfig {
    pub time_tolerance_minutes: u32,
    pub distance_tolerance_meters: f64,

    /// tracks with a worse (larger) horizontal accuracy are ignored
    pub min_accuracy_meters: f64,

    #[serde(default)]
    pub corroboration: CorroborationPolicy,
}

impl Default for ToleranceConfig {
    fn default()->Self {
        ToleranceConfig {
            time_tolerance_minutes: 10,
            distance_tolerance_meters: 100.0,
            min_accuracy_meters: 50.0,
            corroboration: CorroborationPolicy::FivePoint,
        }
    }
}

impl ToleranceConfig {
    pub fn time_tolerance (&self)->Duration { minutes( self.time_tolerance_minutes as u64) }
    pub fn distance_tolerance (&self)->Length { Length::new::<meter>( self.distance_tolerance_meters) }
    pub fn min_accuracy (&self)->Length { Length::new::<meter>( self.min_accuracy_meters) }

    /// replace the values for which an override is given (e.g. from command line options)
    pub fn with_overrides (mut self, time_tolerance_minutes: Option<u32>, distance_tolerance_meters: Option<f64>, min_accuracy_meters: Option<f64>)->Self {
        if let Some(v) = time_tolerance_minutes { self.time_tolerance_minutes = v }
        if let Some(v) = distance_tolerance_meters { self.distance_tolerance_meters = v }
        if let Some(v) = min_accuracy_meters { self.min_accuracy_meters = v }
        self
    }

    pub fn check (&self)->Result<()> {
        check_meters( "distance tolerance", self.distance_tolerance_meters)?;
        check_meters( "min accuracy", self.min_accuracy_meters)
    }
}

fn check_meters (what: &str, v: f64)->Result<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err( config_error!("{what} has to be a finite, non-negative number of meters (got {v})"))
    }
}

impl fmt::Display for ToleranceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "time: ±{}min, distance: {}m, min accuracy: {}m, test: {:?}",
            self.time_tolerance_minutes, self.distance_tolerance_meters, self.min_accuracy_meters, self.corroboration)
    }
}
