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

use uom::si::f64::Length;
use tracker_common::planar::{Envelope,ProjectedPoint};
use crate::model::{CorroborationPolicy,ToleranceConfig,Track};

/// does `track` corroborate that its creator was at `location`
pub fn is_corroborated (location: &ProjectedPoint, track: &Track, distance_tolerance: Length, policy: CorroborationPolicy)->bool {
    match policy {
        CorroborationPolicy::FivePoint => {
            track.location.with_diagonal_corners( track.horizontal_accuracy).iter()
                .any( |p| p.distance_to( location) < distance_tolerance)
        }
        CorroborationPolicy::CircleOverlap => {
            track.location.distance_to( location) <= distance_tolerance + track.horizontal_accuracy
        }
    }
}

/// the square around `location` that contains all track locations which could corroborate under `config`.
/// Candidate tracks have an accuracy of at most `min_accuracy`, hence each coordinate of a corroborating
/// track differs by less than (or for circle overlap, at most) `distance_tolerance + min_accuracy`
pub fn search_envelope (location: &ProjectedPoint, config: &ToleranceConfig)->Envelope {
    let half_width = config.distance_tolerance() + config.min_accuracy();
    Envelope::around( location, half_width)
}

