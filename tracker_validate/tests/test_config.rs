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

use uom::si::{f64::Length, length::meter};
use tracker_build::load_config_path;
use tracker_common::datetime::{minutes, parse_datetime};
use tracker_common::planar::ProjectedPoint;
use tracker_validate::*;

fn m (v: f64)->Length { Length::new::<meter>(v) }

#[test]
fn test_default_tolerances() {
    let config: ToleranceConfig = load_config_path("configs/tolerances.ron").unwrap();
    println!("{config}");
    assert_eq!( config, ToleranceConfig::default());
    assert_eq!( config.time_tolerance(), minutes(10));
    assert_eq!( config.distance_tolerance(), m(100.0));
    assert_eq!( config.min_accuracy(), m(50.0));
    assert_eq!( config.corroboration, CorroborationPolicy::FivePoint);
    assert!( config.check().is_ok());
}

#[test]
fn test_parse_tolerances() {
    let config: ToleranceConfig = ron::from_str("ToleranceConfig( time_tolerance_minutes: 5, distance_tolerance_meters: 25.0, min_accuracy_meters: 10.0, corroboration: CircleOverlap)").unwrap();
    assert_eq!( config.corroboration, CorroborationPolicy::CircleOverlap);

    // the policy is optional
    let config: ToleranceConfig = ron::from_str("( time_tolerance_minutes: 5, distance_tolerance_meters: 25.0, min_accuracy_meters: 10.0)").unwrap();
    assert_eq!( config.corroboration, CorroborationPolicy::FivePoint);
}

#[test]
fn test_overrides() {
    let config = ToleranceConfig::default().with_overrides( Some(3), None, Some(20.0));
    assert_eq!( config.time_tolerance_minutes, 3);
    assert_eq!( config.distance_tolerance_meters, 100.0);
    assert_eq!( config.min_accuracy_meters, 20.0);

    let config = ToleranceConfig::default().with_overrides( None, Some(-5.0), None);
    assert!( matches!( config.check(), Err(TrackerValidateError::ConfigError(_))));
}

#[test]
fn test_search_envelope() {
    let config = ToleranceConfig::default();
    let loc = ProjectedPoint::from_xy( 1000.0, 1000.0);
    let env = search_envelope( &loc, &config);
    assert_eq!( (env.x_min(), env.y_min(), env.x_max(), env.y_max()), (850.0, 850.0, 1150.0, 1150.0));

    // the farthest track that can still corroborate under either policy is inside
    let t = parse_datetime("2024-01-01T12:00:00Z").unwrap();
    let track = Track { creator: "usr_a".into(), timestamp: t, location: ProjectedPoint::from_xy( 1150.0, 1000.0), horizontal_accuracy: m(50.0) };
    assert!( env.contains_point( &track.location));
    assert!( is_corroborated( &loc, &track, config.distance_tolerance(), CorroborationPolicy::CircleOverlap));
}

#[test]
fn test_is_corroborated() {
    let t = parse_datetime("2024-01-01T12:00:00Z").unwrap();
    let loc = ProjectedPoint::from_xy( 0.0, 0.0);
    let track = |x: f64, y: f64, acc: f64| Track { creator: "usr_a".into(), timestamp: t, location: ProjectedPoint::from_xy( x, y), horizontal_accuracy: m(acc) };

    let tol = m(100.0);
    assert!( is_corroborated( &loc, &track( 0.0, 0.0, 0.0), tol, CorroborationPolicy::FivePoint));
    assert!( is_corroborated( &loc, &track( 99.9, 0.0, 0.0), tol, CorroborationPolicy::FivePoint));
    assert!( !is_corroborated( &loc, &track( 100.0, 0.0, 0.0), tol, CorroborationPolicy::FivePoint));
    assert!( is_corroborated( &loc, &track( 100.0, 0.0, 0.0), tol, CorroborationPolicy::CircleOverlap));

    // (-10,-10) corner of (105,0) is at 95.5m
    assert!( is_corroborated( &loc, &track( 105.0, 0.0, 10.0), tol, CorroborationPolicy::FivePoint));
    assert!( !is_corroborated( &loc, &track( 111.0, 0.0, 10.0), tol, CorroborationPolicy::CircleOverlap));

    // zero tolerance never corroborates with the strict five-point test
    assert!( !is_corroborated( &loc, &track( 0.0, 0.0, 0.0), m(0.0), CorroborationPolicy::FivePoint));
}
