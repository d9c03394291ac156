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

use std::sync::Mutex;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use uom::si::{f64::Length, length::meter};
use tracker_common::datetime::{parse_datetime, minutes, TimeWindow};
use tracker_common::planar::ProjectedPoint;
use tracker_features::{
    Feature, FeatureQuery, FeatureSource, Field, LayerSchema, TrackerFeatureError, POINT_GEOMETRY
};
use tracker_validate::*;

/// a feature layer stand-in that returns the same features for every query and records the queries
struct StubLayer {
    schema: LayerSchema,
    features: Vec<Feature>,
    count: u64,
    queries: Mutex<Vec<FeatureQuery>>,
}

impl StubLayer {
    fn new (schema: LayerSchema, features: Vec<Value>, count: u64)->Self {
        let features = features.into_iter().map( |v| serde_json::from_value(v).unwrap()).collect();
        StubLayer { schema, features, count, queries: Mutex::new( Vec::new()) }
    }

    fn last_where (&self)->String {
        self.queries.lock().unwrap().last().map( |q| q.where_clause.as_sql()).unwrap_or_default()
    }
}

#[async_trait]
impl FeatureSource for StubLayer {
    async fn schema (&self)->tracker_features::Result<LayerSchema> {
        Ok( self.schema.clone())
    }

    async fn query_features (&self, query: &FeatureQuery)->tracker_features::Result<Vec<Feature>> {
        self.queries.lock().unwrap().push( query.clone());
        Ok( self.features.clone())
    }

    async fn count_features (&self, query: &FeatureQuery)->tracker_features::Result<u64> {
        self.queries.lock().unwrap().push( query.clone());
        Ok( self.count)
    }
}

/// a tracks layer stand-in that applies the timestamp bounds of the where clause like a feature service
struct TimeBoundLayer {
    features: Vec<Feature>,
}

impl TimeBoundLayer {
    fn new (features: Vec<Value>)->Self {
        let features = features.into_iter().map( |v| serde_json::from_value(v).unwrap()).collect();
        TimeBoundLayer { features }
    }

    fn bound (sql: &str, op: &str)->Option<DateTime<Utc>> {
        let term = sql.split(" AND ").find( |t| t.starts_with("LocationTimestamp") && t.contains( op))?;
        let lit = term.split('\'').nth(1)?;
        parse_datetime( lit)
    }

    fn selected (&self, query: &FeatureQuery)->Vec<Feature> {
        let sql = query.where_clause.as_sql();
        let lo = Self::bound( &sql, ">= timestamp");
        let hi = Self::bound( &sql, "<= timestamp");

        self.features.iter().filter( |f| {
            match f.datetime_attribute("LocationTimestamp") {
                Some(dt) => lo.map_or( true, |lo| dt >= lo) && hi.map_or( true, |hi| dt <= hi),
                None => false
            }
        }).cloned().collect()
    }
}

#[async_trait]
impl FeatureSource for TimeBoundLayer {
    async fn schema (&self)->tracker_features::Result<LayerSchema> {
        Ok( tracks_schema())
    }

    async fn query_features (&self, query: &FeatureQuery)->tracker_features::Result<Vec<Feature>> {
        Ok( self.selected( query))
    }

    async fn count_features (&self, query: &FeatureQuery)->tracker_features::Result<u64> {
        Ok( self.selected( query).len() as u64)
    }
}

fn fields (names: &[&str])->Vec<Field> {
    names.iter().map( |n| Field::new( n, "esriFieldTypeString")).collect()
}

fn work_order_schema()->LayerSchema {
    LayerSchema::new( "assignments", Some(POINT_GEOMETRY), fields( &["objectid", "editor", "edit_date", "status"]))
}

fn tracks_schema()->LayerSchema {
    LayerSchema::new( "tracks", Some(POINT_GEOMETRY), fields( &["ObjectId", "CreatedUser", "LocationTimestamp", "HorizontalAccuracy"]))
}

const T0_MILLIS: i64 = 1704110400000; // 2024-01-01T12:00:00Z

#[test]
fn test_work_order_fields() {
    let wof = WorkOrderFields::resolve( &work_order_schema(), "EditDate").unwrap();
    assert_eq!( wof, WorkOrderFields { object_id: "objectid".into(), editor: "editor".into(), edit_date: "edit_date".into() });

    // object id falls back to the layer's objectIdField
    let mut schema = LayerSchema::new( "view", Some(POINT_GEOMETRY), fields( &["FID", "Editor", "EditDate"]));
    schema.object_id_field = Some("FID".to_string());
    assert_eq!( WorkOrderFields::resolve( &schema, "EditDate").unwrap().object_id, "FID");

    match WorkOrderFields::resolve( &work_order_schema(), "CompletedDate") {
        Err(e) => {
            assert!( matches!( e, TrackerValidateError::FeatureError(TrackerFeatureError::FieldNotFound(_))));
            assert!( e.is_fatal());
        }
        Ok(f) => panic!("unexpected fields {f:?}")
    }

    let schema = LayerSchema::new( "areas", Some("esriGeometryPolygon"), fields( &["objectid", "editor", "edit_date"]));
    match WorkOrderFields::resolve( &schema, "EditDate") {
        Err(e) => assert!( e.is_fatal()),
        Ok(f) => panic!("polygon layers should not resolve {f:?}")
    }
}

#[test]
fn test_track_fields() {
    let tf = TrackFields::resolve( &tracks_schema()).unwrap();
    assert_eq!( tf.creator, "CreatedUser");
    assert_eq!( tf.timestamp, "LocationTimestamp");
    assert_eq!( tf.accuracy, "HorizontalAccuracy");

    let feature: Feature = serde_json::from_value( json!({
        "attributes": { "CreatedUser": "usr_a", "LocationTimestamp": T0_MILLIS, "HorizontalAccuracy": 4.5 },
        "geometry": { "x": 1.0, "y": 2.0 }
    })).unwrap();
    let track = tf.to_track( &feature).unwrap().unwrap();
    assert_eq!( track.creator, "usr_a");
    assert_eq!( track.timestamp, parse_datetime("2024-01-01T12:00:00Z").unwrap());
    assert_eq!( track.location, ProjectedPoint::from_xy( 1.0, 2.0));
    assert_eq!( track.horizontal_accuracy.get::<meter>(), 4.5);

    let incomplete: Feature = serde_json::from_value( json!({
        "attributes": { "CreatedUser": "usr_a", "LocationTimestamp": T0_MILLIS, "HorizontalAccuracy": null },
        "geometry": { "x": 1.0, "y": 2.0 }
    })).unwrap();
    assert_eq!( tf.to_track( &incomplete).unwrap(), None);

    let no_point: Feature = serde_json::from_value( json!({
        "attributes": { "CreatedUser": "usr_a", "LocationTimestamp": T0_MILLIS, "HorizontalAccuracy": 1.0 },
        "geometry": { "paths": [] }
    })).unwrap();
    assert!( matches!( tf.to_track( &no_point), Err(TrackerValidateError::GeometryError(_))));
}

#[tokio::test]
async fn test_load_work_orders() {
    let layer = StubLayer::new( work_order_schema(), vec![
        json!({ "attributes": { "objectid": 1, "editor": "usr_a", "edit_date": T0_MILLIS }, "geometry": { "x": 10.0, "y": 20.0 } }),
        json!({ "attributes": { "objectid": 2, "editor": "usr_b", "edit_date": null }, "geometry": { "x": 10.0, "y": 20.0 } }),
        json!({ "attributes": { "objectid": 3, "editor": null, "edit_date": T0_MILLIS }, "geometry": { "x": 10.0, "y": 20.0 } }),
    ], 0);

    let fields = WorkOrderFields::from_source( &layer, "EditDate").await.unwrap();
    let work_orders = load_work_orders( &layer, &fields, &["usr_a", "usr_b"]).await.unwrap();
    println!("{work_orders:#?}");

    assert_eq!( layer.last_where(), "(editor = 'usr_a' OR editor = 'usr_b')");
    assert_eq!( work_orders.len(), 2); // no editor -> not checkable
    assert_eq!( work_orders[0].object_id, 1);
    assert_eq!( work_orders[0].edit_timestamp, parse_datetime("2024-01-01T12:00:00Z"));
    assert_eq!( work_orders[0].location, ProjectedPoint::from_xy( 10.0, 20.0));
    assert_eq!( work_orders[1].editor, "usr_b");
    assert_eq!( work_orders[1].edit_timestamp, None);

    let no_editors: [&str;0] = [];
    let res = load_work_orders( &layer, &fields, &no_editors).await;
    assert!( matches!( res, Err(TrackerValidateError::ConfigError(_))));
}

#[tokio::test]
async fn test_load_work_orders_without_geometry() {
    let layer = StubLayer::new( work_order_schema(), vec![
        json!({ "attributes": { "objectid": 1, "editor": "usr_a", "edit_date": T0_MILLIS } }),
    ], 0);
    let fields = WorkOrderFields::resolve( &work_order_schema(), "EditDate").unwrap();

    let res = load_work_orders( &layer, &fields, &["usr_a"]).await;
    assert!( matches!( res, Err(TrackerValidateError::GeometryError(_))));
}

#[tokio::test]
async fn test_layer_track_source() {
    let t0 = parse_datetime("2024-01-01T12:00:00Z").unwrap();
    let layer = StubLayer::new( tracks_schema(), vec![
        json!({ "attributes": { "CreatedUser": "usr_a", "LocationTimestamp": T0_MILLIS + 60_000, "HorizontalAccuracy": 5.0 }, "geometry": { "x": 0.0, "y": 0.0 } }),
        json!({ "attributes": { "CreatedUser": "usr_a", "LocationTimestamp": T0_MILLIS - 60_000, "HorizontalAccuracy": 5.0 }, "geometry": { "x": 0.0, "y": 0.0 } }),
        // selected by the second resolution where clause but outside the window
        json!({ "attributes": { "CreatedUser": "usr_a", "LocationTimestamp": T0_MILLIS + 600_500, "HorizontalAccuracy": 5.0 }, "geometry": { "x": 0.0, "y": 0.0 } }),
        json!({ "attributes": { "CreatedUser": "usr_a", "LocationTimestamp": null, "HorizontalAccuracy": 5.0 }, "geometry": { "x": 0.0, "y": 0.0 } }),
    ], 4);

    let source = LayerTrackSource::new( layer).await.unwrap();
    let window = TimeWindow::around( t0, minutes(10));
    let query = TrackQuery::new( "usr_a", window, Length::new::<meter>(50.0))
        .with_envelope( search_envelope( &ProjectedPoint::from_xy( 0.0, 0.0), &ToleranceConfig::default()));

    let fq = source.candidate_query( &query);
    assert_eq!( fq.where_clause.as_sql(), "CreatedUser = 'usr_a' AND LocationTimestamp >= timestamp '2024-01-01 11:50:00' AND LocationTimestamp <= timestamp '2024-01-01 12:10:00' AND HorizontalAccuracy <= 50");
    assert_eq!( fq.order_by.as_deref(), Some("LocationTimestamp ASC"));
    assert!( fq.envelope.is_some());

    assert_eq!( source.count_in_window( &window).await.unwrap(), 4);

    let tracks = source.candidates( &query).await.unwrap();
    assert_eq!( tracks.len(), 2);
    assert!( tracks[0].timestamp < tracks[1].timestamp);
}

#[tokio::test]
async fn test_layer_validation() {
    let layer = StubLayer::new( tracks_schema(), vec![
        json!({ "attributes": { "CreatedUser": "usr_a", "LocationTimestamp": T0_MILLIS + 300_000, "HorizontalAccuracy": 10.0 }, "geometry": { "x": 95.0, "y": 0.0 } }),
    ], 1);
    let tracks = LayerTrackSource::new( layer).await.unwrap();

    let work_orders = vec![
        WorkOrder { object_id: 1, editor: "usr_a".into(), edit_timestamp: parse_datetime("2024-01-01T12:00:00Z"), location: ProjectedPoint::from_xy( 0.0, 0.0) },
        WorkOrder { object_id: 2, editor: "usr_b".into(), edit_timestamp: parse_datetime("2024-01-01T12:00:00Z"), location: ProjectedPoint::from_xy( 0.0, 0.0) },
    ];

    let mut reporter = TracingReporter::new("EditDate");
    let report = validate( &work_orders, &tracks, &ToleranceConfig::default(), &mut reporter).await.unwrap();
    assert_eq!( report.invalid_ids(), vec![2]);
}

#[tokio::test]
async fn test_retention_count_with_fractional_edit_time() {
    // window is [11:50:00.500, 12:10:00.500], the where clause selects up to 12:10:01
    let t = parse_datetime("2024-01-01T12:00:00.500Z").unwrap();
    let window = TimeWindow::around( t, minutes(10));

    let source = LayerTrackSource::new( TimeBoundLayer::new( vec![
        json!({ "attributes": { "CreatedUser": "usr_a", "LocationTimestamp": T0_MILLIS + 600_800, "HorizontalAccuracy": 5.0 }, "geometry": { "x": 0.0, "y": 0.0 } }),
    ])).await.unwrap();
    assert_eq!( source.count_in_window( &window).await.unwrap(), 0);

    let work_orders = vec![
        WorkOrder { object_id: 1, editor: "usr_a".into(), edit_timestamp: Some(t), location: ProjectedPoint::from_xy( 0.0, 0.0) },
    ];
    let mut reporter = TracingReporter::new("EditDate");
    let report = validate( &work_orders, &source, &ToleranceConfig::default(), &mut reporter).await.unwrap();
    assert_eq!( report.outcome(1), Some(&Outcome::NoTracksInPeriod));
    assert!( report.invalid_ids().is_empty());

    // tracks inside the window are still counted
    let source = LayerTrackSource::new( TimeBoundLayer::new( vec![
        json!({ "attributes": { "CreatedUser": "usr_b", "LocationTimestamp": T0_MILLIS + 600_500, "HorizontalAccuracy": 5.0 }, "geometry": { "x": 0.0, "y": 0.0 } }),
        json!({ "attributes": { "CreatedUser": "usr_b", "LocationTimestamp": T0_MILLIS - 599_500, "HorizontalAccuracy": 5.0 }, "geometry": { "x": 0.0, "y": 0.0 } }),
        json!({ "attributes": { "CreatedUser": "usr_b", "LocationTimestamp": T0_MILLIS - 599_800, "HorizontalAccuracy": 5.0 }, "geometry": { "x": 0.0, "y": 0.0 } }),
    ])).await.unwrap();
    assert_eq!( source.count_in_window( &window).await.unwrap(), 2);
}

#[tokio::test]
async fn test_retention_count_with_whole_second_window() {
    let layer = TimeBoundLayer::new( vec![
        json!({ "attributes": { "CreatedUser": "usr_a", "LocationTimestamp": T0_MILLIS + 600_000, "HorizontalAccuracy": 5.0 }, "geometry": { "x": 0.0, "y": 0.0 } }),
    ]);
    let source = LayerTrackSource::new( layer).await.unwrap();
    let window = TimeWindow::around( parse_datetime("2024-01-01T12:00:00Z").unwrap(), minutes(10));

    assert_eq!( source.count_in_window( &window).await.unwrap(), 1);
}

#[tokio::test]
async fn test_non_point_tracks_layer() {
    let layer = StubLayer::new( LayerSchema::new( "lines", Some("esriGeometryPolyline"), vec![]), vec![], 0);
    match LayerTrackSource::new( layer).await {
        Err(e) => assert!( e.is_fatal()),
        Ok(_) => panic!("polyline layers can't be track sources")
    }
}

#[test]
fn test_diagnostic_line() {
    assert_eq!( invalid_work_order_line( 42, "EditDate"),
        "The user who last edited the feature with OBJECTID 42 was potentially not within the distance tolerance when updating the field EditDate");
}
