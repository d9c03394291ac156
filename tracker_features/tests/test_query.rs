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

use std::collections::HashMap;
use serde_json::Value;
use tracker_common::datetime::{parse_datetime,minutes,TimeWindow};
use tracker_common::planar::{Envelope,ProjectedPoint,SpatialReference};
use uom::si::{f64::Length,length::meter};
use tracker_features::*;

fn params_map (params: Vec<(&'static str,String)>)->HashMap<&'static str,String> {
    params.into_iter().collect()
}

#[test]
fn test_where_clause() {
    assert_eq!( WhereClause::new().as_sql(), "1=1");

    let wc = WhereClause::new().eq_str("created_user", "o'brien").le_num("horizontal_accuracy", 50.0);
    assert_eq!( wc.to_string(), "created_user = 'o''brien' AND horizontal_accuracy <= 50");

    let wc = WhereClause::new().any_eq_str("Editor", &["usr_a", "usr_b"]);
    assert_eq!( wc.as_sql(), "(Editor = 'usr_a' OR Editor = 'usr_b')");

    let wc = WhereClause::new().any_eq_str("Editor", &["usr_a"]);
    assert_eq!( wc.as_sql(), "Editor = 'usr_a'");

    let wc = WhereClause::new().any_eq_str::<&str>("Editor", &[]);
    assert_eq!( wc.as_sql(), "1=0");

    assert_eq!( quote_sql_string("it's"), "'it''s'");
}

#[test]
fn test_time_range() {
    let t = parse_datetime("2024-01-01T12:00:00Z").unwrap();
    let window = TimeWindow::around( t, minutes(10));

    let wc = WhereClause::new().within("location_timestamp", &window);
    assert_eq!( wc.as_sql(), "location_timestamp >= timestamp '2024-01-01 11:50:00' AND location_timestamp <= timestamp '2024-01-01 12:10:00'");

    // sub-second bounds never narrow the selection
    let t = parse_datetime("2024-01-01T12:00:00.250Z").unwrap();
    let wc = WhereClause::new().at_or_after("ts", &t).at_or_before("ts", &t);
    assert_eq!( wc.as_sql(), "ts >= timestamp '2024-01-01 12:00:00' AND ts <= timestamp '2024-01-01 12:00:01'");
}

#[test]
fn test_query_params() {
    let query = FeatureQuery::new( WhereClause::new().eq_str("created_user", "usr_a"))
        .ordered_by("location_timestamp", true);
    let params = params_map( query.to_params());
    println!("{params:?}");

    assert_eq!( params["f"], "json");
    assert_eq!( params["where"], "created_user = 'usr_a'");
    assert_eq!( params["outFields"], "*");
    assert_eq!( params["returnGeometry"], "true");
    assert_eq!( params["outSR"], "3857");
    assert_eq!( params["orderByFields"], "location_timestamp ASC");
    assert!( !params.contains_key("geometry"));
    assert!( !params.contains_key("returnCountOnly"));
}

#[test]
fn test_envelope_params() {
    let env = Envelope::around( &ProjectedPoint::from_xy( 1000.0, 2000.0), Length::new::<meter>(150.0));
    let query = FeatureQuery::new( WhereClause::new())
        .with_envelope( env)
        .with_spatial_reference( SpatialReference{ wkid: 102100 });

    let params = params_map( query.to_count_params());
    assert_eq!( params["returnCountOnly"], "true");
    assert_eq!( params["geometryType"], "esriGeometryEnvelope");
    assert_eq!( params["spatialRel"], "esriSpatialRelIntersects");
    assert_eq!( params["inSR"], "102100");
    assert!( !params.contains_key("outFields"));

    let geometry: Value = serde_json::from_str( &params["geometry"]).unwrap();
    assert_eq!( geometry["xmin"], 850.0);
    assert_eq!( geometry["ymin"], 1850.0);
    assert_eq!( geometry["xmax"], 1150.0);
    assert_eq!( geometry["ymax"], 2150.0);
    assert_eq!( geometry["spatialReference"]["wkid"], 102100);
}
