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

//! features (attributes + geometry) as returned by layer queries, and parsing of service responses

use chrono::{DateTime,Utc};
use serde::{Serialize,Deserialize,de::DeserializeOwned};
use serde_json::{Map,Value};
use tracker_common::datetime::{EpochMillis,parse_datetime};
use tracker_common::planar::{ProjectedPoint,SpatialReference};
use crate::errors::{Result,TrackerFeatureError};

/// feature geometry. We only interpret points, everything else is kept as raw JSON
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
#[serde(untagged)]
pub enum Geometry {
    Point { x: f64, y: f64 },
    Other(Value)
}

impl Geometry {
    pub fn as_point (&self)->Option<ProjectedPoint> {
        match self {
            Geometry::Point{x,y} if x.is_finite() && y.is_finite() => Some( ProjectedPoint::from_xy( *x, *y)),
            _ => None
        }
    }
}

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Default)]
pub struct Feature {
    #[serde(default)]
    pub attributes: Map<String,Value>,

    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl Feature {
    pub fn new (attributes: Map<String,Value>, geometry: Option<Geometry>)->Self {
        Feature { attributes, geometry }
    }

    /// the attribute value for `name`, with JSON null mapped to None
    pub fn attribute (&self, name: &str)->Option<&Value> {
        self.attributes.get( name).filter( |v| !v.is_null())
    }

    pub fn str_attribute (&self, name: &str)->Option<&str> {
        self.attribute( name).and_then( |v| v.as_str())
    }

    /// integer attributes sometimes come as floats (e.g. from views)
    pub fn i64_attribute (&self, name: &str)->Option<i64> {
        self.attribute( name).and_then( |v| {
            v.as_i64().or_else( || v.as_f64().filter( |f| f.fract() == 0.0).map( |f| f as i64))
        })
    }

    pub fn f64_attribute (&self, name: &str)->Option<f64> {
        self.attribute( name).and_then( |v| v.as_f64())
    }

    /// date fields are epoch milliseconds. We also accept RFC3339 or SQL timestamp strings
    pub fn datetime_attribute (&self, name: &str)->Option<DateTime<Utc>> {
        match self.attribute( name)? {
            Value::Number(n) => {
                let millis = n.as_i64().or_else( || n.as_f64().map( |f| f.round() as i64))?;
                EpochMillis::new( millis).to_datetime()
            }
            Value::String(s) => parse_datetime( s),
            _ => None
        }
    }

    pub fn point (&self)->Option<ProjectedPoint> {
        self.geometry.as_ref().and_then( |g| g.as_point())
    }
}

/// the result of a `<layer>/query` request (one page)
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Default)]
#[serde(rename_all="camelCase")]
pub struct FeatureSet {
    #[serde(default)]
    pub geometry_type: Option<String>,

    #[serde(default)]
    pub spatial_reference: Option<SpatialReference>,

    #[serde(default)]
    pub features: Vec<Feature>,

    /// set if there are more features than returned in this page
    #[serde(default)]
    pub exceeded_transfer_limit: bool,
}

#[derive(Deserialize,Debug,Clone,Copy,PartialEq)]
pub struct FeatureCount {
    pub count: u64
}

#[derive(Deserialize,Debug)]
struct ServiceErrorResponse {
    error: ServiceErrorBody
}

#[derive(Deserialize,Debug)]
struct ServiceErrorBody {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<String>,
}

/// services report errors as `{"error":{"code":..,"message":..}}` with a 200 http status, which
/// we have to check for before we parse the expected response type
pub fn parse_service_response<T> (bytes: &[u8])->Result<T> where T: DeserializeOwned {
    let value: Value = serde_json::from_slice( bytes)?;
    if value.get("error").is_some() {
        let response: ServiceErrorResponse = serde_json::from_value( value)?;
        let ServiceErrorBody { code, mut message, details } = response.error;
        if !details.is_empty() {
            message = format!("{message} ({})", details.join("; "));
        }
        Err( TrackerFeatureError::ServiceError { code, message })
    } else {
        Ok( serde_json::from_value( value)? )
    }
}
