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

//! where clause construction and query parameters for feature layer queries

use std::fmt;
use chrono::{DateTime,TimeDelta,Utc,Timelike};
use serde_json::json;
use tracker_common::datetime::{TimeWindow,sql_timestamp_string};
use tracker_common::planar::{Envelope,SpatialReference};

/// the where clause that selects all features
pub const ALL_FEATURES: &'static str = "1=1";

/// a SQL-92 where clause that is built from AND-ed terms. String values are always quoted
#[derive(Debug,Clone,Default,PartialEq)]
pub struct WhereClause {
    terms: Vec<String>
}

impl WhereClause {
    pub fn new()->Self { WhereClause { terms: Vec::new() } }

    pub fn is_empty (&self)->bool { self.terms.is_empty() }

    /// `field = 'value'`
    pub fn eq_str (mut self, field: &str, value: &str)->Self {
        self.terms.push( format!("{field} = {}", quote_sql_string( value)));
        self
    }

    /// `(field = 'v0' OR field = 'v1' ..)`. An empty value list never matches
    pub fn any_eq_str<S: AsRef<str>> (mut self, field: &str, values: &[S])->Self {
        let alternatives: Vec<String> = values.iter().map( |v| format!("{field} = {}", quote_sql_string( v.as_ref()))).collect();
        let term = match alternatives.len() {
            0 => "1=0".to_string(),
            1 => alternatives.into_iter().collect(),
            _ => format!("({})", alternatives.join(" OR "))
        };
        self.terms.push( term);
        self
    }

    /// `field >= timestamp '...'`, rounded down to full seconds
    pub fn at_or_after (mut self, field: &str, dt: &DateTime<Utc>)->Self {
        self.terms.push( format!("{field} >= timestamp '{}'", sql_timestamp_string( dt)));
        self
    }

    /// `field <= timestamp '...'`, rounded up to full seconds
    pub fn at_or_before (mut self, field: &str, dt: &DateTime<Utc>)->Self {
        self.terms.push( format!("{field} <= timestamp '{}'", sql_timestamp_string( &ceil_to_second( dt))));
        self
    }

    /// both bounds of the window are inclusive. Since timestamp literals only have second resolution the
    /// clause might select a bit more than the window, which callers have to filter if it matters
    pub fn within (self, field: &str, window: &TimeWindow)->Self {
        self.at_or_after( field, &window.start).at_or_before( field, &window.end)
    }

    /// `field <= value`
    pub fn le_num (mut self, field: &str, value: f64)->Self {
        self.terms.push( format!("{field} <= {value}"));
        self
    }

    pub fn as_sql (&self)->String {
        if self.terms.is_empty() {
            ALL_FEATURES.to_string()
        } else {
            self.terms.join(" AND ")
        }
    }
}

impl fmt::Display for WhereClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_sql())
    }
}

/// single quote a string literal, doubling embedded quotes
pub fn quote_sql_string (s: &str)->String {
    format!("'{}'", s.replace('\'', "''"))
}

fn ceil_to_second (dt: &DateTime<Utc>)->DateTime<Utc> {
    if dt.nanosecond() > 0 {
        dt.with_nanosecond(0).and_then( |d| d.checked_add_signed( TimeDelta::seconds(1))).unwrap_or( *dt)
    } else {
        *dt
    }
}

/* #region FeatureQuery ***************************************************************************/

/// what to ask a feature layer for. Envelope coordinates and returned geometries both use `spatial_reference`
#[derive(Debug,Clone,PartialEq)]
pub struct FeatureQuery {
    pub where_clause: WhereClause,
    pub envelope: Option<Envelope>,
    pub spatial_reference: SpatialReference,
    pub order_by: Option<String>,
    pub out_fields: String,
    pub return_geometry: bool,
}

impl FeatureQuery {
    pub fn new (where_clause: WhereClause)->Self {
        FeatureQuery {
            where_clause,
            envelope: None,
            spatial_reference: SpatialReference::web_mercator(),
            order_by: None,
            out_fields: "*".to_string(),
            return_geometry: true,
        }
    }

    /// only features intersecting `envelope`
    pub fn with_envelope (mut self, envelope: Envelope)->Self {
        self.envelope = Some(envelope);
        self
    }

    pub fn ordered_by (mut self, field: &str, ascending: bool)->Self {
        self.order_by = Some( format!("{field} {}", if ascending {"ASC"} else {"DESC"}));
        self
    }

    pub fn with_spatial_reference (mut self, spatial_reference: SpatialReference)->Self {
        self.spatial_reference = spatial_reference;
        self
    }

    /// restrict returned attributes to the given (comma separated) field list
    pub fn with_out_fields (mut self, out_fields: &str)->Self {
        self.out_fields = out_fields.to_string();
        self
    }

    pub fn without_geometry (mut self)->Self {
        self.return_geometry = false;
        self
    }

    /// the request parameters of a `<layer>/query` request (without paging and token)
    pub fn to_params (&self)->Vec<(&'static str,String)> {
        let mut params = self.filter_params();
        params.push( ("outFields", self.out_fields.clone()));
        params.push( ("returnGeometry", self.return_geometry.to_string()));
        params.push( ("outSR", self.spatial_reference.wkid.to_string()));
        if let Some(order_by) = &self.order_by {
            params.push( ("orderByFields", order_by.clone()));
        }
        params
    }

    /// the request parameters to count the features selected by this query
    pub fn to_count_params (&self)->Vec<(&'static str,String)> {
        let mut params = self.filter_params();
        params.push( ("returnCountOnly", "true".to_string()));
        params
    }

    fn filter_params (&self)->Vec<(&'static str,String)> {
        let mut params = vec![
            ("f", "json".to_string()),
            ("where", self.where_clause.as_sql()),
        ];

        if let Some(env) = &self.envelope {
            let geometry = json!({
                "xmin": env.x_min(), "ymin": env.y_min(), "xmax": env.x_max(), "ymax": env.y_max(),
                "spatialReference": { "wkid": self.spatial_reference.wkid }
            });
            params.push( ("geometry", geometry.to_string()));
            params.push( ("geometryType", "esriGeometryEnvelope".to_string()));
            params.push( ("spatialRel", "esriSpatialRelIntersects".to_string()));
            params.push( ("inSR", self.spatial_reference.wkid.to_string()));
        }

        params
    }
}

/* #endregion FeatureQuery */
