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

//! client side of feature layer services (as provided by ArcGIS Online / Enterprise portals).
//!
//! The client covers what a validation run needs from a layer: the layer schema (fields and geometry type),
//! attribute/spatial queries with automatic paging, feature counts and token based authentication.
//! Consumers should program against the [`FeatureSource`] trait so that layers can be replaced by
//! in-memory sources in tests.

use serde::{Serialize,Deserialize};
use tracker_build::define_load_config;

pub mod errors;
pub use errors::{Result,TrackerFeatureError};

pub mod schema;
pub use schema::*;

pub mod query;
pub use query::*;

pub mod feature;
pub use feature::*;

pub mod layer;
pub use layer::*;

pub mod auth;
pub use auth::*;

define_load_config!{}

#[derive(Deserialize,Serialize,Debug,Clone,PartialEq)]
pub struct FeatureServiceConfig {
    /// base url of the organization portal, e.g. "https://myorg.maps.arcgis.com"
    pub portal_url: String,

    /// max number of features we request per query page
    pub page_size: usize,

    /// requested token lifetime in minutes
    pub token_expiration: u32,

    pub verify_certs: bool,

    /// if set tokens are issued for this referer (and all requests send it), otherwise tokens are bound to the request ip
    #[serde(default)]
    pub referer: Option<String>,
}

impl Default for FeatureServiceConfig {
    fn default()->Self {
        FeatureServiceConfig {
            portal_url: "https://www.arcgis.com".to_string(),
            page_size: 1000,
            token_expiration: 60,
            verify_certs: true,
            referer: Some("https://www.arcgis.com".to_string()),
        }
    }
}

impl FeatureServiceConfig {
    /// the portal url without trailing '/'
    pub fn portal_base (&self)->&str {
        self.portal_url.trim_end_matches('/')
    }
}

/// get a http client that is configured according to the provided `config`
pub fn get_service_client (config: &FeatureServiceConfig)->Result<reqwest::Client> {
    Ok( tracker_common::net::get_http_client( config.verify_certs, config.referer.as_deref())? )
}
