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

//! token authentication and organization level service lookup

use reqwest::Client;
use serde::{Serialize,Deserialize};
use serde_json::Value;
use tracker_common::net::{get_query_bytes,post_form_bytes};
use crate::FeatureServiceConfig;
use crate::errors::{Result,op_failed};
use crate::feature::parse_service_response;

/// the `helperServices` entry of the portal self resource that points to the location tracking service
const LOCATION_TRACKING_POINTER: &'static str = "/helperServices/locationTracking/url";

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct Token {
    pub token: String,

    /// epoch millis
    #[serde(default)]
    pub expires: Option<i64>,

    #[serde(default)]
    pub ssl: bool,
}

/// obtain a token for the given user from the portal's `generateToken` endpoint.
pub async fn generate_token (client: &Client, config: &FeatureServiceConfig, username: &str, password: &str)->Result<Token> {
    let url = format!("{}/sharing/rest/generateToken", config.portal_base());

    let mut params: Vec<(&str,String)> = vec![
        ("username", username.to_string()),
        ("password", password.to_string()),
        ("expiration", config.token_expiration.to_string()),
        ("f", "json".to_string()),
    ];
    match &config.referer {
        Some(referer) => {
            params.push( ("client", "referer".to_string()));
            params.push( ("referer", referer.clone()));
        }
        None => params.push( ("client", "requestip".to_string()))
    }

    let bytes = post_form_bytes( client, &url, &params).await?;
    parse_service_response( &bytes)
}

/// get the url of the organization's tracks layer from the portal self resource.
/// This requires admin privileges and location tracking being enabled for the organization
pub async fn location_tracking_layer_url (client: &Client, config: &FeatureServiceConfig, token: &str)->Result<String> {
    let url = format!("{}/sharing/rest/portals/self", config.portal_base());
    let params = [ ("f", "json"), ("token", token) ];

    let bytes = get_query_bytes( client, &url, &params).await?;
    let portal: Value = parse_service_response( &bytes)?;
    tracks_layer_url_from_portal( &portal)
}

/// the tracks layer is the first layer of the location tracking service
pub fn tracks_layer_url_from_portal (portal: &Value)->Result<String> {
    portal.pointer( LOCATION_TRACKING_POINTER)
        .and_then( |v| v.as_str())
        .filter( |url| !url.is_empty())
        .map( |url| format!("{}/0", url.trim_end_matches('/')))
        .ok_or_else( || op_failed!("no location tracking service - check that you are an admin and that location tracking is enabled for your organization"))
}
