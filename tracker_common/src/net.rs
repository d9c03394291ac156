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

//! common utility functions for network operations

use reqwest::{Client, Response, StatusCode, header::{HeaderMap, HeaderValue, REFERER}};
use serde::Serialize;

use crate::define_error;

define_error!{ pub TrackerNetError =
    HttpError(#[from] reqwest::Error) : "http error: {0}",
    NotFoundError(String) : "not found {0}",
    StatusError(String) : "unexpected response status: {0}",
    ParseError(String) : "parse error: {0}"
}

pub type Result<T> = std::result::Result<T, TrackerNetError>;

/// a http client that optionally accepts invalid (e.g. self signed) server certificates.
/// If a referer is given it is sent with each request (tokens issued for a referer require it)
pub fn get_http_client (verify_certs: bool, referer: Option<&str>)->Result<Client> {
    let mut headers = HeaderMap::new();
    if let Some(referer) = referer {
        let value = HeaderValue::from_str( referer).map_err( |e| TrackerNetError::ParseError( format!("invalid referer {referer}: {e}")))?;
        headers.insert( REFERER, value);
    }

    Ok( Client::builder()
        .danger_accept_invalid_certs( !verify_certs)
        .default_headers( headers)
        .build()? )
}

/// GET request with url encoded query parameters, returning the raw response bytes
pub async fn get_query_bytes<P> (client: &Client, url: &str, params: &P)->Result<bytes::Bytes> where P: Serialize + ?Sized {
    let response = client.get(url).query(params).send().await?;
    checked_bytes( url, response).await
}

/// POST request with form encoded parameters, returning the raw response bytes
pub async fn post_form_bytes<P> (client: &Client, url: &str, params: &P)->Result<bytes::Bytes> where P: Serialize + ?Sized {
    let response = client.post(url).form(params).send().await?;
    checked_bytes( url, response).await
}

async fn checked_bytes (url: &str, response: Response)->Result<bytes::Bytes> {
    match response.status() {
        StatusCode::OK => Ok( response.bytes().await? ),
        StatusCode::NOT_FOUND => Err( TrackerNetError::NotFoundError( url.to_string())),
        other => Err( TrackerNetError::StatusError( format!("{other:?} for {url}")))
    }
}
