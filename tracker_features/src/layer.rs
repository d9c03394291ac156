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

use async_trait::async_trait;
use reqwest::Client;
use url::Url;
use tracker_common::{debug, warn, net::get_query_bytes};
use crate::errors::{Result,op_failed};
use crate::feature::{Feature,FeatureCount,FeatureSet,parse_service_response};
use crate::query::FeatureQuery;
use crate::schema::LayerSchema;

/// the operations we need from a feature layer
#[async_trait]
pub trait FeatureSource: Send + Sync {
    async fn schema (&self)->Result<LayerSchema>;

    /// all features selected by `query`, in the order requested by the query
    async fn query_features (&self, query: &FeatureQuery)->Result<Vec<Feature>>;

    async fn count_features (&self, query: &FeatureQuery)->Result<u64>;
}

/// upper bound for the number of pages we retrieve for a single query
pub const MAX_PAGES: usize = 10_000;

/// retrieve pages from `fetch_page(offset)` until a page has no more features or does not exceed the transfer limit.
/// Layers that don't support pagination ignore the offset and return the same page again, which ends the
/// retrieval without duplicating features
pub async fn collect_pages<F,Fut> (mut fetch_page: F)->Result<Vec<Feature>>
    where F: FnMut(usize)->Fut, Fut: Future<Output=Result<FeatureSet>>
{
    let mut features: Vec<Feature> = Vec::new();
    let mut last_bounds: Option<(Feature,Feature)> = None;

    for _ in 0..MAX_PAGES {
        let page = fetch_page( features.len()).await?;
        let (Some(first), Some(last)) = (page.features.first(), page.features.last()) else { return Ok(features) };

        let bounds = (first.clone(), last.clone());
        if last_bounds.as_ref() == Some(&bounds) {
            warn!("layer repeats page at offset {}, pagination not supported", features.len());
            return Ok(features)
        }

        let more = page.exceeded_transfer_limit;
        features.extend( page.features);
        if !more { return Ok(features) }
        last_bounds = Some(bounds);
    }

    Err( op_failed!("query exceeds {} pages", MAX_PAGES))
}

/// a remote feature layer, identified by its REST url (`.../FeatureServer/<layer-id>`)
#[derive(Debug,Clone)]
pub struct FeatureLayer {
    client: Client,
    url: String,
    token: Option<String>,
    page_size: usize,
}

impl FeatureLayer {
    pub fn new (client: Client, url: &str, token: Option<String>, page_size: usize)->Result<Self> {
        let parsed = Url::parse( url)?;
        if parsed.cannot_be_a_base() {
            return Err( op_failed!("not a layer url: {url}"))
        }

        Ok( FeatureLayer {
            client,
            url: url.trim_end_matches('/').to_string(),
            token,
            page_size: page_size.max(1)
        })
    }

    pub fn url (&self)->&str { self.url.as_str() }

    fn query_url (&self)->String { format!("{}/query", self.url) }

    async fn fetch_page (&self, url: &str, query: &FeatureQuery, offset: usize)->Result<FeatureSet> {
        let mut params = self.with_token( query.to_params());
        params.push( ("resultOffset", offset.to_string()));
        params.push( ("resultRecordCount", self.page_size.to_string()));

        let bytes = get_query_bytes( &self.client, url, &params).await?;
        parse_service_response( &bytes)
    }

    fn with_token (&self, mut params: Vec<(&'static str,String)>)->Vec<(&'static str,String)> {
        if let Some(token) = &self.token {
            params.push( ("token", token.clone()));
        }
        params
    }
}

#[async_trait]
impl FeatureSource for FeatureLayer {
    async fn schema (&self)->Result<LayerSchema> {
        let params = self.with_token( vec![ ("f", "json".to_string()) ]);
        let bytes = get_query_bytes( &self.client, &self.url, &params).await?;
        parse_service_response( &bytes)
    }

    async fn query_features (&self, query: &FeatureQuery)->Result<Vec<Feature>> {
        let url = self.query_url();
        let url = url.as_str();

        let features = collect_pages( move |offset| self.fetch_page( url, query, offset)).await?;
        debug!("{} features from {} where {}", features.len(), self.url, query.where_clause);

        Ok(features)
    }

    async fn count_features (&self, query: &FeatureQuery)->Result<u64> {
        let params = self.with_token( query.to_count_params());
        let bytes = get_query_bytes( &self.client, &self.query_url(), &params).await?;
        let response: FeatureCount = parse_service_response( &bytes)?;
        Ok(response.count)
    }
}
