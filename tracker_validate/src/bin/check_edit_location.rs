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

use std::path::PathBuf;
use anyhow::{anyhow, Result};
use clap::Parser;
use tracker_common::{info, split_list, logging::init_tracing};
use tracker_build::{load_config_path, TrackerBuildError};
use tracker_features::{
    FeatureLayer, FeatureServiceConfig, generate_token, get_service_client, location_tracking_layer_url
};
use tracker_validate::{
    DEFAULT_DATE_FIELD, LayerTrackSource, ToleranceConfig, TracingReporter, WorkOrderFields, load_tolerances, load_work_orders, validate
};

/// reports work orders (assignments, features, surveys) that were edited while the editing worker was
/// not close by, based on location tracks. Requires an organization admin account if the tracks layer
/// is not given explicitly
#[derive(Parser, Debug)]
#[command(version, about = "check that the worker was nearby when editing features", long_about = None)]
pub struct Args {
    /// the username to authenticate with
    #[arg(short, long)]
    username: String,

    /// the password to authenticate with
    #[arg(short, long, env = "TRACKER_PASSWORD", hide_env_values = true)]
    password: String,

    /// the url of the org/portal to use (default is the configured portal_url)
    #[arg(long)]
    org: Option<String>,

    /// comma separated list of user ids of the workers to check
    #[arg(long)]
    workers: Option<String>,

    /// the date field of the layer that is checked. Use the field name, not the alias
    #[arg(long, default_value = DEFAULT_DATE_FIELD)]
    field_name: String,

    /// the feature layer url of the survey, collector or workforce assignment layer with the features to verify
    #[arg(long)]
    layer_url: String,

    /// file to append log output to
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// the tolerance (in minutes) between the date field value and track timestamps
    #[arg(long)]
    time_tolerance: Option<u32>,

    /// the distance tolerance in meters
    #[arg(long)]
    distance_tolerance: Option<f64>,

    /// tracks with a horizontal accuracy worse than this (in meters) are ignored
    #[arg(long)]
    min_accuracy: Option<f64>,

    /// the tracks layer (location tracking service or tracks view) to use. Defaults to the tracks layer of the org
    #[arg(long)]
    tracks_layer_url: Option<String>,

    /// do not verify the SSL certificate of the server
    #[arg(long)]
    skip_ssl_verification: bool,

    /// explicit tolerance config (RON) file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main()->Result<()> {
    tracker_build::set_bin_context!();

    let args = Args::parse();
    init_tracing( args.log_file.as_deref())?;

    let tolerances = get_tolerances( &args)?;
    tolerances.check()?;

    let workers = args.workers.as_deref().map( split_list).unwrap_or_default();
    if workers.is_empty() {
        return Err( anyhow!("please pass at least one worker user id (--workers)"))
    }

    let service_config = get_service_config( &args)?;
    let client = get_service_client( &service_config)?;

    info!("authenticating with {}", service_config.portal_url);
    let token = generate_token( &client, &service_config, &args.username, &args.password).await?.token;

    info!("getting feature layer");
    let layer = FeatureLayer::new( client.clone(), &args.layer_url, Some(token.clone()), service_config.page_size)?;
    let fields = WorkOrderFields::from_source( &layer, &args.field_name).await?;

    info!("getting tracks layer");
    let tracks_url = match &args.tracks_layer_url {
        Some(url) => url.clone(),
        None => location_tracking_layer_url( &client, &service_config, &token).await?
    };
    let tracks_layer = FeatureLayer::new( client, &tracks_url, Some(token), service_config.page_size)?;
    let tracks = LayerTrackSource::new( tracks_layer).await?;

    info!("querying for features edited by a worker in your list");
    let work_orders = load_work_orders( &layer, &fields, &workers).await?;
    if work_orders.is_empty() {
        info!("no features found to check. Please check the user ids that you have passed");
        return Ok(())
    }

    let mut reporter = TracingReporter::new( &args.field_name);
    validate( &work_orders, &tracks, &tolerances, &mut reporter).await?;

    Ok(())
}

fn get_tolerances (args: &Args)->Result<ToleranceConfig> {
    let config: ToleranceConfig = match &args.config {
        Some(path) => load_config_path( path)?,
        None => load_tolerances()?
    };
    Ok( config.with_overrides( args.time_tolerance, args.distance_tolerance, args.min_accuracy) )
}

fn get_service_config (args: &Args)->Result<FeatureServiceConfig> {
    let mut config = match tracker_features::load_config::<FeatureServiceConfig>("feature_service.ron") {
        Ok(config) => config,
        Err(TrackerBuildError::ResourceNotFoundError(_)) => FeatureServiceConfig::default(),
        Err(e) => return Err(e.into())
    };

    if let Some(org) = &args.org {
        config.portal_url = org.clone();
    }
    if args.skip_ssl_verification {
        config.verify_certs = false;
    }

    Ok(config)
}
