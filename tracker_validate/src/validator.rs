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

use std::fmt;
use chrono::{DateTime,Utc};
use uom::si::f64::Length;
use tracker_common::datetime::TimeWindow;
use crate::errors::Result;
use crate::model::{ToleranceConfig,Track,WorkOrder};
use crate::proximity::{is_corroborated,search_envelope};
use crate::report::ValidationReporter;
use crate::source::{TrackQuery,TrackSource};

/// the result of checking a single work order
#[derive(Debug,Clone,PartialEq)]
pub enum Outcome {
    /// the work order has no edit timestamp, it is neither valid nor invalid
    MissingTimestamp,

    /// there are no tracks at all within the time window, i.e. they were not retained
    NoTracksInPeriod,

    Corroborated { track_timestamp: DateTime<Utc> },

    /// no track of the editor corroborates the edit location
    NotCorroborated { candidates: usize },

    /// the track query for this work order failed, it was not checked
    QueryFailed(String),
}

impl Outcome {
    pub fn is_invalid (&self)->bool {
        matches!( self, Outcome::NotCorroborated{..})
    }
}

#[derive(Debug,Clone,Default,PartialEq)]
pub struct ValidationReport {
    /// (object id, outcome) in the order in which work orders were checked
    pub outcomes: Vec<(i64,Outcome)>,
}

impl ValidationReport {
    /// the object ids of all work orders that were not corroborated
    pub fn invalid_ids (&self)->Vec<i64> {
        self.outcomes.iter().filter( |(_,o)| o.is_invalid()).map( |(id,_)| *id).collect()
    }

    pub fn is_invalid (&self, object_id: i64)->bool {
        self.outcome( object_id).map_or( false, |o| o.is_invalid())
    }

    pub fn outcome (&self, object_id: i64)->Option<&Outcome> {
        self.outcomes.iter().find( |(id,_)| *id == object_id).map( |(_,o)| o)
    }

    pub fn count<F> (&self, pred: F)->usize where F: Fn(&Outcome)->bool {
        self.outcomes.iter().filter( |(_,o)| pred(o)).count()
    }

    pub fn len (&self)->usize { self.outcomes.len() }
    pub fn is_empty (&self)->bool { self.outcomes.is_empty() }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "checked {} work orders: {} invalid, {} corroborated, {} without timestamp, {} without retained tracks, {} failed",
            self.len(),
            self.count( Outcome::is_invalid),
            self.count( |o| matches!( o, Outcome::Corroborated{..})),
            self.count( |o| *o == Outcome::MissingTimestamp),
            self.count( |o| *o == Outcome::NoTracksInPeriod),
            self.count( |o| matches!( o, Outcome::QueryFailed(_))))
    }
}

/// check each work order against the tracks of its editor.
///
/// Per work order results (including failed track queries) are data in the returned report. Errors are
/// only returned for problems that make the whole run meaningless, such as invalid tolerances, unresolvable
/// fields or non-point track geometries
pub async fn validate<T,R> (work_orders: &[WorkOrder], tracks: &T, config: &ToleranceConfig, reporter: &mut R)->Result<ValidationReport>
    where T: TrackSource + ?Sized, R: ValidationReporter + ?Sized
{
    config.check()?;
    reporter.started( work_orders.len(), config);

    let mut report = ValidationReport { outcomes: Vec::with_capacity( work_orders.len()) };
    for wo in work_orders {
        let outcome = match check_work_order( wo, tracks, config, reporter).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                reporter.query_failed( wo, &e);
                Outcome::QueryFailed( e.to_string())
            }
        };
        report.outcomes.push( (wo.object_id, outcome));
    }

    reporter.finished( &report);
    Ok(report)
}

async fn check_work_order<T,R> (wo: &WorkOrder, tracks: &T, config: &ToleranceConfig, reporter: &mut R)->Result<Outcome>
    where T: TrackSource + ?Sized, R: ValidationReporter + ?Sized
{
    let Some(edit_timestamp) = wo.edit_timestamp else {
        reporter.missing_timestamp( wo);
        return Ok(Outcome::MissingTimestamp)
    };

    let window = TimeWindow::around( edit_timestamp, config.time_tolerance());
    if tracks.count_in_window( &window).await? == 0 {
        reporter.no_tracks_in_period( wo, &window);
        return Ok(Outcome::NoTracksInPeriod)
    }

    let query = TrackQuery::new( &wo.editor, window, config.min_accuracy())
        .with_envelope( search_envelope( &wo.location, config));
    let candidates = tracks.candidates( &query).await?;

    let distance_tolerance = config.distance_tolerance();
    for track in candidates.iter().filter( |t| query.matches(t)) {
        if is_corroborated( &wo.location, track, distance_tolerance, config.corroboration) {
            reporter.corroborated( wo, track);
            return Ok(Outcome::Corroborated{ track_timestamp: track.timestamp })
        }
    }

    let closest = closest_distance( wo, &candidates);
    reporter.not_corroborated( wo, candidates.len(), closest);
    Ok(Outcome::NotCorroborated{ candidates: candidates.len() })
}

fn closest_distance (wo: &WorkOrder, tracks: &[Track])->Option<Length> {
    tracks.iter()
        .map( |t| t.location.distance_to( &wo.location))
        .reduce( |a,b| if b < a { b } else { a })
}
