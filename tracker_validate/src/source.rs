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

//! sources of worker tracks. The validator only sees the [`TrackSource`] trait, which is implemented
//! for remote tracks layers ([`LayerTrackSource`]) and in-memory track lists ([`MemTrackSource`])

use async_trait::async_trait;
use chrono::{DateTime, Timelike, Utc};
use uom::si::{f64::Length, length::meter};
use tracker_common::datetime::TimeWindow;
use tracker_common::planar::{Envelope,SpatialReference};
use tracker_features::{FeatureQuery,FeatureSource,WhereClause};
use crate::errors::Result;
use crate::mapping::TrackFields;
use crate::model::Track;

/// selects the tracks that might corroborate a work order
#[derive(Debug,Clone,PartialEq)]
pub struct TrackQuery {
    pub creator: String,
    pub window: TimeWindow,
    pub max_accuracy: Length,
    pub envelope: Option<Envelope>,
}

impl TrackQuery {
    pub fn new (creator: &str, window: TimeWindow, max_accuracy: Length)->Self {
        TrackQuery { creator: creator.to_string(), window, max_accuracy, envelope: None }
    }

    pub fn with_envelope (mut self, envelope: Envelope)->Self {
        self.envelope = Some(envelope);
        self
    }

    pub fn matches (&self, track: &Track)->bool {
        track.creator == self.creator
            && self.window.contains( &track.timestamp)
            && track.horizontal_accuracy <= self.max_accuracy
            && self.envelope.as_ref().map_or( true, |env| env.contains_point( &track.location))
    }
}

#[async_trait]
pub trait TrackSource: Send + Sync {
    /// number of tracks of any creator and accuracy within `window`
    async fn count_in_window (&self, window: &TimeWindow)->Result<u64>;

    /// tracks matching `query`, ordered by ascending timestamp
    async fn candidates (&self, query: &TrackQuery)->Result<Vec<Track>>;
}

/* #region MemTrackSource ***************************************************************************/

#[derive(Debug,Clone,Default)]
pub struct MemTrackSource {
    tracks: Vec<Track> // sorted by timestamp
}

impl MemTrackSource {
    pub fn new (mut tracks: Vec<Track>)->Self {
        tracks.sort_by_key( |t| t.timestamp);
        MemTrackSource { tracks }
    }

    pub fn len (&self)->usize { self.tracks.len() }
    pub fn is_empty (&self)->bool { self.tracks.is_empty() }
}

#[async_trait]
impl TrackSource for MemTrackSource {
    async fn count_in_window (&self, window: &TimeWindow)->Result<u64> {
        Ok( self.tracks.iter().filter( |t| window.contains( &t.timestamp)).count() as u64 )
    }

    async fn candidates (&self, query: &TrackQuery)->Result<Vec<Track>> {
        Ok( self.tracks.iter().filter( |t| query.matches(t)).cloned().collect() )
    }
}

/* #endregion MemTrackSource */

/* #region LayerTrackSource *************************************************************************/

/// tracks from a (remote) tracks layer or tracks view
pub struct LayerTrackSource<S> {
    source: S,
    fields: TrackFields,
}

impl<S> LayerTrackSource<S> where S: FeatureSource {
    /// resolves the track fields from the layer schema
    pub async fn new (source: S)->Result<Self> {
        let schema = source.schema().await?;
        let fields = TrackFields::resolve( &schema)?;
        Ok( LayerTrackSource { source, fields } )
    }

    pub fn with_fields (source: S, fields: TrackFields)->Self {
        LayerTrackSource { source, fields }
    }

    pub fn fields (&self)->&TrackFields { &self.fields }

    pub fn candidate_query (&self, query: &TrackQuery)->FeatureQuery {
        let where_clause = WhereClause::new()
            .eq_str( &self.fields.creator, &query.creator)
            .within( &self.fields.timestamp, &query.window)
            .le_num( &self.fields.accuracy, query.max_accuracy.get::<meter>());

        let fq = FeatureQuery::new( where_clause)
            .with_spatial_reference( SpatialReference::web_mercator())
            .ordered_by( &self.fields.timestamp, true);

        match &query.envelope {
            Some(env) => fq.with_envelope( *env),
            None => fq
        }
    }
}

#[async_trait]
impl<S> TrackSource for LayerTrackSource<S> where S: FeatureSource {
    async fn count_in_window (&self, window: &TimeWindow)->Result<u64> {
        let ts_field = &self.fields.timestamp;
        let query = FeatureQuery::new( WhereClause::new().within( ts_field, window)).without_geometry();
        let count = self.source.count_features( &query).await?;

        if count == 0 || (is_whole_second( &window.start) && is_whole_second( &window.end)) {
            return Ok(count)
        }

        // the widened where clause can include tracks that are only within the sub-second margins
        let features = self.source.query_features( &query.with_out_fields( ts_field)).await?;
        let n = features.iter()
            .filter_map( |f| f.datetime_attribute( ts_field))
            .filter( |dt| window.contains( dt))
            .count();
        Ok( n as u64 )
    }

    async fn candidates (&self, query: &TrackQuery)->Result<Vec<Track>> {
        let features = self.source.query_features( &self.candidate_query( query)).await?;

        let mut tracks = Vec::with_capacity( features.len());
        for feature in &features {
            if let Some(track) = self.fields.to_track( feature)? {
                // timestamp literals only have second resolution
                if query.matches( &track) { tracks.push( track) }
            }
        }
        tracks.sort_by_key( |t| t.timestamp); // stable, keeps server order for equal timestamps

        Ok(tracks)
    }
}

fn is_whole_second (dt: &DateTime<Utc>)->bool { dt.nanosecond() == 0 }

/* #endregion LayerTrackSource */
