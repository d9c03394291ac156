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

//! mapping of layer features to typed [`WorkOrder`] and [`Track`] records.
//!
//! Field names are resolved once per layer from its schema. Lookups are case and underscore insensitive
//! so that the same logical names work across hosted, enterprise and view layers.

use uom::si::{f64::Length, length::meter};
use tracker_common::{debug, warn};
use tracker_common::planar::SpatialReference;
use tracker_features::{Feature, FeatureQuery, FeatureSource, LayerSchema, WhereClause};
use crate::errors::{Result, config_error, geometry_error, record_error};
use crate::model::{Track, WorkOrder};

pub const OBJECT_ID_FIELD: &'static str = "OBJECTID";
pub const EDITOR_FIELD: &'static str = "Editor";
pub const DEFAULT_DATE_FIELD: &'static str = "EditDate";

pub const TRACK_CREATOR_FIELD: &'static str = "created_user";
pub const TRACK_TIMESTAMP_FIELD: &'static str = "location_timestamp";
pub const TRACK_ACCURACY_FIELD: &'static str = "horizontal_accuracy";

/* #region work orders ******************************************************************************/

/// the real field names of a work order layer
#[derive(Debug,Clone,PartialEq)]
pub struct WorkOrderFields {
    pub object_id: String,
    pub editor: String,
    pub edit_date: String,
}

impl WorkOrderFields {
    /// fails if the layer does not have point geometry or if one of the fields can't be resolved
    pub fn resolve (schema: &LayerSchema, date_field: &str)->Result<Self> {
        schema.check_point_geometry()?;

        let object_id = match (schema.resolve_field( OBJECT_ID_FIELD), &schema.object_id_field) {
            (Some(name), _) => name.to_string(),
            (None, Some(name)) => name.clone(),
            (None, None) => schema.require_field( OBJECT_ID_FIELD)?.to_string()
        };
        let editor = schema.require_field( EDITOR_FIELD)?.to_string();
        let edit_date = schema.require_field( date_field)?.to_string();

        Ok( WorkOrderFields { object_id, editor, edit_date } )
    }

    pub async fn from_source<S> (source: &S, date_field: &str)->Result<Self> where S: FeatureSource + ?Sized {
        let schema = source.schema().await?;
        Self::resolve( &schema, date_field)
    }

    /// all work orders last edited by one of `editors`, in Web Mercator coordinates
    pub fn query<T: AsRef<str>> (&self, editors: &[T])->FeatureQuery {
        FeatureQuery::new( WhereClause::new().any_eq_str( &self.editor, editors))
            .with_spatial_reference( SpatialReference::web_mercator())
    }

    /// features without editor are not checkable and are mapped to None
    pub fn to_work_order (&self, feature: &Feature)->Result<Option<WorkOrder>> {
        let object_id = feature.i64_attribute( &self.object_id)
            .ok_or_else( || record_error!("work order without {}: {:?}", self.object_id, feature.attributes))?;

        let editor = match feature.str_attribute( &self.editor) {
            Some(editor) if !editor.is_empty() => editor.to_string(),
            _ => return Ok(None)
        };

        let location = feature.point()
            .ok_or_else( || geometry_error!("work order {object_id} has no point geometry: {:?}", feature.geometry))?;

        let edit_timestamp = feature.datetime_attribute( &self.edit_date);

        Ok( Some( WorkOrder { object_id, editor, edit_timestamp, location }) )
    }
}

/// load the work orders last edited by one of the given `editors`. An empty result is not an error
pub async fn load_work_orders<S,T> (source: &S, fields: &WorkOrderFields, editors: &[T])->Result<Vec<WorkOrder>>
    where S: FeatureSource + ?Sized, T: AsRef<str>
{
    if editors.is_empty() {
        return Err( config_error!("at least one worker user id is required"))
    }

    let features = source.query_features( &fields.query( editors)).await?;
    let mut work_orders = Vec::with_capacity( features.len());

    for feature in &features {
        match fields.to_work_order( feature)? {
            Some(wo) => work_orders.push( wo),
            None => warn!("ignoring feature without {}: {:?}", fields.editor, feature.attributes)
        }
    }

    Ok(work_orders)
}

/* #endregion work orders */

/* #region tracks ***********************************************************************************/

/// the real field names of a tracks layer
#[derive(Debug,Clone,PartialEq)]
pub struct TrackFields {
    pub creator: String,
    pub timestamp: String,
    pub accuracy: String,
}

impl TrackFields {
    pub fn resolve (schema: &LayerSchema)->Result<Self> {
        schema.check_point_geometry()?;

        Ok( TrackFields {
            creator: schema.require_field( TRACK_CREATOR_FIELD)?.to_string(),
            timestamp: schema.require_field( TRACK_TIMESTAMP_FIELD)?.to_string(),
            accuracy: schema.require_field( TRACK_ACCURACY_FIELD)?.to_string(),
        })
    }

    /// incomplete tracks are mapped to None, tracks without point geometry are an error
    pub fn to_track (&self, feature: &Feature)->Result<Option<Track>> {
        let location = feature.point()
            .ok_or_else( || geometry_error!("track without point geometry: {:?}", feature.geometry))?;

        let (Some(creator), Some(timestamp), Some(accuracy)) = (
            feature.str_attribute( &self.creator),
            feature.datetime_attribute( &self.timestamp),
            feature.f64_attribute( &self.accuracy)
        ) else {
            debug!("ignoring incomplete track {:?}", feature.attributes);
            return Ok(None)
        };

        if !(accuracy.is_finite() && accuracy >= 0.0) {
            debug!("ignoring track with invalid accuracy {}: {:?}", accuracy, feature.attributes);
            return Ok(None)
        }

        Ok( Some( Track {
            creator: creator.to_string(),
            timestamp,
            location,
            horizontal_accuracy: Length::new::<meter>( accuracy)
        }))
    }
}

/* #endregion tracks */
