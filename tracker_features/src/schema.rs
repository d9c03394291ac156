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

//! layer schema information and logical field name resolution.
//!
//! Field names of hosted layers differ between deployments in case and underscores (`created_user`
//! vs. `CreatedUser`), hence we look up fields by a normalized name.

use serde::{Serialize,Deserialize};
use crate::errors::{Result,TrackerFeatureError,geometry_error};

/// the geometry type name of point layers
pub const POINT_GEOMETRY: &'static str = "esriGeometryPoint";

#[derive(Serialize,Deserialize,Debug,Clone,PartialEq)]
pub struct Field {
    pub name: String,

    #[serde(rename="type", default)]
    pub field_type: String,

    #[serde(default)]
    pub alias: Option<String>,
}

impl Field {
    pub fn new (name: impl ToString, field_type: impl ToString)->Self {
        Field { name: name.to_string(), field_type: field_type.to_string(), alias: None }
    }
}

/// the part of the layer resource (`<layer-url>?f=json`) we need
#[derive(Serialize,Deserialize,Debug,Clone,PartialEq,Default)]
#[serde(rename_all="camelCase")]
pub struct LayerSchema {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub geometry_type: Option<String>,

    #[serde(default)]
    pub object_id_field: Option<String>,

    #[serde(default)]
    pub fields: Vec<Field>,
}

impl LayerSchema {
    pub fn new (name: impl ToString, geometry_type: Option<&str>, fields: Vec<Field>)->Self {
        LayerSchema {
            name: name.to_string(),
            geometry_type: geometry_type.map( |s| s.to_string()),
            object_id_field: None,
            fields
        }
    }

    pub fn field_names (&self)->Vec<&str> {
        self.fields.iter().map( |f| f.name.as_str()).collect()
    }

    /// the first real field name that matches `logical_name` ignoring case and underscores
    pub fn resolve_field (&self, logical_name: &str)->Option<&str> {
        resolve_field( self.fields.iter().map( |f| f.name.as_str()), logical_name)
    }

    pub fn require_field (&self, logical_name: &str)->Result<&str> {
        self.resolve_field( logical_name).ok_or_else( || {
            TrackerFeatureError::FieldNotFound( format!("'{}' in layer '{}' (fields: {})", logical_name, self.name, self.field_names().join(",")))
        })
    }

    pub fn is_point_layer (&self)->bool {
        self.geometry_type.as_deref() == Some(POINT_GEOMETRY)
    }

    /// we can only check point locations
    pub fn check_point_geometry (&self)->Result<()> {
        if self.is_point_layer() {
            Ok(())
        } else {
            Err( geometry_error!("layer '{}' has unsupported geometry type {:?}", self.name, self.geometry_type))
        }
    }
}

pub fn normalize_field_name (name: &str)->String {
    name.chars().filter( |c| *c != '_').flat_map( |c| c.to_lowercase()).collect()
}

pub fn resolve_field<'a,I> (field_names: I, logical_name: &str)->Option<&'a str> where I: IntoIterator<Item=&'a str> {
    let key = normalize_field_name( logical_name);
    field_names.into_iter().find( |name| normalize_field_name( name) == key)
}
