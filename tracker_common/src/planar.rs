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

//! this module provides geometries in a projected (planar) coordinate reference system such as
//! Web Mercator, i.e. coordinates are (x,y) in meters and distances are euclidian without geodesic correction.
//! As in the geographic counterparts we wrap [geo](https://docs.rs/geo/latest/geo/index.html) types with the
//! new type pattern so that they can't be confused with lon/lat based points, and use
//! [uom](https://docs.rs/uom/latest/uom/) lengths for distances.

use std::fmt;
use serde::{Serialize,Deserialize};
use geo::{Coord, Distance, Euclidean, Point, Rect};
use uom::si::f64::Length;
use uom::si::length::meter;

/// the well known id of the Web Mercator spatial reference, which is what we request all features in
pub const WEB_MERCATOR_WKID: u32 = 3857;

#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub struct SpatialReference {
    pub wkid: u32,
}

impl SpatialReference {
    pub fn web_mercator()->Self { SpatialReference{ wkid: WEB_MERCATOR_WKID } }
}

impl Default for SpatialReference {
    fn default()->Self { Self::web_mercator() }
}

/* #region ProjectedPoint ********************************************************************************************/

/// a wrapper for geo::Point with projected x,y coordinates in meters
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct ProjectedPoint(Point);

impl ProjectedPoint {
    pub fn from_xy (x: f64, y: f64)->Self { ProjectedPoint( Point::new(x,y)) }

    pub fn x (&self)->f64 { self.0.x() }
    pub fn y (&self)->f64 { self.0.y() }

    pub fn point (&self)->&Point { &self.0 }

    /// planar euclidian distance, both points have to be in the same spatial reference
    pub fn distance_to (&self, other: &ProjectedPoint)->Length {
        Length::new::<meter>( Euclidean.distance( self.0, other.0))
    }

    /// the point itself plus the four diagonal corners of the square with half side length `pad`
    pub fn with_diagonal_corners (&self, pad: Length)->[ProjectedPoint;5] {
        let d = pad.get::<meter>();
        let (x,y) = (self.x(), self.y());
        [
            *self,
            ProjectedPoint::from_xy( x + d, y + d),
            ProjectedPoint::from_xy( x + d, y - d),
            ProjectedPoint::from_xy( x - d, y + d),
            ProjectedPoint::from_xy( x - d, y - d),
        ]
    }
}

impl fmt::Display for ProjectedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1},{:.1})", self.0.x(), self.0.y())
    }
}

/* #endregion ProjectedPoint */

/* #region Envelope **************************************************************************************************/

/// axis aligned rectangle in projected coordinates
#[derive(Debug,Clone,Copy,PartialEq)]
pub struct Envelope(Rect);

impl Envelope {
    pub fn from_min_max (x_min: f64, y_min: f64, x_max: f64, y_max: f64)->Self {
        Envelope( Rect::new( Coord{ x: x_min, y: y_min }, Coord{ x: x_max, y: y_max }))
    }

    /// the square centered at `center` with half side length `half_width`
    pub fn around (center: &ProjectedPoint, half_width: Length)->Self {
        let d = half_width.get::<meter>().abs();
        Envelope::from_min_max( center.x() - d, center.y() - d, center.x() + d, center.y() + d)
    }

    pub fn x_min (&self)->f64 { self.0.min().x }
    pub fn y_min (&self)->f64 { self.0.min().y }
    pub fn x_max (&self)->f64 { self.0.max().x }
    pub fn y_max (&self)->f64 { self.0.max().y }

    /// boundary inclusive
    pub fn contains_point (&self, p: &ProjectedPoint)->bool {
        p.x() >= self.x_min() && p.x() <= self.x_max() && p.y() >= self.y_min() && p.y() <= self.y_max()
    }
}

/* #endregion Envelope */
