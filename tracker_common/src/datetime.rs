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

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use serde::{Serialize,Deserialize};
use std::time::Duration;
use std::fmt;

/// the time format used in feature service where clauses (`timestamp 'YYYY-MM-DD HH:MM:SS'`)
pub const SQL_TIMESTAMP_FORMAT: &'static str = "%Y-%m-%d %H:%M:%S";

#[derive(Serialize,Deserialize,Debug,Clone,Copy,PartialEq,Eq,PartialOrd,Ord)]
pub struct EpochMillis(i64);

impl EpochMillis {
    pub fn new(millis:i64)->Self { EpochMillis(millis) }

    /// None if the value is out of the DateTime range
    pub fn to_datetime (&self)->Option<DateTime<Utc>> { DateTime::<Utc>::from_timestamp_millis(self.0) }
}

#[inline] pub fn minutes (n: u64)->Duration { Duration::from_secs(n * 60) }

pub fn is_between_inclusive (dt: &DateTime<Utc>, dt_start: &DateTime<Utc>, dt_end: &DateTime<Utc>) -> bool {
    dt >= dt_start && dt <= dt_end
}

/* #region TimeWindow ********************************************************************************************/

/// a closed [start,end] time interval
#[derive(Debug,Clone,Copy,PartialEq,Eq,Serialize,Deserialize)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// note this normalizes the interval, i.e. start is always <= end
    pub fn new (start: DateTime<Utc>, end: DateTime<Utc>)->Self {
        if start <= end { TimeWindow{ start, end } } else { TimeWindow{ start: end, end: start } }
    }

    /// `[center - tolerance, center + tolerance]`. Tolerances that exceed the DateTime range are clamped
    pub fn around (center: DateTime<Utc>, tolerance: Duration)->Self {
        let delta = TimeDelta::from_std( tolerance).unwrap_or( TimeDelta::MAX);
        let start = center.checked_sub_signed( delta).unwrap_or( DateTime::<Utc>::MIN_UTC);
        let end = center.checked_add_signed( delta).unwrap_or( DateTime::<Utc>::MAX_UTC);
        TimeWindow{ start, end }
    }

    pub fn contains (&self, dt: &DateTime<Utc>)->bool {
        is_between_inclusive( dt, &self.start, &self.end)
    }

    pub fn duration (&self)->Duration {
        (self.end - self.start).to_std().unwrap_or( Duration::ZERO)
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} , {}]", short_utc_datetime_string(&self.start), short_utc_datetime_string(&self.end))
    }
}

/* #endregion TimeWindow */

pub fn short_utc_datetime_string (dt: &DateTime<Utc>) -> String {
    format!("{}", dt.format("%Y-%m-%dT%H:%M:%S%Z"))
}

/// format as used in SQL-92 timestamp literals of feature service where clauses
pub fn sql_timestamp_string (dt: &DateTime<Utc>) -> String {
    format!("{}", dt.format(SQL_TIMESTAMP_FORMAT))
}

//--- misc string format parsing

/// parse RFC3339 or `YYYY-MM-DD HH:MM:SS` (interpreted as UTC)
pub fn parse_datetime (s: &str)->Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.to_utc())
    }
    NaiveDateTime::parse_from_str(s, SQL_TIMESTAMP_FORMAT).ok().map( |ndt| ndt.and_utc())
}
