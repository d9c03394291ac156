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

use uom::si::{f64::Length, length::meter};
use tracker_common::{debug, info, warn};
use tracker_common::datetime::TimeWindow;
use crate::errors::TrackerValidateError;
use crate::model::{ToleranceConfig,Track,WorkOrder};
use crate::validator::ValidationReport;

/// receives the progress of a validation run. All methods default to no-ops
pub trait ValidationReporter {
    fn started (&mut self, _n_work_orders: usize, _config: &ToleranceConfig) {}

    fn missing_timestamp (&mut self, _work_order: &WorkOrder) {}

    fn no_tracks_in_period (&mut self, _work_order: &WorkOrder, _window: &TimeWindow) {}

    fn corroborated (&mut self, _work_order: &WorkOrder, _track: &Track) {}

    /// `closest` is the raw distance of the nearest candidate track (if any)
    fn not_corroborated (&mut self, _work_order: &WorkOrder, _n_candidates: usize, _closest: Option<Length>) {}

    fn query_failed (&mut self, _work_order: &WorkOrder, _error: &TrackerValidateError) {}

    fn finished (&mut self, _report: &ValidationReport) {}
}

/// the diagnostic line for a work order that was not corroborated
pub fn invalid_work_order_line (object_id: i64, field_name: &str)->String {
    format!("The user who last edited the feature with OBJECTID {object_id} was potentially not within the distance tolerance when updating the field {field_name}")
}

/// a reporter that logs through the tracing macros. Invalid work orders are logged at info level
pub struct TracingReporter {
    field_name: String
}

impl TracingReporter {
    /// `field_name` is the work order date field that is being checked
    pub fn new (field_name: &str)->Self {
        TracingReporter { field_name: field_name.to_string() }
    }
}

impl ValidationReporter for TracingReporter {
    fn started (&mut self, n_work_orders: usize, config: &ToleranceConfig) {
        info!("finding invalid features among {} work orders ({})", n_work_orders, config);
    }

    fn missing_timestamp (&mut self, work_order: &WorkOrder) {
        debug!("feature {} has no {} value, skipped", work_order.object_id, self.field_name);
    }

    fn no_tracks_in_period (&mut self, work_order: &WorkOrder, window: &TimeWindow) {
        info!("no tracks exist for {} (feature {}). Ensure that tracks have been retained for the time period you're verifying", window, work_order.object_id);
    }

    fn corroborated (&mut self, work_order: &WorkOrder, track: &Track) {
        debug!("feature {} corroborated by track {}", work_order.object_id, track);
    }

    fn not_corroborated (&mut self, work_order: &WorkOrder, n_candidates: usize, closest: Option<Length>) {
        match closest {
            Some(d) => debug!("feature {}: none of {} tracks of {} is close enough (closest {:.1}m)", work_order.object_id, n_candidates, work_order.editor, d.get::<meter>()),
            None => debug!("feature {}: no tracks of {} with sufficient accuracy nearby", work_order.object_id, work_order.editor)
        }
        info!("{}", invalid_work_order_line( work_order.object_id, &self.field_name));
    }

    fn query_failed (&mut self, work_order: &WorkOrder, error: &TrackerValidateError) {
        warn!("track query for feature {} failed, skipped: {}", work_order.object_id, error);
    }

    fn finished (&mut self, report: &ValidationReport) {
        if report.invalid_ids().is_empty() {
            info!("no features found that match the criteria you've set");
        }
        info!("{}", report);
    }
}
