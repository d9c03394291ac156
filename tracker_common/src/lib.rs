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

pub mod macros;
pub mod logging;
pub mod datetime;
pub mod planar;
pub mod net;

/// split a comma separated list into its non-empty elements, removing all blanks
/// (e.g. "usr_a, usr_b,,usr c" -> ["usr_a","usr_b","usrc"])
pub fn split_list (s: &str)->Vec<String> {
    s.split(',')
        .map( |e| e.chars().filter( |c| !c.is_whitespace()).collect::<String>())
        .filter( |e| !e.is_empty())
        .collect()
}
