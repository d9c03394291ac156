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

//! runtime context of tracker binaries and lookup of (RON) config resources.
//!
//! Crates that define configs expand [`define_load_config`] at their top level, which gives them a
//! `load_config(filename)` function. Config files are searched for in the following order:
//!
//!   1. `$TRACKER_HOME/configs/[<bin-crate>/<bin-name>/]<crate>/<file>`
//!   2. `<workspace-parent>/configs/[<bin-crate>/<bin-name>/]<crate>/<file>`
//!   3. `~/.tracker/configs/[<bin-crate>/<bin-name>/]<crate>/<file>`
//!   4. `<workspace>/<crate>/configs/<file>` (the defaults that live in the repository)

use std::{path::{Path,PathBuf}, sync::OnceLock};

mod utils;
pub use utils::*;

mod errors;
pub use errors::*;

pub const CONFIGS: &'static str = "configs";

/* #region bin globals *******************************************************************/

#[derive(Debug)]
pub struct BinContext {
    pub bin_name: String,
    pub bin_crate: String,
    pub proc_id: Option<u32>,
}

impl BinContext {
    /// this can only be set once per process. Subsequent calls are ignored
    pub fn set (bin_name: &str, bin_crate: &str, proc_id: Option<u32>) {
        let _ = BIN_CONTEXT.set( Self{ bin_name: bin_name.to_string(), bin_crate: bin_crate.to_string(), proc_id });
    }
}

pub static BIN_CONTEXT: OnceLock<BinContext> = OnceLock::new();

/// this has to be called (once) from the bin source
#[macro_export]
macro_rules! set_bin_context {
    () => {
        {
            // env! looks up the value at compile time
            tracker_build::BinContext::set( env!("CARGO_BIN_NAME"), env!("CARGO_PKG_NAME"), Some(std::process::id()));
        }
    }
}

pub fn get_bin_context()->Option<&'static BinContext> {
    BIN_CONTEXT.get()
}

/* #endregion bin globals */

/* #region config loading ****************************************************************/

/// load a RON config from an explicit path, e.g. a command line argument or a test resource
pub fn load_config_path<C,P> (path: P) -> Result<C> where C: for <'a> serde::Deserialize<'a>, P: AsRef<Path> {
    let data = file_contents_as_bytes(path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

pub fn find_config_file (ctx: &Option<&BinContext>, resource_crate: &str, filename: &str) -> Option<PathBuf> {
    find_resource_file( CONFIGS, ctx, resource_crate, filename)
}

/// this is the macro that needs to be expanded at the top of crates (lib.rs) that define configs.
/// Config users call the defined `load_config(..)` function to instantiate config structs
#[macro_export]
macro_rules! define_load_config {
    () => {
        mod configs {
            /// load config using the tracker_build lookup mechanism
            pub fn load_config<C> (filename: &str) -> tracker_build::Result<C> where C: for <'a> serde::Deserialize<'a> {
                let bin_ctx = tracker_build::get_bin_context();
                let resource_crate = env!("CARGO_PKG_NAME");

                if let Some(path) = tracker_build::find_config_file( &bin_ctx, resource_crate, filename) {
                    return tracker_build::load_config_path( &path)
                }

                Err( tracker_build::TrackerBuildError::ResourceNotFoundError(filename.to_string()) )
            }
        }
        pub use configs::*; // make load_config() visible at the crate level
    }
}

/* #endregion config loading */

/* #region resource lookup ***************************************************************/

fn find_resource_file (resource_dir: &str, ctx: &Option<&BinContext>, resource_crate: &str, filename: &str) -> Option<PathBuf> {
    // check an explicit TRACKER_HOME first
    if let Some(mut path) = get_env_tracker_home() {
        if find_external_resource( &mut path, resource_dir, ctx, resource_crate, filename) { return Some(path) }
    }

    // try the parent of the workspace dir next - this is the first dir outside the source repo
    if let Some(mut path) = get_workspace_parent() {
        if find_external_resource( &mut path, resource_dir, ctx, resource_crate, filename) { return Some(path) }
    }

    if let Some(mut path) = get_user_tracker_dir() {
        if find_external_resource( &mut path, resource_dir, ctx, resource_crate, filename) { return Some(path) }
    }

    // try to find the config within the repo
    if let Some(mut path) = get_workspace_dir() {
        if find_internal_resource( &mut path, resource_dir, resource_crate, filename) { return Some(path) }
    }

    None
}

fn find_external_resource (path: &mut PathBuf, resource_dir: &str, bin_ctx: &Option<&BinContext>, resource_crate: &str, filename: &str)->bool {
    // check bin specific override first
    if let Some(ctx) = bin_ctx {
        let bin_crate = ctx.bin_crate.as_str();
        let bin_name = ctx.bin_name.as_str();
        if path_cond!( is_file, path, resource_dir, bin_crate, bin_name, resource_crate, filename) { return true }
    }

    path_cond!( is_file, path, resource_dir, resource_crate, filename)
}

fn find_internal_resource (path: &mut PathBuf, resource_dir: &str, resource_crate: &str, filename: &str)->bool {
    path_cond!( is_file, path, resource_crate, resource_dir, filename)
}

/* #endregion resource lookup */
