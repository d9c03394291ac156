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

use std::{io::Read, path::{Path,PathBuf}, fs::File, env};
use crate::errors::Result;

pub fn file_contents_as_bytes (path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut contents: Vec<u8> = Vec::with_capacity(len as usize);
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

/// push the provided path elements and check the predicate. If it does not hold restore the original path
#[macro_export]
macro_rules! path_cond {
    ( $pred:ident, $path_expr:expr, $($e:expr),* ) => {
        {
            let path: &mut PathBuf = $path_expr;
            let n0 = path.components().count();
            $( path.push($e); )*
            if path.$pred() {
                true
            } else {
                // restore path
                let mut n = path.components().count();
                while n > n0 { path.pop(); n -= 1; }
                false
            }
        }
    }
}

/// this is the highest parent from the current dir that still has a Cargo.toml
pub fn get_workspace_dir()->Option<PathBuf> {
    if let Ok(mut path) = env::current_dir() {
        while path_cond!( is_file, &mut path, "..", "Cargo.toml") {
            path.pop(); // pops Cargo.toml
            path.pop(); // pops ".."
            if !path.pop() { return None } // no parent
        }
        return Some(path)
    }
    None
}

pub fn get_workspace_parent()->Option<PathBuf> {
    get_workspace_dir().map( |mut p| { p.pop(); p})
}

pub fn get_env_tracker_home()->Option<PathBuf> {
    env::var("TRACKER_HOME").ok().map( |home| Path::new(home.as_str()).to_path_buf())
}

pub fn get_user_tracker_dir()->Option<PathBuf> {
    env::var("HOME").ok().map( |home| Path::new(home.as_str()).join(".tracker"))
}
