/*
 * SPDX-License-Identifier: MIT
 *
 * Permission is hereby granted, free of charge, to any person obtaining a
 * copy of this software and associated documentation files (the "Software"),
 * to deal in the Software without restriction, including without limitation
 * the rights to use, copy, modify, merge, publish, distribute, sublicense,
 * and/or sell copies of the Software, and to permit persons to whom the
 * Software is furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in
 * all copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL
 * THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
 * FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
 * DEALINGS IN THE SOFTWARE.
 */
use serde::{Deserialize, Serialize};

use crate::network::REDFISH_ENDPOINT;

pub mod system;
pub use system::*;

pub mod virtual_media;
pub use virtual_media::*;

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ODataId {
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
}

impl ODataId {
    /// The link as an API path relative to `/redfish/v1/`.
    ///
    /// BMCs usually send a path, some send a full URL. Scheme and authority are
    /// dropped. A link outside the service root comes back as is.
    pub fn api_path(&self) -> &str {
        let path = match self.odata_id.split_once("://") {
            Some((_, rest)) => rest.find('/').map_or("", |i| &rest[i..]),
            None => self.odata_id.as_str(),
        };
        path.strip_prefix('/')
            .and_then(|p| p.strip_prefix(REDFISH_ENDPOINT))
            .and_then(|p| p.strip_prefix('/'))
            .unwrap_or(path)
    }
}

/// The envelope every Redfish resource collection shares: a list of links to its members.
/// Only `Members` is read; count and name annotations are ignored.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct MemberCollection {
    #[serde(default)]
    pub members: Vec<ODataId>,
}
