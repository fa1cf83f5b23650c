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

const OPTICAL_MEDIA: [&str; 2] = ["CD", "DVD"];

/// One Redfish VirtualMedia resource, i.e. a slot that can hold a single remote image.
///
/// Fields missing from the BMC's response take their default value. A field with
/// the wrong JSON type makes the whole slot undecodable.
#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase", default)]
pub struct VirtualMedia {
    pub name: String,
    pub media_types: Vec<String>,
    pub connected: bool,
    pub inserted: bool,
    /// URL of the mounted image. Only meaningful when `inserted` is true.
    pub image: Option<String>,
}

impl VirtualMedia {
    /// Can this slot take a CD or DVD image?
    pub fn supports_optical(&self) -> bool {
        self.media_types
            .iter()
            .any(|t| OPTICAL_MEDIA.contains(&t.as_str()))
    }

    /// Does the slot's name say it is a CD or DVD drive?
    pub fn is_named_optical(&self) -> bool {
        OPTICAL_MEDIA.iter().any(|m| self.name.contains(m))
    }
}

/// PATCH body for a VirtualMedia slot.
/// Eject omits `Image` entirely, some firmware rejects an empty string there.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct InsertMediaRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub inserted: bool,
}

impl InsertMediaRequest {
    pub fn insert(image_url: &str) -> Self {
        InsertMediaRequest {
            image: Some(image_url.to_string()),
            inserted: true,
        }
    }

    pub fn eject() -> Self {
        InsertMediaRequest {
            image: None,
            inserted: false,
        }
    }
}
