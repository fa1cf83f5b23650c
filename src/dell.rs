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
use reqwest::StatusCode;
use tracing::debug;

use crate::{
    model::{InsertMediaRequest, SystemInfo, SystemPowerControl, VirtualMedia},
    network::RedfishHttpClient,
    standard::{RedfishStandard, Slot},
    BmcVendor, Redfish, RedfishError,
};

const SYSTEM_ID: &str = "System.Embedded.1";
const MANAGER_ID: &str = "iDRAC.Embedded.1";

// iDRAC may queue a job and answer 202
const SUCCESS: [StatusCode; 3] = [
    StatusCode::OK,
    StatusCode::ACCEPTED,
    StatusCode::NO_CONTENT,
];

pub struct Bmc {
    s: RedfishStandard,
}

impl Bmc {
    pub fn new(client: RedfishHttpClient) -> Bmc {
        Bmc {
            s: RedfishStandard::new(client, SYSTEM_ID, MANAGER_ID),
        }
    }

    // iDRAC addresses slots by their Name, e.g. VirtualMedia/CD
    fn slot_url(&self, slot: &Slot) -> String {
        format!("{}/{}", self.s.virtual_media_url(), slot.media.name)
    }
}

impl Redfish for Bmc {
    fn vendor(&self) -> BmcVendor {
        BmcVendor::Idrac
    }

    fn get_system_info(&self) -> Result<SystemInfo, RedfishError> {
        self.s.get_system_info()
    }

    fn set_power_state(&self, action: SystemPowerControl) -> Result<(), RedfishError> {
        self.s.power(action, &SUCCESS)
    }

    fn get_virtual_media(&self) -> Result<Vec<VirtualMedia>, RedfishError> {
        let slots = self.s.get_virtual_media_slots()?;
        Ok(slots.into_iter().map(|slot| slot.media).collect())
    }

    fn mount_virtual_media(&self, image_url: &str) -> Result<(), RedfishError> {
        if image_url.is_empty() {
            return Err(RedfishError::InvalidImageUrl);
        }
        let slots = self.s.get_virtual_media_slots()?;
        let slot = slots
            .iter()
            .find(|slot| slot.media.supports_optical() && slot.media.is_named_optical())
            .ok_or(RedfishError::NoVirtualMediaSlot)?;
        let url = self.slot_url(slot);

        // iDRAC refuses an insert while something is already attached
        if let Err(err) = self
            .s
            .set_virtual_media(&url, &InsertMediaRequest::eject(), &SUCCESS)
        {
            debug!("Eject before mount on {url} failed, continuing: {err}");
        }
        self.s
            .set_virtual_media(&url, &InsertMediaRequest::insert(image_url), &SUCCESS)
    }

    fn unmount_virtual_media(&self) -> Result<(), RedfishError> {
        self.s.eject_inserted(|slot| self.slot_url(slot))
    }
}
