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

use crate::{
    model::{InsertMediaRequest, SystemInfo, SystemPowerControl, VirtualMedia},
    network::RedfishHttpClient,
    standard::{RedfishStandard, Slot},
    BmcVendor, Redfish, RedfishError,
};

const SYSTEM_ID: &str = "1";
const MANAGER_ID: &str = "1";

// iLO answers 200 or 204 to actions and PATCH. It never hands out a task.
const SUCCESS: [StatusCode; 2] = [StatusCode::OK, StatusCode::NO_CONTENT];

pub struct Bmc {
    s: RedfishStandard,
}

impl Bmc {
    pub fn new(client: RedfishHttpClient) -> Bmc {
        Bmc {
            s: RedfishStandard::new(client, SYSTEM_ID, MANAGER_ID),
        }
    }

    // iLO slot paths embed the position in the collection, not the slot name
    fn slot_url(&self, slot: &Slot) -> String {
        format!("{}/{}", self.s.virtual_media_url(), slot.position)
    }
}

impl Redfish for Bmc {
    fn vendor(&self) -> BmcVendor {
        BmcVendor::Ilo
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
            .find(|slot| slot.media.supports_optical())
            .ok_or(RedfishError::NoVirtualMediaSlot)?;
        self.s.set_virtual_media(
            &self.slot_url(slot),
            &InsertMediaRequest::insert(image_url),
            &SUCCESS,
        )
    }

    fn unmount_virtual_media(&self) -> Result<(), RedfishError> {
        self.s.eject_inserted(|slot| self.slot_url(slot))
    }
}
