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
use std::{fmt, str::FromStr};

pub mod model;
pub use model::{SystemInfo, SystemPowerControl, VirtualMedia};
mod dell;
mod error;
mod hpe;
mod network;
pub use network::{
    Endpoint, HttpTransport, RedfishClientPool, RedfishClientPoolBuilder, RedfishHttpClient,
    Transport, DEFAULT_PORT, REDFISH_ENDPOINT,
};
pub mod standard;
pub use error::RedfishError;

#[cfg(test)]
mod mock;

/// Interface to a BMC Redfish server. All calls will include one or more HTTP network calls.
pub trait Redfish: Send + Sync + 'static {
    /// Power state and health of the host, from the ComputerSystem resource.
    fn get_system_info(&self) -> Result<SystemInfo, RedfishError>;

    /// Issue a ComputerSystem.Reset action. `ForceOff` does not wait for the OS.
    fn set_power_state(&self, action: SystemPowerControl) -> Result<(), RedfishError>;

    /// Every virtual media slot the manager exposes.
    /// Slots that cannot be fetched or parsed are skipped, so the result may be shorter
    /// than the collection.
    fn get_virtual_media(&self) -> Result<Vec<VirtualMedia>, RedfishError>;

    /// Attach a remote ISO to the first CD/DVD capable slot.
    /// Fails with [`RedfishError::NoVirtualMediaSlot`] if there isn't one.
    fn mount_virtual_media(&self, image_url: &str) -> Result<(), RedfishError>;

    /// Eject whatever is inserted. This is best effort: only listing the slots can fail,
    /// errors on individual slots are logged.
    fn unmount_virtual_media(&self) -> Result<(), RedfishError>;

    fn vendor(&self) -> BmcVendor;
}

/// The BMC flavours we know how to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BmcVendor {
    /// HP iLO
    Ilo,
    /// Dell iDRAC
    Idrac,
}

impl fmt::Display for BmcVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BmcVendor::Ilo => write!(f, "ilo"),
            BmcVendor::Idrac => write!(f, "idrac"),
        }
    }
}

impl FromStr for BmcVendor {
    type Err = RedfishError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ilo" => Ok(BmcVendor::Ilo),
            "idrac" => Ok(BmcVendor::Idrac),
            _ => Err(RedfishError::UnsupportedVendor(s.to_string())),
        }
    }
}

/// Build a client for `vendor_tag` ("ilo" or "idrac", any case) with default
/// pool settings. Nothing is sent to the BMC until the first call.
pub fn new_client(vendor_tag: &str, endpoint: Endpoint) -> Result<Box<dyn Redfish>, RedfishError> {
    let vendor: BmcVendor = vendor_tag.parse()?;
    RedfishClientPool::builder()
        .build()?
        .create_client(vendor, endpoint)
}
