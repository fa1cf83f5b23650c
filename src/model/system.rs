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
use std::fmt;

use serde::{Deserialize, Serialize};

/// Reset types understood by both iLO and iDRAC `ComputerSystem.Reset`.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
pub enum SystemPowerControl {
    On,
    ForceOff,
    // Both vendors also have GracefulShutdown, GracefulRestart and ForceRestart
}

impl fmt::Display for SystemPowerControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Body of a POST to `Systems/{id}/Actions/ComputerSystem.Reset`
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "PascalCase")]
pub struct ResetRequest {
    pub reset_type: SystemPowerControl,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct SystemStatus {
    // iLO reports null Health while the host is powered off
    pub health: Option<String>,
    pub state: Option<String>,
}

/// The subset of the Redfish ComputerSystem resource this crate reads.
#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct ComputerSystem {
    pub power_state: Option<String>,
    #[serde(default)]
    pub status: SystemStatus,
}

/// Power and health of the managed host, as reported by the BMC.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SystemInfo {
    /// "On", "Off", or whatever transitional value the vendor reports
    pub power_state: String,
    pub health: String,
    pub state: String,
}

impl From<ComputerSystem> for SystemInfo {
    fn from(system: ComputerSystem) -> Self {
        SystemInfo {
            power_state: system.power_state.unwrap_or_default(),
            health: system.status.health.unwrap_or_default(),
            state: system.status.state.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ComputerSystem, ResetRequest, SystemInfo, SystemPowerControl};

    #[test]
    fn test_system_ilo() {
        let data = include_str!("testdata/system_ilo.json");
        let result: ComputerSystem = serde_json::from_str(data).unwrap();
        let info = SystemInfo::from(result);
        assert_eq!(info.power_state, "On");
        assert_eq!(info.health, "OK");
        assert_eq!(info.state, "Enabled");
    }

    #[test]
    fn test_system_dell_powered_off() {
        let data = include_str!("testdata/system_dell.json");
        let result: ComputerSystem = serde_json::from_str(data).unwrap();
        let info = SystemInfo::from(result);
        assert_eq!(info.power_state, "Off");
        assert_eq!(info.health, "");
        assert_eq!(info.state, "StandbyOffline");
    }

    #[test]
    fn test_system_wrong_type() {
        let result = serde_json::from_str::<ComputerSystem>(r#"{"PowerState": 1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_reset_request() {
        let body = ResetRequest {
            reset_type: SystemPowerControl::ForceOff,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"ResetType":"ForceOff"}"#
        );
        assert_eq!(SystemPowerControl::On.to_string(), "On");
    }
}
