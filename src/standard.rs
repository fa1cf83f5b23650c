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
use tracing::{debug, warn};

use crate::model::{
    ComputerSystem, InsertMediaRequest, MemberCollection, ResetRequest, SystemInfo,
    SystemPowerControl, VirtualMedia,
};
use crate::network::RedfishHttpClient;
use crate::RedfishError;

/// A virtual media slot together with its 1-based position in the manager's
/// VirtualMedia collection. iLO addresses slots by that position.
#[derive(Debug, Clone)]
pub struct Slot {
    pub position: usize,
    pub media: VirtualMedia,
}

/// The calls both vendors make the same way, parameterized by their fixed
/// system and manager ids.
pub struct RedfishStandard {
    pub client: RedfishHttpClient,
    system_id: &'static str,
    manager_id: &'static str,
}

impl RedfishStandard {
    pub fn new(
        client: RedfishHttpClient,
        system_id: &'static str,
        manager_id: &'static str,
    ) -> Self {
        Self {
            client,
            system_id,
            manager_id,
        }
    }

    pub fn virtual_media_url(&self) -> String {
        format!("Managers/{}/VirtualMedia", self.manager_id)
    }

    pub fn get_system_info(&self) -> Result<SystemInfo, RedfishError> {
        let url = format!("Systems/{}", self.system_id);
        let system: ComputerSystem = self.client.get(&url)?;
        Ok(system.into())
    }

    pub fn power(
        &self,
        action: SystemPowerControl,
        accepted: &[StatusCode],
    ) -> Result<(), RedfishError> {
        let url = format!("Systems/{}/Actions/ComputerSystem.Reset", self.system_id);
        let arg = ResetRequest { reset_type: action };
        let response = self.client.post(&url, arg)?;
        self.expect_status(&url, response, accepted)
    }

    /// Fetch the VirtualMedia collection, then each member in turn.
    ///
    /// A member that cannot be fetched or decoded is left out of the result, it
    /// must not hide the other slots. Positions still count it.
    pub fn get_virtual_media_slots(&self) -> Result<Vec<Slot>, RedfishError> {
        let collection: MemberCollection = self.client.get(&self.virtual_media_url())?;
        debug!(
            "Listing {} virtual media slots..",
            collection.members.len()
        );
        let mut slots = Vec::with_capacity(collection.members.len());
        for (i, member) in collection.members.iter().enumerate() {
            let url = member.api_path();
            match self.client.get::<VirtualMedia>(url) {
                Ok(media) => slots.push(Slot {
                    position: i + 1,
                    media,
                }),
                Err(err) => warn!("Skipping virtual media slot {url}: {err}"),
            }
        }
        Ok(slots)
    }

    pub fn set_virtual_media(
        &self,
        slot_url: &str,
        request: &InsertMediaRequest,
        accepted: &[StatusCode],
    ) -> Result<(), RedfishError> {
        let response = self.client.patch(slot_url, request)?;
        self.expect_status(slot_url, response, accepted)
    }

    /// Eject every inserted slot, addressing each through `slot_url`.
    ///
    /// Failures on individual slots are logged and dropped: the call succeeds once
    /// every inserted slot has been tried. Only failing to list the slots is an error.
    pub fn eject_inserted<F>(&self, slot_url: F) -> Result<(), RedfishError>
    where
        F: Fn(&Slot) -> String,
    {
        let slots = self.get_virtual_media_slots()?;
        let outcomes: Vec<(String, Result<(), RedfishError>)> = slots
            .iter()
            .filter(|slot| slot.media.inserted)
            .map(|slot| {
                let url = slot_url(slot);
                let outcome = self.set_virtual_media(
                    &url,
                    &InsertMediaRequest::eject(),
                    &[StatusCode::OK, StatusCode::ACCEPTED, StatusCode::NO_CONTENT],
                );
                (url, outcome)
            })
            .collect();
        let failed = outcomes
            .iter()
            .filter_map(|(url, outcome)| outcome.as_ref().err().map(|err| (url, err)))
            .inspect(|(url, err)| warn!("Could not eject virtual media at {url}: {err}"))
            .count();
        debug!(
            "Ejected virtual media from {} of {} inserted slots",
            outcomes.len() - failed,
            outcomes.len()
        );
        Ok(())
    }

    fn expect_status(
        &self,
        api: &str,
        (status_code, response_body): (StatusCode, String),
        accepted: &[StatusCode],
    ) -> Result<(), RedfishError> {
        if accepted.contains(&status_code) {
            return Ok(());
        }
        Err(RedfishError::HTTPErrorCode {
            url: self.client.url(api),
            status_code,
            response_body,
        })
    }
}

#[cfg(test)]
mod test {
    use reqwest::{Method, StatusCode};
    use serde_json::json;

    use super::RedfishStandard;
    use crate::mock::MockTransport;
    use crate::RedfishError;

    fn standard(mock: &MockTransport) -> RedfishStandard {
        RedfishStandard::new(mock.client(), "1", "1")
    }

    #[test]
    fn test_system_info_non_200() {
        let mock = MockTransport::new();
        mock.on(Method::GET, "Systems/1", StatusCode::UNAUTHORIZED, "Unauthorized");
        let err = standard(&mock).get_system_info().unwrap_err();
        assert_eq!(err.status_code(), Some(StatusCode::UNAUTHORIZED));
        // 204 has no body to decode, and is not what a GET should answer
        let mock = MockTransport::new();
        mock.on(Method::GET, "Systems/1", StatusCode::NO_CONTENT, "");
        assert!(standard(&mock).get_system_info().is_err());
    }

    #[test]
    fn test_system_info_bad_json() {
        let mock = MockTransport::new();
        mock.on(Method::GET, "Systems/1", StatusCode::OK, "<html>login</html>");
        let err = standard(&mock).get_system_info().unwrap_err();
        assert!(matches!(err, RedfishError::JsonDeserializeError { .. }));
    }

    #[test]
    fn test_slots_keep_collection_position() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::GET,
            "Managers/1/VirtualMedia",
            json!({"Members": [
                {"@odata.id": "/redfish/v1/Managers/1/VirtualMedia/1"},
                {"@odata.id": "/redfish/v1/Managers/1/VirtualMedia/2"},
                {"@odata.id": "/redfish/v1/Managers/1/VirtualMedia/3"},
            ]}),
        );
        mock.on(
            Method::GET,
            "Managers/1/VirtualMedia/1",
            StatusCode::INTERNAL_SERVER_ERROR,
            "",
        );
        mock.on_json(
            Method::GET,
            "Managers/1/VirtualMedia/2",
            json!({"Name": "Floppy", "MediaTypes": ["Floppy", "USBStick"]}),
        );
        mock.on_json(
            Method::GET,
            "Managers/1/VirtualMedia/3",
            json!({"Name": "CD", "MediaTypes": ["CD", "DVD"]}),
        );
        let slots = standard(&mock).get_virtual_media_slots().unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].position, 2);
        assert_eq!(slots[1].position, 3);
        assert_eq!(slots[1].media.name, "CD");
    }

    #[test]
    fn test_slots_with_absolute_links() {
        let mock = MockTransport::new();
        mock.on_json(
            Method::GET,
            "Managers/1/VirtualMedia",
            json!({"Members": [
                {"@odata.id": "/redfish/v1/Managers/1/VirtualMedia/1"},
                {"@odata.id": "https://10.0.0.1/redfish/v1/Managers/1/VirtualMedia/2"},
            ]}),
        );
        mock.on_json(
            Method::GET,
            "Managers/1/VirtualMedia/1",
            json!({"Name": "Floppy", "MediaTypes": ["Floppy"]}),
        );
        mock.on_json(
            Method::GET,
            "Managers/1/VirtualMedia/2",
            json!({"Name": "CD", "MediaTypes": ["CD", "DVD"]}),
        );
        let slots = standard(&mock).get_virtual_media_slots().unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[1].position, 2);
        assert_eq!(slots[1].media.name, "CD");
        let gets: Vec<String> = mock
            .requests_with(Method::GET)
            .into_iter()
            .map(|r| r.api)
            .collect();
        assert_eq!(
            gets,
            [
                "Managers/1/VirtualMedia",
                "Managers/1/VirtualMedia/1",
                "Managers/1/VirtualMedia/2"
            ]
        );
    }

    #[test]
    fn test_collection_failure_propagates() {
        let mock = MockTransport::new();
        mock.on(
            Method::GET,
            "Managers/1/VirtualMedia",
            StatusCode::SERVICE_UNAVAILABLE,
            "busy",
        );
        let err = standard(&mock).get_virtual_media_slots().unwrap_err();
        assert_eq!(err.status_code(), Some(StatusCode::SERVICE_UNAVAILABLE));
    }

    #[test]
    fn test_power_error_carries_body() {
        let mock = MockTransport::new();
        mock.on(
            Method::POST,
            "Systems/1/Actions/ComputerSystem.Reset",
            StatusCode::BAD_REQUEST,
            r#"{"error":{"code":"Base.1.0.ActionParameterNotSupported"}}"#,
        );
        let err = standard(&mock)
            .power(crate::SystemPowerControl::On, &[StatusCode::OK])
            .unwrap_err();
        match err {
            RedfishError::HTTPErrorCode {
                status_code,
                response_body,
                ..
            } => {
                assert_eq!(status_code, StatusCode::BAD_REQUEST);
                assert!(response_body.contains("ActionParameterNotSupported"));
            }
            other => panic!("unexpected error {other}"),
        }
    }
}
