//! Response status mapping
//!
//! Every API response falls in one of three classes. Lookups and edits treat
//! 404 as "absent" and return `None`; other calls treat it like any failure.
//! Failures become `Error::Api` carrying the status and the message from the
//! error body.

use nightbot_auth::{EndpointDescriptor, Error, Result, api_error_message};
use serde::de::DeserializeOwned;
use transport::TransportResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    Success,
    NotFound,
    Failure,
}

impl ResponseClass {
    pub fn label(&self) -> &'static str {
        match self {
            ResponseClass::Success => "success",
            ResponseClass::NotFound => "not_found",
            ResponseClass::Failure => "failure",
        }
    }
}

/// Classify an API response status.
pub fn classify_status(status: u16) -> ResponseClass {
    match status {
        200..=299 => ResponseClass::Success,
        404 => ResponseClass::NotFound,
        _ => ResponseClass::Failure,
    }
}

/// Decode a 2xx body; anything else is an error.
pub fn expect_ok<T: DeserializeOwned>(
    endpoint: &EndpointDescriptor,
    response: TransportResponse,
) -> Result<T> {
    match record(endpoint, &response) {
        ResponseClass::Success => decode(endpoint, response.data),
        _ => Err(failure(response)),
    }
}

/// Decode a 2xx body, map 404 to `None`, anything else is an error.
pub fn ok_or_not_found<T: DeserializeOwned>(
    endpoint: &EndpointDescriptor,
    response: TransportResponse,
) -> Result<Option<T>> {
    match record(endpoint, &response) {
        ResponseClass::Success => decode(endpoint, response.data).map(Some),
        ResponseClass::NotFound => Ok(None),
        ResponseClass::Failure => Err(failure(response)),
    }
}

/// Require a 2xx status, ignoring the body.
pub fn expect_success(endpoint: &EndpointDescriptor, response: TransportResponse) -> Result<()> {
    match record(endpoint, &response) {
        ResponseClass::Success => Ok(()),
        _ => Err(failure(response)),
    }
}

fn record(endpoint: &EndpointDescriptor, response: &TransportResponse) -> ResponseClass {
    let class = classify_status(response.status);
    metrics::counter!(
        "nightbot_api_requests_total",
        "operation" => endpoint.name,
        "outcome" => class.label()
    )
    .increment(1);
    class
}

fn failure(response: TransportResponse) -> Error {
    Error::Api {
        status: response.status,
        message: api_error_message(&response.data),
    }
}

fn decode<T: DeserializeOwned>(endpoint: &EndpointDescriptor, data: serde_json::Value) -> Result<T> {
    serde_json::from_value(data)
        .map_err(|e| Error::Decode(format!("{} response: {e}", endpoint.name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nightbot_auth::endpoint::{DELETE_COMMAND, GET_COMMAND_BY_ID};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Thing {
        name: String,
    }

    #[test]
    fn classify_2xx_is_success() {
        assert_eq!(classify_status(200), ResponseClass::Success);
        assert_eq!(classify_status(201), ResponseClass::Success);
        assert_eq!(classify_status(204), ResponseClass::Success);
    }

    #[test]
    fn classify_404_is_not_found() {
        assert_eq!(classify_status(404), ResponseClass::NotFound);
    }

    #[test]
    fn classify_other_statuses_fail() {
        for status in [301, 400, 401, 403, 409, 429, 500, 502] {
            assert_eq!(classify_status(status), ResponseClass::Failure, "{status}");
        }
    }

    #[test]
    fn expect_ok_decodes_body() {
        let response = TransportResponse::new(200, json!({"name": "!uptime"}));
        let thing: Thing = expect_ok(&GET_COMMAND_BY_ID, response).unwrap();
        assert_eq!(thing.name, "!uptime");
    }

    #[test]
    fn expect_ok_treats_404_as_failure() {
        let response = TransportResponse::new(404, json!({"status": 404, "message": "Command not found"}));
        let err = expect_ok::<Thing>(&GET_COMMAND_BY_ID, response).unwrap_err();
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Command not found");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn ok_or_not_found_maps_404_to_none() {
        let response = TransportResponse::new(404, json!({"status": 404, "message": "not found"}));
        let result: Option<Thing> = ok_or_not_found(&GET_COMMAND_BY_ID, response).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn ok_or_not_found_propagates_other_failures() {
        let response = TransportResponse::new(500, serde_json::Value::Null);
        let err = ok_or_not_found::<Thing>(&GET_COMMAND_BY_ID, response).unwrap_err();
        assert_eq!(err.to_string(), "API request failed (500): unknown api error");
    }

    #[test]
    fn decode_failure_names_the_endpoint() {
        let response = TransportResponse::new(200, json!({"unexpected": true}));
        let err = expect_ok::<Thing>(&GET_COMMAND_BY_ID, response).unwrap_err();
        assert!(matches!(err, Error::Decode(ref m) if m.starts_with("get_command_by_id")));
    }

    #[test]
    fn expect_success_ignores_body() {
        let response = TransportResponse::new(200, serde_json::Value::Null);
        assert!(expect_success(&DELETE_COMMAND, response).is_ok());

        let response = TransportResponse::new(403, json!({"message": "Forbidden"}));
        let err = expect_success(&DELETE_COMMAND, response).unwrap_err();
        assert!(err.to_string().contains("Forbidden"));
    }
}
