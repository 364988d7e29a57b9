//! Wire types of the GlusterFS management REST API.
//!
//! Every response is wrapped as `{"ok": bool, "err": string, "data": ...}`.
//! The envelope is decoded once into an [`ApiResult`] and matched explicitly.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Message used when the server rejects a request without saying why.
pub const UNSPECIFIED_REJECTION: &str = "request rejected without reason";

/// Response envelope shared by all management endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub ok: bool,
    #[serde(default)]
    pub err: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn success(data: Option<T>) -> Self {
        Self {
            ok: true,
            err: String::new(),
            data,
        }
    }

    pub fn failure(err: impl Into<String>) -> Self {
        Self {
            ok: false,
            err: err.into(),
            data: None,
        }
    }

    /// Collapse the envelope into a tagged result.
    pub fn into_result(self) -> ApiResult<Option<T>> {
        if self.ok {
            ApiResult::Ok(self.data)
        } else if self.err.is_empty() {
            ApiResult::Err(UNSPECIFIED_REJECTION.to_string())
        } else {
            ApiResult::Err(self.err)
        }
    }
}

/// Outcome of a management call: the payload, or the server's reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResult<T> {
    Ok(T),
    Err(String),
}

impl<T> ApiResult<T> {
    /// Convert into the crate result, tagging rejections with the operation.
    pub fn into_result(self, operation: &str) -> Result<T> {
        match self {
            ApiResult::Ok(value) => Ok(value),
            ApiResult::Err(message) => Err(Error::RestRejected {
                operation: operation.to_string(),
                message,
            }),
        }
    }
}

/// A volume as listed by the cluster. Only the name is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeEntry {
    pub name: String,
}

/// Body of a volume creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateVolumeRequest {
    pub name: String,
    pub bricks: Vec<String>,
    pub replica: usize,
    pub transport: String,
    pub start: bool,
    pub force: bool,
}

/// Listing payload.
pub type VolumeList = Vec<VolumeEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_listing() {
        let body = r#"{"ok":true,"err":"","data":[{"name":"vol1","status":"Started"}]}"#;
        let envelope: Envelope<VolumeList> = serde_json::from_str(body).unwrap();

        match envelope.into_result() {
            ApiResult::Ok(Some(list)) => assert_eq!(list[0].name, "vol1"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_decode_without_err_or_data() {
        let envelope: Envelope<VolumeList> = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert_eq!(envelope.into_result(), ApiResult::Ok(None));
    }

    fn decode_any<T: serde::de::DeserializeOwned>(body: &str) -> Envelope<T> {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_decode_generic_payload_without_data() {
        let envelope: Envelope<VolumeList> = decode_any(r#"{"ok":true,"err":""}"#);
        assert!(envelope.data.is_none());

        let envelope: Envelope<VolumeList> = decode_any(r#"{"ok":true,"data":[{"name":"vol1"}]}"#);
        assert_eq!(envelope.data.map(|list| list.len()), Some(1));
    }

    #[test]
    fn test_rejection_carries_server_message() {
        let envelope: Envelope<()> =
            serde_json::from_str(r#"{"ok":false,"err":"quorum not met"}"#).unwrap();

        let err = envelope.into_result().into_result("create").unwrap_err();
        assert_eq!(err.server_message(), Some("quorum not met"));
    }

    #[test]
    fn test_rejection_without_message_is_not_silent() {
        let envelope: Envelope<()> = Envelope::failure("");
        assert_eq!(
            envelope.into_result(),
            ApiResult::Err(UNSPECIFIED_REJECTION.to_string())
        );
    }

    #[test]
    fn test_create_request_shape() {
        let request = CreateVolumeRequest {
            name: "vol1".to_string(),
            bricks: vec!["host1:/mnt/vol1".to_string()],
            replica: 1,
            transport: "tcp".to_string(),
            start: true,
            force: true,
        };
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["name"], "vol1");
        assert_eq!(json["bricks"][0], "host1:/mnt/vol1");
        assert_eq!(json["replica"], 1);
        assert_eq!(json["transport"], "tcp");
    }
}
