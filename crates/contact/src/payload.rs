use serde::Serialize;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{FormFields, SubmitError};

pub const UNKNOWN_CLIENT_IP: &str = "unknown";

/// JSON body posted to the form endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: String,
    pub token: String,
    #[serde(rename = "clientIP")]
    pub client_ip: String,
}

impl Payload {
    pub fn new(
        fields: &FormFields,
        token: &str,
        client_ip: impl Into<String>,
        at: OffsetDateTime,
    ) -> Result<Self, SubmitError> {
        let timestamp = at
            .format(&Rfc3339)
            .map_err(|e| SubmitError::unknown(e.to_string()))?;

        Ok(Self {
            name: fields.name.to_owned(),
            email: fields.email.to_owned(),
            message: fields.message.to_owned(),
            timestamp,
            token: token.to_owned(),
            client_ip: client_ip.into(),
        })
    }
}
