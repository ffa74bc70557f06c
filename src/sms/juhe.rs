//! Juhe SMS gateway servant.
//!
//! Sends template messages through Juhe's form-encoded REST endpoint.
//! A 2xx transport status with a non-zero `error_code` in the JSON
//! reply is still a failed send.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::Full;
use semver::Version;
use serde::Deserialize;

use super::SmsGateway;
use crate::client::{self, HttpClient};
use crate::config::model::SmsJuheSetting;
use crate::error::PatchbayError;
use crate::select::Servant;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct JuheGateway {
    setting: SmsJuheSetting,
    client: HttpClient,
}

impl JuheGateway {
    #[must_use]
    pub fn new(setting: SmsJuheSetting, client: HttpClient) -> Self {
        Self { setting, client }
    }

    fn form_body(&self, phone: &str, code: &str) -> String {
        let tpl_value = format!("#{}#={code}", self.setting.tpl_key_name);
        url::form_urlencoded::Serializer::new(String::new())
            .append_pair("mobile", phone)
            .append_pair("tpl_id", &self.setting.tpl_id)
            .append_pair("tpl_value", &tpl_value)
            .append_pair("key", &self.setting.key)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct JuheReply {
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    reason: String,
}

impl Servant for JuheGateway {
    fn name(&self) -> &'static str {
        "SmsJuhe"
    }

    fn version(&self) -> Version {
        Version::new(0, 1, 0)
    }
}

#[async_trait]
impl SmsGateway for JuheGateway {
    async fn send_code(&self, phone: &str, code: &str) -> Result<(), PatchbayError> {
        let req = hyper::Request::builder()
            .method(hyper::Method::POST)
            .uri(self.setting.gateway.as_str())
            .header(
                http::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(Full::new(Bytes::from(self.form_body(phone, code))))
            .map_err(|e| PatchbayError::HttpRequest {
                source: Box::new(e),
            })?;

        let (status, body) = client::send(&self.client, req, SEND_TIMEOUT).await?;
        if !status.is_success() {
            return Err(PatchbayError::SmsGateway {
                provider: self.name(),
                code: i64::from(status.as_u16()),
                reason: "gateway returned non-success status".into(),
            });
        }

        let reply: JuheReply =
            serde_json::from_slice(&body).map_err(|e| PatchbayError::HttpRequest {
                source: Box::new(e),
            })?;
        if reply.error_code != 0 {
            return Err(PatchbayError::SmsGateway {
                provider: self.name(),
                code: reply.error_code,
                reason: reply.reason,
            });
        }

        tracing::debug!(provider = self.name(), "verification code dispatched");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::build_http_client;

    #[test]
    fn form_body_encodes_template_value() {
        let gateway = JuheGateway::new(
            SmsJuheSetting {
                gateway: "https://v.juhe.cn/sms/send".into(),
                key: "k123".into(),
                tpl_id: "42".into(),
                tpl_key_name: "code".into(),
            },
            build_http_client(),
        );
        let body = gateway.form_body("13800138000", "9527");
        assert!(body.contains("mobile=13800138000"));
        assert!(body.contains("tpl_id=42"));
        assert!(body.contains("key=k123"));
        // "#code#=9527" form-encoded
        assert!(body.contains("tpl_value=%23code%23%3D9527"));
    }
}
