//! SMS gateway capability family.
//!
//! A suite that wants SMS names its provider through the feature value
//! (`Sms: { Value: SmsJuhe }`); selection is a value test, so an active
//! `Sms` feature with an unrecognized provider matches no candidate and
//! fails loudly at startup. Suites without the `Sms` feature simply
//! have no SMS capability — callers probe with `cfg_if("Sms")` first.

pub mod juhe;

use async_trait::async_trait;

use crate::client::HttpClient;
use crate::config::features::Suite;
use crate::config::Settings;
use crate::error::PatchbayError;
use crate::select::{BackendSelector, Servant};

#[async_trait]
pub trait SmsGateway: Servant + Send + Sync {
    /// Deliver a verification code to `phone`.
    ///
    /// Provider rejections surface as errors; the operation either
    /// fully succeeds or reports why it did not.
    async fn send_code(&self, phone: &str, code: &str) -> Result<(), PatchbayError>;
}

/// Construct the one active SMS gateway for this run. No default
/// exists: an SMS-less suite is a normal configuration, not an error
/// state, so callers gate on `cfg_if("Sms")` before selecting.
pub fn select_sms(
    settings: &Settings,
    suite: &Suite,
    client: &HttpClient,
) -> Result<Box<dyn SmsGateway>, PatchbayError> {
    BackendSelector::<Box<dyn SmsGateway>>::new("sms gateway")
        .when("Sms = SmsJuhe", || {
            Ok(Box::new(juhe::JuheGateway::new(
                settings.sms_juhe.clone(),
                client.clone(),
            )) as Box<dyn SmsGateway>)
        })
        .select(suite)
}
