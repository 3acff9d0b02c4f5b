//! # prospect-crm
//!
//! RD Station CRM client. Contacts go out as conversion events on the
//! platform events endpoint; funnel-stage updates patch the contact by
//! email. Docs: <https://developers.rdstation.com/reference>

use async_trait::async_trait;
use prospect_core::{record::Contact, traits::ContactSink, ProspectError};
use serde_json::{json, Value};
use tracing::{debug, info};

/// Tag stamped onto every submission, whatever the user entered.
pub const FIXED_TAG: &str = "prospectacao-whatsapp";

/// Conversion identifier registered for this funnel.
const CONVERSION_IDENTIFIER: &str = "prospectacao-whatsapp";

/// RD Station API client.
pub struct RdStationClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl RdStationClient {
    /// Create a client for the given endpoint and token. An empty token
    /// is allowed here; every call checks it first.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Whether an API token is present.
    pub fn is_configured(&self) -> bool {
        !self.token.is_empty()
    }

    fn ensure_configured(&self) -> Result<(), ProspectError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(ProspectError::CrmNotConfigured)
        }
    }

    /// Submit a contact as a conversion event.
    pub async fn send_contact(&self, contact: &Contact) -> Result<Value, ProspectError> {
        self.ensure_configured()?;

        let payload = conversion_payload(contact);
        let url = format!("{}/platform/events", self.base_url);
        debug!("sending contact {} to RD Station", contact.phone);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProspectError::Crm(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProspectError::Crm(format!("API returned {status}: {body}")));
        }

        info!("contact {} forwarded to RD Station", contact.phone);
        resp.json()
            .await
            .map_err(|e| ProspectError::Crm(format!("bad API response: {e}")))
    }

    /// Move a contact (looked up by email) to a new funnel stage.
    pub async fn update_contact_status(
        &self,
        contact_email: &str,
        funnel_stage: &str,
    ) -> Result<Value, ProspectError> {
        self.ensure_configured()?;

        let url = format!("{}/platform/contacts/email:{contact_email}", self.base_url);
        let payload = json!({ "funnel_stage": funnel_stage });

        let resp = self
            .client
            .patch(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ProspectError::Crm(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProspectError::Crm(format!("API returned {status}: {body}")));
        }

        resp.json()
            .await
            .map_err(|e| ProspectError::Crm(format!("bad API response: {e}")))
    }
}

#[async_trait]
impl ContactSink for RdStationClient {
    async fn send_contact(&self, contact: &Contact) -> Result<(), ProspectError> {
        RdStationClient::send_contact(self, contact).await.map(|_| ())
    }
}

/// Shape a contact into the conversion-event payload.
///
/// Missing fields get the funnel defaults: a placeholder name, an email
/// derived from the phone digits, empty custom fields. The fixed tag is
/// always present exactly once, ahead of any user-entered tags.
pub fn conversion_payload(contact: &Contact) -> Value {
    let mut tags = vec![FIXED_TAG.to_string()];
    for tag in &contact.tags {
        if tag != FIXED_TAG {
            tags.push(tag.clone());
        }
    }

    json!({
        "event_type": "CONVERSION",
        "event": {
            "conversion_identifier": CONVERSION_IDENTIFIER,
            "name": contact.name.as_deref().unwrap_or("Prospect"),
            "email": contact
                .email
                .clone()
                .unwrap_or_else(|| default_email(&contact.phone)),
            "cf_telefone": contact.phone,
            "cf_empresa": contact.company.as_deref().unwrap_or(""),
            "cf_cnpj": contact.cnpj.as_deref().unwrap_or(""),
            "tags": tags,
            "notes": contact
                .notes
                .as_deref()
                .unwrap_or("Contact added via Prospect"),
        }
    })
}

/// Placeholder lead email derived from the phone digits.
fn default_email(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    format!("{digits}@lead.prospector.com.br")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(phone: &str) -> Contact {
        Contact {
            phone: phone.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_payload_defaults() {
        let payload = conversion_payload(&contact("+5511987654321"));
        let event = &payload["event"];
        assert_eq!(payload["event_type"], "CONVERSION");
        assert_eq!(event["conversion_identifier"], CONVERSION_IDENTIFIER);
        assert_eq!(event["name"], "Prospect");
        assert_eq!(event["email"], "5511987654321@lead.prospector.com.br");
        assert_eq!(event["cf_telefone"], "+5511987654321");
        assert_eq!(event["cf_empresa"], "");
        assert_eq!(event["cf_cnpj"], "");
    }

    #[test]
    fn test_fixed_tag_always_injected() {
        let payload = conversion_payload(&contact("+5511987654321"));
        let tags = payload["event"]["tags"].as_array().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0], FIXED_TAG);

        let mut c = contact("+5511987654321");
        c.tags = vec!["vip".to_string(), FIXED_TAG.to_string()];
        let payload = conversion_payload(&c);
        let tags = payload["event"]["tags"].as_array().unwrap();
        // Fixed tag first, user tags after, no duplicate.
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0], FIXED_TAG);
        assert_eq!(tags[1], "vip");
    }

    #[test]
    fn test_provided_fields_pass_through() {
        let c = Contact {
            name: Some("Maria".to_string()),
            email: Some("maria@example.com".to_string()),
            phone: "+5511987654321".to_string(),
            company: Some("Padaria Central".to_string()),
            cnpj: Some("12.345.678/0001-00".to_string()),
            tags: vec![],
            notes: Some("met at expo".to_string()),
        };
        let event = &conversion_payload(&c)["event"];
        assert_eq!(event["name"], "Maria");
        assert_eq!(event["email"], "maria@example.com");
        assert_eq!(event["cf_empresa"], "Padaria Central");
        assert_eq!(event["cf_cnpj"], "12.345.678/0001-00");
        assert_eq!(event["notes"], "met at expo");
    }

    #[test]
    fn test_unconfigured_client_is_detected() {
        let client = RdStationClient::new("https://api.rd.services", "");
        assert!(!client.is_configured());
        assert!(matches!(
            client.ensure_configured(),
            Err(ProspectError::CrmNotConfigured)
        ));

        let client = RdStationClient::new("https://api.rd.services", "tok");
        assert!(client.is_configured());
    }
}
