//! Vendor invitations — sends the "new RFP" email through the Resend HTTP API.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

const RESEND_API_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Resend error (status {status}): {message}")]
    Api { status: u16, message: String },
}

#[derive(Debug, Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResendSuccess {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendErrorBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone)]
pub struct Mailer {
    client: Client,
    api_key: String,
    from_address: String,
}

impl Mailer {
    pub fn new(api_key: String, from_address: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            from_address,
        }
    }

    /// Sends one invitation addressed to all vendors. Returns the provider message id.
    pub async fn send_rfp_invitation(
        &self,
        to: &[String],
        rfp_title: &str,
        rfp_id: Uuid,
    ) -> Result<String, MailError> {
        let subject = invitation_subject(rfp_title);
        let html = invitation_html(rfp_title, rfp_id);
        let payload = ResendPayload {
            from: &self.from_address,
            to,
            subject: &subject,
            html: &html,
        };

        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ResendErrorBody>(&body)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or(body);
            return Err(MailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let sent: ResendSuccess = response.json().await?;
        info!("Invitation for RFP {rfp_id} sent to {} vendors (id={})", to.len(), sent.id);
        Ok(sent.id)
    }
}

fn invitation_subject(rfp_title: &str) -> String {
    format!("RFP Invitation: {rfp_title}")
}

fn invitation_html(rfp_title: &str, rfp_id: Uuid) -> String {
    let title = escape_html(rfp_title);
    format!(
        "<h1>New RFP Invitation: {title}</h1>\
         <p>Hello Vendor,</p>\
         <p>You have been invited to bid on a new project.</p>\
         <p><b>RFP ID:</b> {rfp_id}</p>\
         <p>Please reply with your proposal attached as a PDF.</p>\
         <p>Best regards,<br>ProcureAI Team</p>"
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
