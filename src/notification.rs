use std::sync::Arc;

use actix_web::post;
use actix_web::web::{Data, Json};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::config::Config;
use crate::error::Error;
use crate::utils::OutcomeBody;

const SENDGRID_ENDPOINT: &str = "https://api.sendgrid.com/v3/mail/send";

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_email(&self, email: &Email) -> Result<(), Error>;
}

/// Delivers plain-text email through the SendGrid v3 API.
pub struct SendGridNotifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl SendGridNotifier {
    pub fn new(api_key: String, from: String) -> SendGridNotifier {
        SendGridNotifier {
            client: reqwest::Client::new(),
            endpoint: SENDGRID_ENDPOINT.to_string(),
            api_key,
            from,
        }
    }

    fn payload(&self, email: &Email) -> serde_json::Value {
        json!({
            "personalizations": [{ "to": [{ "email": email.to }] }],
            "from": { "email": self.from },
            "subject": email.subject,
            "content": [{ "type": "text/plain", "value": email.text }],
        })
    }
}

#[async_trait]
impl Notifier for SendGridNotifier {
    #[tracing::instrument(skip(self, email), fields(to = %email.to, subject = %email.subject))]
    async fn send_email(&self, email: &Email) -> Result<(), Error> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.payload(email))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::EmailRejected {
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

/// Used when no provider is configured: the email is logged and dropped.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_email(&self, email: &Email) -> Result<(), Error> {
        info!(to = %email.to, subject = %email.subject, "no email provider configured, email dropped");

        Ok(())
    }
}

pub fn from_config(config: &Config) -> Arc<dyn Notifier> {
    match (&config.sendgrid_api_key, &config.email_from) {
        (Some(api_key), Some(from)) => {
            Arc::new(SendGridNotifier::new(api_key.clone(), from.clone()))
        }
        _ => Arc::new(LogNotifier),
    }
}

#[post("/api/send-email")]
#[tracing::instrument(skip(notifier, body))]
pub async fn send_email(
    notifier: Data<dyn Notifier>,
    body: Json<Email>,
) -> Result<Json<OutcomeBody>, Error> {
    let email = body.into_inner();

    notifier.send_email(&email).await?;

    Ok(OutcomeBody::succeeded())
}
