//! Best-effort email notification for new leads.
//!
//! Each accepted submission is formatted as an HTML email and POSTed to a
//! transactional-email provider.  Nothing here ever fails the caller: a
//! missing credential or a transport failure is logged and reported as
//! `false` from [`Notifier::notify`].

use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::submission::{ContactSubmission, DEFAULT_SOURCE};

pub const DEFAULT_PROVIDER_URL: &str = "https://api.resend.com/emails";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the notifier needs from the process configuration.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    /// Bearer credential for the provider. `None` disables delivery.
    pub api_key: Option<String>,
    pub from: String,
    pub to: String,
    pub endpoint: String,
}

#[derive(Debug)]
pub enum DeliveryError {
    MissingCredential,
    Transport(String),
}

impl std::fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryError::MissingCredential => write!(f, "no delivery credential configured"),
            DeliveryError::Transport(e) => write!(f, "transport failure: {e}"),
        }
    }
}

impl std::error::Error for DeliveryError {}

/// JSON body expected by the provider.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// What the provider said, when it said anything at all.
#[derive(Debug)]
pub struct ProviderReply {
    pub status: u16,
    pub body: String,
}

pub struct Notifier {
    config: NotifierConfig,
    agent: ureq::Agent,
}

impl Notifier {
    pub fn new(config: NotifierConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self { config, agent }
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    /// Build the email announcing `submission`, stamped with `sent_at`.
    pub fn compose(&self, submission: &ContactSubmission, sent_at: &str) -> OutboundEmail {
        let source = if submission.source.is_empty() {
            DEFAULT_SOURCE
        } else {
            submission.source.as_str()
        };
        let html = format!(
            "<h2>New Contact Submission</h2>\n\
             <p><strong>Name:</strong> {}</p>\n\
             <p><strong>Email:</strong> {}</p>\n\
             <p><strong>Source:</strong> {}</p>\n\
             <p><strong>Message:</strong><br>{}</p>\n\
             <br>\n\
             <small>Sent at {} UTC</small>\n",
            escape_html(&submission.name),
            escape_html(&submission.email),
            escape_html(source),
            escape_html(&submission.message).replace('\n', "<br>"),
            sent_at,
        );
        OutboundEmail {
            from: self.config.from.clone(),
            to: vec![self.config.to.clone()],
            subject: format!("New Lead from Techline Africa — {}", submission.name),
            html,
        }
    }

    /// Send the notification, surfacing why it could not be attempted.
    ///
    /// Any HTTP response, including provider-side error statuses, counts as
    /// an attempted delivery.  Blocking; run it off the async executor.
    pub fn send(&self, submission: &ContactSubmission) -> Result<ProviderReply, DeliveryError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(DeliveryError::MissingCredential)?;
        let sent_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let email = self.compose(submission, &sent_at);

        let response = self
            .agent
            .post(&self.config.endpoint)
            .set("Authorization", &format!("Bearer {api_key}"))
            .send_json(&email);

        let response = match response {
            Ok(resp) => resp,
            Err(ureq::Error::Status(_, resp)) => resp,
            Err(ureq::Error::Transport(t)) => return Err(DeliveryError::Transport(t.to_string())),
        };
        let status = response.status();
        let body = response.into_string().unwrap_or_default();
        Ok(ProviderReply { status, body })
    }

    /// Fire-and-forget entry point: never fails, logs every outcome.
    pub fn notify(&self, submission: &ContactSubmission) -> bool {
        match self.send(submission) {
            Ok(reply) => {
                crate::tlog!(
                    "notifier: provider responded {}: {}",
                    reply.status,
                    reply.body
                );
                true
            }
            Err(DeliveryError::MissingCredential) => {
                crate::tlog!("WARNING: notifier: no RESEND_API_KEY configured, email not sent");
                false
            }
            Err(e) => {
                crate::tlog!("notifier: email sending failed: {}", e);
                false
            }
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>, endpoint: &str) -> NotifierConfig {
        NotifierConfig {
            api_key: api_key.map(str::to_string),
            from: "onboarding@resend.dev".to_string(),
            to: "ops@example.com".to_string(),
            endpoint: endpoint.to_string(),
        }
    }

    fn submission() -> ContactSubmission {
        ContactSubmission {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            message: "Need a quote\nfor solar".to_string(),
            source: "website".to_string(),
        }
    }

    #[test]
    fn test_compose_includes_every_field() {
        let notifier = Notifier::new(config(Some("k"), DEFAULT_PROVIDER_URL));
        let email = notifier.compose(&submission(), "2026-01-02T03:04:05Z");

        assert_eq!(email.from, "onboarding@resend.dev");
        assert_eq!(email.to, vec!["ops@example.com".to_string()]);
        assert_eq!(email.subject, "New Lead from Techline Africa — Ada");
        assert!(email.html.contains("<strong>Name:</strong> Ada"));
        assert!(email.html.contains("<strong>Email:</strong> ada@example.com"));
        assert!(email.html.contains("<strong>Source:</strong> website"));
        assert!(email.html.contains("Need a quote<br>for solar"));
        assert!(email.html.contains("Sent at 2026-01-02T03:04:05Z UTC"));
    }

    #[test]
    fn test_compose_escapes_markup_and_defaults_source() {
        let notifier = Notifier::new(config(Some("k"), DEFAULT_PROVIDER_URL));
        let mut sub = submission();
        sub.message = "<script>alert('x')</script> & more".to_string();
        sub.source = String::new();
        let email = notifier.compose(&sub, "now");

        assert!(!email.html.contains("<script>"));
        assert!(email
            .html
            .contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; more"));
        assert!(email.html.contains("<strong>Source:</strong> website"));
    }

    #[test]
    fn test_email_body_serializes_as_provider_expects() {
        let notifier = Notifier::new(config(Some("k"), DEFAULT_PROVIDER_URL));
        let json = serde_json::to_value(notifier.compose(&submission(), "now")).unwrap();
        let keys: Vec<&str> = json
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        assert_eq!(keys.len(), 4);
        for key in ["from", "to", "subject", "html"] {
            assert!(keys.contains(&key), "missing {key}");
        }
        assert!(json["to"].is_array());
    }

    #[test]
    fn test_missing_credential_skips_delivery() {
        let notifier = Notifier::new(config(None, "http://127.0.0.1:9/unused"));
        assert!(!notifier.is_configured());
        assert!(matches!(
            notifier.send(&submission()),
            Err(DeliveryError::MissingCredential)
        ));
        assert!(!notifier.notify(&submission()));
    }

    #[test]
    fn test_transport_failure_is_absorbed() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let endpoint = format!("http://127.0.0.1:{port}/emails");
        let notifier = Notifier::new(config(Some("k"), &endpoint));
        assert!(matches!(
            notifier.send(&submission()),
            Err(DeliveryError::Transport(_))
        ));
        assert!(!notifier.notify(&submission()));
    }
}
