use reqwest::Client;
use serde_json::json;
use tracing::{debug, warn};

use shared_config::AppConfig;

/// Transactional email sender. Template content is intentionally minimal;
/// delivery problems are reported to the caller, never raised as a 5xx.
pub struct EmailClient {
    client: Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl EmailClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            api_url: config.email_api_url.clone(),
            api_key: config.email_api_key.clone(),
            from: config.email_from.clone(),
        }
    }

    /// Hands the message to the provider; returns whether it was accepted.
    pub async fn send(&self, to: &str, subject: &str, html: &str) -> bool {
        let url = format!("{}/emails", self.api_url);
        debug!("Sending email to {} via {}", to, url);

        let body = json!({
            "from": self.from,
            "to": to,
            "subject": subject,
            "html": html
        });

        let result = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                warn!("Email provider rejected message: {}", response.status());
                false
            }
            Err(e) => {
                warn!("Email delivery failed: {}", e);
                false
            }
        }
    }
}

pub fn confirmation_email(
    patient_name: &str,
    doctor_name: &str,
    date: &str,
    time: &str,
) -> (String, String) {
    let subject = "Appointment Confirmation - Practia".to_string();
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
           <h2>Appointment Confirmation</h2>\
           <p>Hello <strong>{}</strong>,</p>\
           <p>Your appointment has been confirmed:</p>\
           <div style=\"background-color: #f0f0f0; padding: 15px; border-radius: 5px;\">\
             <p><strong>Doctor:</strong> {}</p>\
             <p><strong>Date:</strong> {}</p>\
             <p><strong>Time:</strong> {}</p>\
           </div>\
           <p>Please arrive 10 minutes early.</p>\
         </div>",
        patient_name, doctor_name, date, time
    );
    (subject, html)
}

pub fn reminder_email(
    patient_name: &str,
    doctor_name: &str,
    date: &str,
    time: &str,
) -> (String, String) {
    let subject = "Appointment Reminder - Practia".to_string();
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
           <h2>Appointment Reminder</h2>\
           <p>Hello <strong>{}</strong>,</p>\
           <p>A reminder of your upcoming appointment:</p>\
           <div style=\"background-color: #fff3cd; padding: 15px; border-radius: 5px;\">\
             <p><strong>Doctor:</strong> {}</p>\
             <p><strong>Date:</strong> {}</p>\
             <p><strong>Time:</strong> {}</p>\
           </div>\
           <p>If you cannot attend, please cancel in advance.</p>\
         </div>",
        patient_name, doctor_name, date, time
    );
    (subject, html)
}

pub fn cancellation_email(
    patient_name: &str,
    doctor_name: &str,
    date: &str,
    time: Option<&str>,
    reason: Option<&str>,
) -> (String, String) {
    let subject = "Appointment Cancellation - Practia".to_string();
    let time_line = time
        .map(|t| format!("<p><strong>Time:</strong> {}</p>", t))
        .unwrap_or_default();
    let reason_line = reason
        .map(|r| format!("<p><strong>Reason:</strong> {}</p>", r))
        .unwrap_or_default();
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
           <h2>Appointment Cancellation</h2>\
           <p>Hello <strong>{}</strong>,</p>\
           <p>Your appointment has been cancelled.</p>\
           <div style=\"background-color: #f8d7da; padding: 15px; border-radius: 5px;\">\
             <p><strong>Doctor:</strong> {}</p>\
             <p><strong>Date:</strong> {}</p>\
             {}{}\
           </div>\
         </div>",
        patient_name, doctor_name, date, time_line, reason_line
    );
    (subject, html)
}

pub fn new_appointment_email(
    doctor_name: &str,
    patient_name: &str,
    date: &str,
    time: Option<&str>,
) -> (String, String) {
    let subject = "New Appointment Scheduled - Practia".to_string();
    let time_line = time
        .map(|t| format!("<p><strong>Time:</strong> {}</p>", t))
        .unwrap_or_default();
    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
           <h2>New Appointment Scheduled</h2>\
           <p>Hello <strong>{}</strong>,</p>\
           <p>A new appointment has been added to your calendar:</p>\
           <div style=\"background-color: #d1ecf1; padding: 15px; border-radius: 5px;\">\
             <p><strong>Patient:</strong> {}</p>\
             <p><strong>Date:</strong> {}</p>\
             {}\
           </div>\
         </div>",
        doctor_name, patient_name, date, time_line
    );
    (subject, html)
}
