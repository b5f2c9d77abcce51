use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which assistant persona answered; stored as the interaction's variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssistantVariant {
    Clinical,
    MentalHealth,
}

impl AssistantVariant {
    pub fn tag(&self) -> &'static str {
        match self {
            AssistantVariant::Clinical => "clinical",
            AssistantVariant::MentalHealth => "mental_health",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AssistantVariant::Clinical => "Clinical Assistant",
            AssistantVariant::MentalHealth => "Mental Health Helper",
        }
    }

    pub fn system_prompt(&self) -> &'static str {
        match self {
            AssistantVariant::Clinical => {
                "You are a clinical assistant supporting licensed healthcare professionals. \
                 Answer concisely and flag anything that needs in-person evaluation."
            }
            AssistantVariant::MentalHealth => {
                "You are a supportive mental health assistant helping clinicians care for \
                 their patients. Be empathetic and evidence-based."
            }
        }
    }

    pub fn temperature(&self) -> f64 {
        match self {
            AssistantVariant::Clinical => 0.7,
            AssistantVariant::MentalHealth => 0.8,
        }
    }
}

/// One row of the append-only interaction log. Rows are never updated or
/// deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GptInteraction {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub patient_id: Option<Uuid>,
    pub variant: String,
    pub message: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    pub message: Option<String>,
    pub patient_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    pub patient_id: Option<Uuid>,
    pub variant: Option<String>,
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub interaction_id: Uuid,
    pub message: String,
    pub response: String,
    pub variant: &'static str,
    pub timestamp: DateTime<Utc>,
}
