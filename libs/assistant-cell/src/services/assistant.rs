use chrono::Utc;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use shared_database::scope::{assert_owned_patient, GPT_INTERACTIONS};
use shared_database::state::AppState;
use shared_database::store::StoreClient;
use shared_models::error::AppError;

use crate::models::{AssistantVariant, ChatReply, ChatRequest, GptInteraction, HistoryQuery};
use crate::services::OpenAiClient;

const DEFAULT_HISTORY_LIMIT: u64 = 50;
const MAX_HISTORY_LIMIT: u64 = 500;

pub struct AssistantService<'a> {
    store: &'a StoreClient,
    openai: OpenAiClient,
}

impl<'a> AssistantService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            store: &state.store,
            openai: OpenAiClient::new(&state.config),
        }
    }

    /// Forwards the message to the completion provider and appends the
    /// exchange to the interaction log.
    pub async fn chat(
        &self,
        doctor_id: Uuid,
        variant: AssistantVariant,
        request: ChatRequest,
    ) -> Result<ChatReply, AppError> {
        let message = request
            .message
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::ValidationError("Message field is required".to_string()))?;

        if let Some(patient_id) = request.patient_id {
            assert_owned_patient(self.store, patient_id, doctor_id).await?;
        }

        debug!("{} chat for doctor {}", variant.tag(), doctor_id);

        let response = self
            .openai
            .chat_completion(variant.system_prompt(), &message, variant.temperature())
            .await?;

        let row = json!({
            "doctor_id": doctor_id,
            "patient_id": request.patient_id,
            "variant": variant.tag(),
            "message": message,
            "response": response,
            "created_at": Utc::now().to_rfc3339()
        });

        let interaction: GptInteraction = GPT_INTERACTIONS.insert(self.store, row).await?;

        Ok(ChatReply {
            interaction_id: interaction.id,
            message: interaction.message,
            response: interaction.response,
            variant: variant.tag(),
            timestamp: interaction.created_at,
        })
    }

    pub async fn history(
        &self,
        doctor_id: Uuid,
        query: HistoryQuery,
    ) -> Result<Vec<GptInteraction>, AppError> {
        let mut filters = Vec::new();
        if let Some(patient_id) = query.patient_id {
            filters.push(("patient_id", format!("eq.{}", patient_id)));
        }
        if let Some(variant) = query.variant.filter(|s| !s.is_empty()) {
            filters.push(("variant", format!("eq.{}", variant)));
        }

        let limit = query
            .limit
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
            .min(MAX_HISTORY_LIMIT);

        GPT_INTERACTIONS
            .list_filtered(
                self.store,
                doctor_id,
                &filters,
                Some("created_at.desc"),
                Some(limit),
            )
            .await
    }

    pub async fn get_interaction(
        &self,
        doctor_id: Uuid,
        interaction_id: Uuid,
    ) -> Result<GptInteraction, AppError> {
        GPT_INTERACTIONS.get(self.store, doctor_id, interaction_id).await
    }
}
