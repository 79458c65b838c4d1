//! JSON bodies exchanged with the assistant service.
//!
//! Field names follow the service's Portuguese schema. Replies are decoded
//! leniently: every consumed field is optional and falls back to a default.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::brain::classification::ClassificationResult;
use crate::models::{FeedbackSubmission, OriginalResultContext, Requester};

/// Answer used when the service concluded without any text.
pub const NO_ANSWER: &str = "Resposta não disponível";

/// Body of `POST /solicitacoes/executar`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionPayload {
    pub solicitacao_usuario: String,
    pub usuario_id: Option<String>,
    pub contexto_conversa: String,
    pub historico_mensagens: Vec<String>,
    pub categoria_solicitacao: String,
    pub tags: Vec<String>,
    pub modulo_nome: String,
    pub modulo_categoria: String,
    pub complexidade: String,
    pub sentimento: String,
    pub palavras_chave: Vec<String>,
    pub topicos_abordados: Vec<String>,
    pub tela: String,
    pub resposta_assistente: String,
}

impl ExecutionPayload {
    pub fn new(
        question: &str,
        requester: &Requester,
        description: String,
        classification: &ClassificationResult,
    ) -> Self {
        let screen = classification.screen().to_string();
        Self {
            solicitacao_usuario: question.to_string(),
            usuario_id: requester.id.clone(),
            contexto_conversa: description,
            historico_mensagens: vec![question.to_string()],
            categoria_solicitacao: classification.category.label().to_string(),
            tags: classification.tags.clone(),
            modulo_nome: classification.module.module_name().to_string(),
            modulo_categoria: screen.clone(),
            complexidade: classification.complexity.wire_label().to_string(),
            sentimento: classification.sentiment.wire_label().to_string(),
            palavras_chave: classification.keywords.clone(),
            topicos_abordados: classification.topics.clone(),
            tela: screen,
            resposta_assistente: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Execution {
    #[serde(default)]
    pub resposta: Option<String>,
    #[serde(default)]
    pub resposta_assistente: Option<String>,
    #[serde(default)]
    pub tokens_utilizados: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Processing {
    #[serde(default)]
    pub tempo_processamento: Option<Value>,
    #[serde(default)]
    pub categoria_detectada: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavedRequest {
    #[serde(default)]
    pub id: Option<Value>,
}

/// Successful reply of the execute endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExecutionReply {
    #[serde(default)]
    pub execucao: Option<Execution>,
    #[serde(default)]
    pub processamento: Option<Processing>,
    #[serde(default)]
    pub solicitacao_salva: Option<SavedRequest>,
}

impl ExecutionReply {
    /// `execucao.resposta`, then `execucao.resposta_assistente`, then [`NO_ANSWER`].
    pub fn answer(&self) -> String {
        let execution = self.execucao.as_ref();
        execution
            .and_then(|e| e.resposta.as_deref())
            .filter(|text| !text.is_empty())
            .or_else(|| {
                execution
                    .and_then(|e| e.resposta_assistente.as_deref())
                    .filter(|text| !text.is_empty())
            })
            .unwrap_or(NO_ANSWER)
            .to_string()
    }

    pub fn tokens_used(&self) -> u64 {
        self.execucao
            .as_ref()
            .and_then(|e| e.tokens_utilizados.as_ref())
            .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f.max(0.0) as u64)))
            .unwrap_or(0)
    }

    /// Seconds.
    pub fn response_time(&self) -> f64 {
        self.processamento
            .as_ref()
            .and_then(|p| p.tempo_processamento.as_ref())
            .and_then(Value::as_f64)
            .unwrap_or(0.0)
    }

    pub fn detected_category(&self) -> Option<&str> {
        self.processamento
            .as_ref()
            .and_then(|p| p.categoria_detectada.as_deref())
            .filter(|c| !c.is_empty())
    }

    /// Identifier the service saved the request under.
    pub fn remote_id(&self) -> Option<String> {
        let id = self.solicitacao_salva.as_ref()?.id.as_ref()?;
        match id {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Body of `PUT /solicitacoes/{id}/feedback`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackPayload {
    pub avaliacao_usuario: i64,
    pub feedback_texto: String,
    pub usuario_satisfeito: bool,
    pub resolveu_problema: bool,
    pub precisou_escalacao: bool,
    pub timestamp_feedback: String,
    pub origem_feedback: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contexto_original: Option<OriginalResultContext>,
}

impl FeedbackPayload {
    pub fn new(submission: &FeedbackSubmission, timestamp: String, origin: &str) -> Self {
        Self {
            avaliacao_usuario: submission.rating,
            feedback_texto: submission.comment.clone(),
            usuario_satisfeito: submission.satisfied(),
            resolveu_problema: submission.resolved(),
            precisou_escalacao: submission.needs_escalation(),
            timestamp_feedback: timestamp,
            origem_feedback: origin.to_string(),
            contexto_original: submission.original.clone(),
        }
    }
}

/// What the feedback endpoint answered on success.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackReceipt {
    pub status: u16,
    pub feedback_id: Option<String>,
    pub body: Option<Value>,
}

impl FeedbackReceipt {
    /// Parse a possibly empty, possibly non-JSON body.
    pub fn from_body(status: u16, body: &str) -> Self {
        let body: Option<Value> = if body.trim().is_empty() {
            None
        } else {
            serde_json::from_str(body).ok()
        };
        let feedback_id = body.as_ref().and_then(|b| match &b["id"] {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Self { status, feedback_id, body }
    }
}
