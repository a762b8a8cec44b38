use piggy_jar_model::{
    agent::{AgentReply, PrefillParams},
    api::PrefillApi,
    jar::{DraftKind, JarDraft},
    TokenAmount,
};

use crate::Planner;

/// Whole base units, at least one.
fn to_amount(value: f64) -> TokenAmount {
    value.floor().max(1.0) as TokenAmount
}

impl PrefillApi for Planner {
    fn prefill_jar_creation(&mut self, params: PrefillParams) -> JarDraft {
        let name = match params.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_owned(),
            _ => match params.kind {
                DraftKind::FungibleToken { .. } => self.config.default_token_jar_name.clone(),
                _ => self.config.default_jar_name.clone(),
            },
        };

        let draft = JarDraft {
            name,
            target_amount: to_amount(params.target),
            recurring_amount: to_amount(params.recurring),
            cadence: params.cadence,
            kind: params.kind,
        };

        tracing::debug!("Prefilled jar creation form: {draft:?}");

        self.draft = Some(draft.clone());

        draft
    }

    fn get_draft(&self) -> Option<JarDraft> {
        self.draft.clone()
    }
}

impl Planner {
    /// Prefills the creation form from an agent reply carrying a jar action.
    /// Replies with text only leave the form untouched.
    pub fn apply_agent_reply(&mut self, reply: AgentReply) -> Option<JarDraft> {
        if let Some(text) = &reply.text {
            tracing::debug!("Agent: {text}");
        }

        reply
            .action
            .map(|action| self.prefill_jar_creation(action.into_prefill()))
    }
}
