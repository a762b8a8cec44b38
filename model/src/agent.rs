//! Messages exchanged with the chat agent that helps users set up jars.

use serde::{Deserialize, Serialize};

use crate::jar::{Cadence, DraftKind};

/// Parameters used to prefill the jar creation form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PrefillParams {
    pub name: Option<String>,
    pub target: f64,
    pub recurring: f64,
    pub cadence: Cadence,
    pub kind: DraftKind,
}

/// Payload sent to the agent endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AgentRequest {
    pub text: String,
    pub wallet: Option<String>,
    pub chain_id: Option<String>,
}

/// Reply of the agent endpoint. Both parts are optional.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct AgentReply {
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default, deserialize_with = "lenient_action")]
    pub action: Option<AgentAction>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum AgentAction {
    #[serde(rename = "CreateJarParams", rename_all = "camelCase")]
    CreateJar {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        target_usdc: Option<f64>,
        #[serde(default)]
        target: Option<f64>,
        #[serde(default)]
        auto_topup_inr: Option<f64>,
        #[serde(default)]
        period: Option<Cadence>,
    },

    #[serde(rename = "CreateUsdcJarParams", rename_all = "camelCase")]
    CreateTokenJar {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        target_usdc: Option<f64>,
        #[serde(default)]
        auto_topup_usdc: Option<f64>,
        #[serde(default)]
        period: Option<Cadence>,
        #[serde(default)]
        token: Option<String>,
    },
}

/// Unknown or malformed actions are ignored instead of failing the whole reply.
fn lenient_action<'de, D>(deserializer: D) -> Result<Option<AgentAction>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|value| serde_json::from_value(value).ok()))
}

impl AgentAction {
    /// Converts the agent's suggestion into form prefill parameters.
    /// A missing period means weekly.
    pub fn into_prefill(self) -> PrefillParams {
        match self {
            AgentAction::CreateJar {
                name,
                target_usdc,
                target,
                auto_topup_inr,
                period,
            } => PrefillParams {
                name,
                target: target_usdc.or(target).unwrap_or_default(),
                recurring: auto_topup_inr.unwrap_or_default(),
                cadence: period.unwrap_or(Cadence::Weekly),
                kind: DraftKind::NativeCoin,
            },
            AgentAction::CreateTokenJar {
                name,
                target_usdc,
                auto_topup_usdc,
                period,
                token,
            } => PrefillParams {
                name,
                target: target_usdc.unwrap_or_default(),
                recurring: auto_topup_usdc.unwrap_or_default(),
                cadence: period.unwrap_or(Cadence::Weekly),
                kind: DraftKind::FungibleToken {
                    token: token.unwrap_or_default(),
                },
            },
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{
        agent::{AgentAction, AgentReply},
        jar::{Cadence, DraftKind},
    };

    #[test]
    fn parse_create_jar_reply() {
        let reply: AgentReply = serde_json::from_str(
            r#"{
                "text": "Here is a plan",
                "action": { "type": "CreateJarParams", "name": "Bike", "target": 120.7, "autoTopupInr": 500, "period": "daily" }
            }"#,
        )
        .unwrap();

        assert_eq!(reply.text.as_deref(), Some("Here is a plan"));

        let prefill = reply.action.unwrap().into_prefill();
        assert_eq!(prefill.name.as_deref(), Some("Bike"));
        assert_eq!(prefill.target, 120.7);
        assert_eq!(prefill.recurring, 500.0);
        assert_eq!(prefill.cadence, Cadence::Daily);
        assert_eq!(prefill.kind, DraftKind::NativeCoin);
    }

    #[test]
    fn parse_token_jar_reply_with_defaults() {
        let reply: AgentReply = serde_json::from_str(
            r#"{ "action": { "type": "CreateUsdcJarParams", "targetUsdc": 50, "autoTopupUsdc": 5 } }"#,
        )
        .unwrap();

        assert_eq!(reply.text, None);

        let prefill = reply.action.unwrap().into_prefill();
        assert_eq!(prefill.cadence, Cadence::Weekly);
        assert_eq!(prefill.kind, DraftKind::FungibleToken { token: String::new() });
    }

    #[test]
    fn unknown_action_is_ignored() {
        let reply: AgentReply =
            serde_json::from_str(r#"{ "text": "hi", "action": { "type": "OrderPizza" } }"#).unwrap();

        assert_eq!(reply.text.as_deref(), Some("hi"));
        assert_eq!(reply.action, None::<AgentAction>);
    }
}
