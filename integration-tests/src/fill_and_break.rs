use anyhow::Context as _;
use piggy_jar_model::{
    api::JarApi,
    jar::{Cadence, DraftKind, JarDraft, JarStatus},
    settlement::DepositOutcome,
    JarError,
};

use crate::context::Context;

fn token_draft(token: String) -> JarDraft {
    JarDraft {
        name: "Laptop".to_string(),
        target_amount: 1_000_000,
        recurring_amount: 100_000,
        cadence: Cadence::Monthly,
        kind: DraftKind::FungibleToken { token },
    }
}

pub(crate) async fn run() -> anyhow::Result<()> {
    tracing::info!("👷🏽 Run fill and break test");

    let context = Context::new(5_000_000)?;
    let mut planner = context.planner()?;

    let token = Context::account("05dc")?;
    let jar = planner.create_jar(token_draft(token.to_string())).await?;
    let address = jar.contract_address.clone().context("Jar contract was not deployed")?;

    planner.deposit(&jar.id, 900_000).await?;

    context.chain.fail_withdrawals(true);

    let view = planner.deposit(&jar.id, 200_000).await?;

    assert!(matches!(view.outcome, DepositOutcome::BreakFailed { .. }));
    assert_eq!(view.jar.status, JarStatus::Filled);
    assert_eq!(view.jar.deposited_amount.0, 1_100_000);
    assert_eq!(context.chain.contract_balance(&address).await, Some(1_100_000));

    let result = planner.break_jar(&jar.id).await;

    assert!(matches!(result, Err(JarError::External(_))));
    assert_eq!(planner.get_jar(&jar.id)?.status, JarStatus::Filled);

    context.chain.fail_withdrawals(false);

    let broken = planner.break_jar(&jar.id).await?;

    assert_eq!(broken.status, JarStatus::Broken);
    assert_eq!(broken.deposited_amount.0, 0);
    assert_eq!(context.chain.contract_balance(&address).await, Some(0));
    assert_eq!(context.chain.wallet_balance().await, 5_000_000);

    Ok(())
}

#[tokio::test]
async fn fill_and_break() -> anyhow::Result<()> {
    run().await
}

#[tokio::test]
async fn deposit_beyond_wallet_funds() -> anyhow::Result<()> {
    let context = Context::new(150_000)?;
    let mut planner = context.planner()?;

    let jar = planner
        .create_jar(token_draft(Context::account("05dc")?.to_string()))
        .await?;

    let result = planner.deposit(&jar.id, 200_000).await;

    assert!(matches!(result, Err(JarError::External(_))));

    let jar = planner.get_jar(&jar.id)?;

    assert_eq!(jar.deposited_amount.0, 0);
    assert!(!jar.is_pending_settlement);

    Ok(())
}
