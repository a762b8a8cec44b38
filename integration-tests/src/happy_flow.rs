use anyhow::Context as _;
use piggy_jar::external::WalletConnector;
use piggy_jar_model::{
    agent::PrefillParams,
    api::{BillingApi, JarApi, NotificationApi, PrefillApi},
    jar::{Cadence, DraftKind, JarStatus},
    settlement::{DepositOutcome, SettlementView},
    ROOTSTOCK_TESTNET_CHAIN_ID,
};

use crate::{common::format_amount, context::Context};

pub(crate) async fn run() -> anyhow::Result<()> {
    tracing::info!("👷🏽 Run happy flow test");

    let context = Context::new(1_000)?;
    let mut planner = context.planner()?;

    let draft = planner.prefill_jar_creation(PrefillParams {
        name: Some("Bike".to_string()),
        target: 100.0,
        recurring: 25.0,
        cadence: Cadence::Weekly,
        kind: DraftKind::NativeCoin,
    });

    let jar = planner.create_jar(draft).await?;
    let address = jar.contract_address.clone().context("Jar contract was not deployed")?;

    assert_eq!(context.wallet.chain_id(), ROOTSTOCK_TESTNET_CHAIN_ID);
    assert_eq!(context.chain.contract_balance(&address).await, Some(0));

    let report = planner.advance(7);
    assert_eq!(report.due.len(), 1);

    let notification = planner.get_notifications().remove(0);
    assert_eq!(notification.text, "1 weekly payment(s) due for Bike");

    let SettlementView::Deposited(deposit) = planner.settle(&notification.id).await? else {
        anyhow::bail!("Expected an on-chain deposit");
    };

    assert_eq!(deposit.outcome, DepositOutcome::Filling);
    assert_eq!(context.chain.contract_balance(&address).await, Some(25));
    assert_eq!(context.chain.wallet_balance().await, 975);

    tracing::info!("Days to fill: {}", planner.get_days_to_fill(&jar.id)?);

    let report = planner.advance(30);
    assert_eq!(report.due[0].periods_due, 4);

    let notification = planner.get_notifications().remove(0);

    let SettlementView::Deposited(deposit) = planner.settle(&notification.id).await? else {
        anyhow::bail!("Expected an on-chain deposit");
    };

    assert_eq!(deposit.amount.0, 100);
    assert_eq!(deposit.outcome, DepositOutcome::FilledAndBroken);
    assert_eq!(deposit.jar.status, JarStatus::Broken);
    assert_eq!(deposit.jar.deposited_amount.0, 0);

    assert_eq!(context.chain.contract_balance(&address).await, Some(0));
    assert_eq!(context.chain.wallet_balance().await, 1_000);

    tracing::info!(
        "Jar {} returned {} to the owner",
        jar.name,
        format_amount(context.chain.wallet_balance().await)
    );

    assert!(planner.advance(30).due.is_empty());
    assert!(planner.get_notifications().is_empty());

    Ok(())
}

#[tokio::test]
async fn happy_flow() -> anyhow::Result<()> {
    run().await
}
