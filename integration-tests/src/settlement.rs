use piggy_jar_model::{
    api::{BillingApi, JarApi, NotificationApi},
    jar::{Cadence, DraftKind, JarDraft},
    settlement::SettlementView,
    JarError,
};

use crate::context::Context;

fn draft(name: &str, kind: DraftKind) -> JarDraft {
    JarDraft {
        name: name.to_string(),
        target_amount: 500,
        recurring_amount: 20,
        cadence: Cadence::Daily,
        kind,
    }
}

pub(crate) async fn run() -> anyhow::Result<()> {
    tracing::info!("👷🏽 Run settlement test");

    let context = Context::new(50)?;
    let mut planner = context.planner()?;

    let simulated = planner.create_jar(draft("Cash", DraftKind::SimulatedOnly)).await?;
    let on_chain = planner.create_jar(draft("Coins", DraftKind::NativeCoin)).await?;

    let report = planner.advance(3);
    assert_eq!(report.due.len(), 2);

    let notifications = planner.get_notifications();
    let find = |jar_id: &str| {
        notifications
            .iter()
            .find(|notification| notification.jar_id == jar_id)
            .map(|notification| notification.id.clone())
    };

    let (Some(manual_id), Some(chain_id)) = (find(&simulated.id), find(&on_chain.id)) else {
        anyhow::bail!("Every jar should have a notification: {notifications:?}");
    };

    // Simulated jars ask for one payment whatever number of periods is due.
    let settlement = planner.settle(&manual_id).await?;

    assert_eq!(
        settlement,
        SettlementView::ManualPaymentRequested {
            jar_id: simulated.id.clone(),
            amount: 20.into(),
        }
    );

    let payment = planner.confirm_manual_payment(&simulated.id).await?;
    assert_eq!(payment.jar.deposited_amount.0, 20);

    // 3 periods of 20 exceed the wallet funds of 50.
    let result = planner.settle(&chain_id).await;

    assert!(matches!(result, Err(JarError::External(_))));
    assert_eq!(planner.get_notifications().len(), 1);
    assert_eq!(planner.get_jar(&on_chain.id)?.deposited_amount.0, 0);

    planner.advance(1);

    let notifications = planner.get_notifications();

    assert_eq!(notifications.len(), 2);
    assert!(notifications
        .iter()
        .any(|notification| notification.jar_id == on_chain.id && notification.periods_due == 4));

    for notification in notifications {
        planner.dismiss(&notification.id)?;
    }

    assert!(planner.get_notifications().is_empty());
    assert_eq!(planner.get_jar(&simulated.id)?.deposited_amount.0, 20);
    assert_eq!(context.chain.wallet_balance().await, 50);

    Ok(())
}

#[tokio::test]
async fn settlement() -> anyhow::Result<()> {
    run().await
}
