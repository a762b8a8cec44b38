use futures::future::join_all;
use itertools::Itertools;
use piggy_jar_model::{
    api::{BillingApi, JarApi, NotificationApi},
    jar::{Cadence, DraftKind, JarDraft},
    settlement::SettlementView,
};

use crate::{common::total_deposited, context::Context};

const JARS_COUNT: u64 = 20;

async fn fill_wallet(cadence: Cadence) -> anyhow::Result<u128> {
    let context = Context::new(1_000_000)?;
    let mut planner = context.planner()?;

    for index in 0..JARS_COUNT {
        planner
            .create_jar(JarDraft {
                name: format!("Jar {index}"),
                target_amount: 10_000,
                recurring_amount: u128::from(index + 1),
                cadence,
                kind: DraftKind::NativeCoin,
            })
            .await?;
    }

    planner.advance(30);

    let notifications = planner.get_notifications();
    assert_eq!(notifications.len() as u64, JARS_COUNT);

    for notification in notifications {
        let settlement = planner.settle(&notification.id).await?;
        assert!(matches!(settlement, SettlementView::Deposited(_)));
    }

    let jars = planner.get_jars();
    let total = total_deposited(&jars);

    assert_eq!(context.chain.wallet_balance().await, 1_000_000 - total);
    assert!(jars.iter().map(|jar| &jar.contract_address).all_unique());

    Ok(total)
}

#[tokio::test]
async fn many_jars() -> anyhow::Result<()> {
    let cadences = [Cadence::Daily, Cadence::Weekly, Cadence::Monthly];

    let totals: Vec<_> = join_all(cadences.map(fill_wallet))
        .await
        .into_iter()
        .collect::<anyhow::Result<_>>()?;

    // Sum of 1..=20 per period.
    let per_period = (1..=u128::from(JARS_COUNT)).sum::<u128>();

    assert_eq!(totals, vec![per_period * 30, per_period * 4, per_period]);

    Ok(())
}
