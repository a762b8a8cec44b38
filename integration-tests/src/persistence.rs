use piggy_jar::config::PlannerConfig;
use piggy_jar_model::{
    api::{BillingApi, JarApi, NotificationApi, SessionApi},
    jar::{Cadence, DraftKind, JarDraft},
};

use crate::context::Context;

fn draft(name: &str) -> JarDraft {
    JarDraft {
        name: name.to_string(),
        target_amount: 300,
        recurring_amount: 10,
        cadence: Cadence::Weekly,
        kind: DraftKind::SimulatedOnly,
    }
}

pub(crate) async fn run() -> anyhow::Result<()> {
    tracing::info!("👷🏽 Run persistence test");

    let context = Context::new(0)?;
    let alice = Context::account("a11ce")?;
    let bob = Context::account("b0b")?;

    let (jars, notifications) = {
        let mut planner = context.planner()?;

        planner.create_jar(draft("First")).await?;
        planner.create_jar(draft("Second")).await?;
        planner.advance(15);

        (planner.get_jars(), planner.get_notifications())
    };

    assert_eq!(jars[0].name, "Second");

    let mut planner = context.planner()?;

    assert_eq!(planner.get_jars(), jars);
    assert_eq!(planner.get_notifications(), notifications);
    assert_eq!(planner.get_current_day(), 15);

    context.wallet.set_account(bob.clone());
    assert!(planner.connect()?.is_empty());

    planner.create_jar(draft("Bob's")).await?;

    context.wallet.set_account(alice);
    assert_eq!(planner.connect()?.len(), 2);

    planner.clear_jars()?;

    let mut planner = context.planner()?;
    assert!(planner.get_jars().is_empty());

    context.wallet.set_account(bob);
    assert_eq!(planner.connect()?[0].name, "Bob's");

    // Configuration round trips through its file format.
    let config_path = context.storage_dir().join("piggy-jar.toml");
    PlannerConfig::write_default(&config_path)?;
    assert_eq!(PlannerConfig::load_from(&config_path)?, PlannerConfig::default());

    Ok(())
}

#[tokio::test]
async fn persistence() -> anyhow::Result<()> {
    run().await
}
