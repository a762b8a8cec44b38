use itertools::Itertools;
use piggy_jar_model::{
    api::{BillingApi, JarApi, NotificationApi},
    jar::{Cadence, JarStatus},
    settlement::{DepositOutcome, SettlementView},
    Address, ExternalError, JarError,
};
use rstest::rstest;

use crate::{
    common::testing::{accounts::alice, Context, ExecutorCall},
    event::{EventKind, SettleData},
    test_builder::{contract, JarBuilder, JarField, RECURRING},
};

fn notification_for(context: &mut Context, jar_id: &str) -> String {
    context
        .planner()
        .get_notifications()
        .into_iter()
        .find(|notification| notification.jar_id == jar_id)
        .map(|notification| notification.id)
        .unwrap()
}

#[rstest]
#[tokio::test]
async fn settle_on_chain_jar(alice: Address) {
    let jar = [JarField::NativeCoin(contract(0)), JarField::LastPaidDay(0)].build("chain");
    let mut context = Context::new(alice).with_jars(&[jar]);

    context.planner().advance(21);
    let id = notification_for(&mut context, "chain");

    let settlement = context.planner().settle(&id).await.unwrap();

    let SettlementView::Deposited(deposit) = settlement else {
        panic!("Expected a deposit, got {settlement:?}");
    };

    assert_eq!(deposit.amount.0, RECURRING * 3);
    assert_eq!(deposit.outcome, DepositOutcome::Filling);
    assert_eq!(deposit.jar.deposited_amount.0, RECURRING * 3);
    assert!(context.planner().get_notifications().is_empty());
    assert_eq!(context.executor.calls(), vec![ExecutorCall::Deposit(contract(0), RECURRING * 3)]);

    assert_eq!(
        context.get_events().last(),
        Some(&EventKind::SettleNotification(SettleData {
            notification_id: id,
            jar_id: "chain".to_string(),
            periods: 3,
            manual: false,
        }))
    );
}

#[rstest]
#[tokio::test]
async fn failed_settlement_keeps_notification(alice: Address) {
    let jar = [JarField::Token(contract(0)), JarField::LastPaidDay(0)].build("chain");
    let mut context = Context::new(alice).with_jars(&[jar]);

    context.planner().advance(7);
    let id = notification_for(&mut context, "chain");

    context.executor.fail_deposit(true);

    let result = context.planner().settle(&id).await;

    assert!(matches!(result, Err(JarError::External(ExternalError::Network(_)))));
    assert_eq!(context.planner().get_notifications()[0].id, id);
    assert_eq!(context.jar("chain").deposited_amount, 0);
    assert!(!context.jar("chain").is_pending_settlement);

    // Periods of the failed settlement are still owed after the next jump.
    context.planner().advance(7);
    let notifications = context.planner().get_notifications();

    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].periods_due, 2);

    context.executor.fail_deposit(false);
    context.planner().settle(&notifications[0].id).await.unwrap();

    assert_eq!(context.jar("chain").deposited_amount, RECURRING * 2);
}

#[rstest]
#[tokio::test]
async fn settle_simulated_jar_requests_one_payment(alice: Address) {
    let jar = [JarField::Cadence(Cadence::Daily), JarField::LastPaidDay(0)].build("sim");
    let mut context = Context::new(alice).with_jars(&[jar]);

    context.planner().advance(5);
    let id = notification_for(&mut context, "sim");

    let settlement = context.planner().settle(&id).await.unwrap();

    assert_eq!(
        settlement,
        SettlementView::ManualPaymentRequested {
            jar_id: "sim".to_string(),
            amount: RECURRING.into(),
        }
    );
    assert!(context.planner().get_notifications().is_empty());
    assert_eq!(context.jar("sim").deposited_amount, 0);
    assert!(context.executor.calls().is_empty());

    context.planner().confirm_manual_payment("sim").await.unwrap();
    assert_eq!(context.jar("sim").deposited_amount, RECURRING);
}

#[rstest]
#[tokio::test]
async fn settle_discards_unpayable_notifications(alice: Address) {
    let mut context = Context::new(alice).with_jars(&[
        JarField::LastPaidDay(0).build("gone"),
        JarField::LastPaidDay(0).build("filled"),
        [JarField::Token(contract(0)), JarField::LastPaidDay(0)].build("no_address"),
    ]);

    context.planner().advance(7);

    let gone = notification_for(&mut context, "gone");
    let filled = notification_for(&mut context, "filled");
    let no_address = notification_for(&mut context, "no_address");

    context.planner().jars.retain(|jar| jar.id != "gone");
    context.planner().jars[0].status = JarStatus::Filled;
    context.planner().jars[1].contract_address = None;

    for id in [gone, filled, no_address] {
        assert_eq!(context.planner().settle(&id).await, Ok(SettlementView::Discarded));
    }

    assert!(context.planner().get_notifications().is_empty());
    assert!(context.executor.calls().is_empty());
    assert_eq!(
        context.planner().settle("unknown").await,
        Err(JarError::NotificationNotFound("unknown".to_string()))
    );
}

#[rstest]
#[tokio::test]
async fn settle_busy_jar(alice: Address) {
    let jar = [JarField::NativeCoin(contract(0)), JarField::LastPaidDay(0)].build("chain");
    let mut context = Context::new(alice).with_jars(&[jar]);

    context.planner().advance(7);
    let id = notification_for(&mut context, "chain");

    context.planner().jars[0].lock();

    assert_eq!(
        context.planner().settle(&id).await,
        Err(JarError::SettlementInProgress("chain".to_string()))
    );
    assert_eq!(context.planner().get_notifications().len(), 1);
    assert!(context.executor.calls().is_empty());
}

#[rstest]
#[tokio::test]
async fn settlement_can_fill_and_break_jar(alice: Address) {
    let jar = [
        JarField::NativeCoin(contract(0)),
        JarField::LastPaidDay(0),
        JarField::Deposited(80),
    ]
    .build("chain");
    let mut context = Context::new(alice).with_jars(&[jar]);

    context.planner().advance(14);
    let id = notification_for(&mut context, "chain");

    let SettlementView::Deposited(deposit) = context.planner().settle(&id).await.unwrap() else {
        panic!("Expected a deposit");
    };

    assert_eq!(deposit.outcome, DepositOutcome::FilledAndBroken);
    assert_eq!(deposit.jar.status, JarStatus::Broken);
    assert!(context.planner().get_notifications().is_empty());

    // Broken jars are not billed anymore.
    assert!(context.planner().advance(30).due.is_empty());
}

#[rstest]
fn dismiss_leaves_jar_untouched(alice: Address) {
    let jar = [JarField::LastPaidDay(0), JarField::Deposited(40)].build("jar");
    let mut context = Context::new(alice).with_jars(&[jar]);

    context.planner().advance(7);
    let before = context.jar("jar");
    let id = notification_for(&mut context, "jar");

    context.planner().dismiss(&id).unwrap();

    let after = context.jar("jar");

    assert_eq!(after.deposited_amount, before.deposited_amount);
    assert_eq!(after.status, before.status);
    assert!(context.planner().get_notifications().is_empty());
    assert_eq!(context.get_events().last(), Some(&EventKind::DismissNotification(id.clone())));

    assert_eq!(
        context.planner().dismiss(&id),
        Err(JarError::NotificationNotFound(id))
    );

    // Dismissed periods are consumed from the schedule.
    assert!(context.planner().advance(6).due.is_empty());
}

#[rstest]
fn one_notification_per_jar(alice: Address) {
    let jars: Vec<_> = (0..10).map(|index| ().build(&format!("jar_{index}"))).collect();
    let mut context = Context::new(alice).with_jars(&jars);

    for days in [3, 7, 30, 1, 60] {
        context.planner().advance(days);

        let notifications = context.planner().get_notifications();

        assert!(notifications.iter().map(|notification| &notification.jar_id).all_unique());
        assert!(notifications.iter().map(|notification| &notification.id).all_unique());
    }

    assert_eq!(context.planner().get_notifications().len(), jars.len());
}
