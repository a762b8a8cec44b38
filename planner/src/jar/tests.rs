#![cfg(test)]

use fake::Fake;
use piggy_jar_model::{
    api::{JarApi, SessionApi},
    jar::{Cadence, DraftKind, JarDraft, JarKind, JarStatus},
    settlement::DepositOutcome,
    Address, ExternalError, JarError, TokenAmount,
};
use rstest::rstest;

use crate::{
    common::testing::{
        accounts::{alice, token},
        Context, ExecutorCall,
    },
    event::EventKind,
    external::{ContractKind, DeployArgs, WalletConnector},
    test_builder::{contract, JarBuilder, JarField, RECURRING, TARGET},
};

fn draft(kind: DraftKind) -> JarDraft {
    JarDraft {
        name: "Holidays".to_string(),
        target_amount: 1_000,
        recurring_amount: 50,
        cadence: Cadence::Monthly,
        kind,
    }
}

#[rstest]
#[tokio::test]
async fn create_simulated_jar(alice: Address) {
    let mut context = Context::new(alice).with_jars(&[().build("old")]);

    let jar = context.planner().create_jar(draft(DraftKind::SimulatedOnly)).await.unwrap();

    assert_eq!(jar.status, JarStatus::Filling);
    assert_eq!(jar.deposited_amount.0, 0);
    assert_eq!(jar.last_period_paid_day, None);
    assert_eq!(jar.contract_address, None);
    assert!(context.executor.calls().is_empty());

    let ids: Vec<_> = context.planner().get_jars().into_iter().map(|jar| jar.id).collect();
    assert_eq!(ids, vec![jar.id.clone(), "old".to_string()]);

    let mut reopened = context.reopen();
    assert_eq!(reopened.connect().unwrap()[0], jar);

    assert!(matches!(
        context.get_events().last(),
        Some(EventKind::CreateJar(data)) if data.id == jar.id && data.contract_address.is_none()
    ));
}

#[rstest]
#[tokio::test]
async fn create_token_jar_switches_chain(alice: Address) {
    let mut context = Context::new(alice.clone());
    context.wallet.set_chain_id(1);

    let jar = context
        .planner()
        .create_jar(JarDraft {
            name: "  ".to_string(),
            ..draft(DraftKind::FungibleToken {
                token: token().to_string().to_uppercase().replace("0X", "0x"),
            })
        })
        .await
        .unwrap();

    assert_eq!(jar.name, "USDC Jar");
    assert_eq!(jar.kind, JarKind::FungibleToken { token: token() });
    assert_eq!(jar.contract_address, Some(format!("0x{:040x}", 1).parse().unwrap()));
    assert_eq!(context.wallet.chain_id(), context.planner().config().chain_id);

    assert_eq!(
        context.executor.calls(),
        vec![ExecutorCall::Deploy(
            ContractKind::TokenJar,
            DeployArgs {
                owner: alice,
                name: "USDC Jar".to_string(),
                target_amount: 1_000,
                recurring_amount: 50,
                cadence: Cadence::Monthly,
                token: Some(token()),
            }
        )]
    );
}

#[rstest]
#[tokio::test]
async fn create_jar_fails_without_side_effects(alice: Address) {
    let mut context = Context::new(alice);

    context.wallet.set_chain_id(1);
    context.wallet.reject_switch(true);

    let result = context.planner().create_jar(draft(DraftKind::NativeCoin)).await;

    assert!(matches!(result, Err(JarError::ChainSwitch { chain_id: 31, .. })));
    assert!(context.executor.calls().is_empty());

    context.wallet.reject_switch(false);
    context.executor.fail_deploy(true);

    let result = context.planner().create_jar(draft(DraftKind::NativeCoin)).await;

    assert_eq!(result, Err(JarError::External(ExternalError::MissingAddress)));
    assert!(context.planner().get_jars().is_empty());
    assert!(context.reopen().connect().unwrap().is_empty());
    assert!(context.get_events().is_empty());
}

#[rstest]
#[tokio::test]
async fn create_jar_validation(alice: Address) {
    let mut context = Context::new(alice);

    let result = context
        .planner()
        .create_jar(JarDraft {
            target_amount: 0,
            ..draft(DraftKind::SimulatedOnly)
        })
        .await;
    assert_eq!(result, Err(JarError::InvalidAmount));

    let result = context
        .planner()
        .create_jar(JarDraft {
            recurring_amount: 0,
            ..draft(DraftKind::SimulatedOnly)
        })
        .await;
    assert_eq!(result, Err(JarError::InvalidAmount));

    let result = context
        .planner()
        .create_jar(draft(DraftKind::FungibleToken {
            token: "0x1234".to_string(),
        }))
        .await;
    assert_eq!(result, Err(JarError::InvalidAddress("0x1234".to_string())));

    context.planner().disconnect();

    let result = context.planner().create_jar(draft(DraftKind::SimulatedOnly)).await;
    assert_eq!(result, Err(JarError::NotConnected));

    assert!(context.executor.calls().is_empty());
}

#[rstest]
#[tokio::test]
async fn deposit_into_simulated_jar(alice: Address) {
    let mut context = Context::new(alice).with_jars(&[JarField::Deposited(TARGET - RECURRING * 2).build("sim")]);

    let view = context.planner().deposit("sim", RECURRING).await.unwrap();
    assert_eq!(view.outcome, DepositOutcome::Filling);
    assert_eq!(view.jar.deposited_amount.0, TARGET - RECURRING);

    let view = context.planner().deposit("sim", RECURRING).await.unwrap();
    assert_eq!(view.outcome, DepositOutcome::Filled);
    assert_eq!(view.jar.status, JarStatus::Filled);
    assert_eq!(view.jar.deposited_amount.0, TARGET);

    assert!(context.executor.calls().is_empty());
    assert_eq!(
        context.planner().deposit("sim", 1).await,
        Err(JarError::JarNotFilling("sim".to_string()))
    );
}

#[rstest]
#[case::native_coin(JarField::NativeCoin(contract(0)))]
#[case::token(JarField::Token(contract(0)))]
#[tokio::test]
async fn filled_on_chain_jar_is_broken(alice: Address, #[case] kind: JarField) {
    let jar = [kind, JarField::Deposited(90)].build("goal");
    let mut context = Context::new(alice).with_jars(&[jar]);

    let view = context.planner().deposit("goal", 20).await.unwrap();

    assert_eq!(view.outcome, DepositOutcome::FilledAndBroken);
    assert_eq!(view.jar.status, JarStatus::Broken);
    assert_eq!(view.jar.deposited_amount.0, 0);
    assert!(!view.jar.is_pending_settlement);

    assert_eq!(
        context.executor.calls(),
        vec![ExecutorCall::Deposit(contract(0), 20), ExecutorCall::Withdraw(contract(0))]
    );
    assert_eq!(
        context.get_events(),
        vec![
            EventKind::Deposit(("goal".to_string(), 20.into())),
            EventKind::BreakJar("goal".to_string()),
        ]
    );

    let persisted = context.reopen().connect().unwrap();
    assert_eq!(persisted[0], view.jar);
}

#[rstest]
#[tokio::test]
async fn filled_jar_stays_filled_when_withdrawal_fails(alice: Address) {
    let jar = [JarField::NativeCoin(contract(0)), JarField::Deposited(90)].build("goal");
    let mut context = Context::new(alice).with_jars(&[jar]);
    context.executor.fail_withdraw(true);

    let view = context.planner().deposit("goal", 20).await.unwrap();

    assert!(matches!(view.outcome, DepositOutcome::BreakFailed { .. }));
    assert_eq!(view.jar.status, JarStatus::Filled);
    assert_eq!(view.jar.deposited_amount.0, 110);
    assert!(!view.jar.is_pending_settlement);

    // A filled jar can still be broken by hand.
    context.executor.fail_withdraw(false);
    let jar = context.planner().break_jar("goal").await.unwrap();

    assert_eq!(jar.status, JarStatus::Broken);
    assert_eq!(jar.deposited_amount.0, 0);
}

#[rstest]
#[tokio::test]
async fn failed_deposit_leaves_jar_untouched(alice: Address) {
    let jar = [JarField::NativeCoin(contract(0)), JarField::Deposited(30)].build("goal");
    let mut context = Context::new(alice).with_jars(&[jar.clone()]);
    context.executor.fail_deposit(true);

    let result = context.planner().deposit("goal", 10).await;

    assert!(matches!(result, Err(JarError::External(ExternalError::Network(_)))));
    assert_eq!(context.jar("goal"), jar);
    assert!(context.get_events().is_empty());
}

#[rstest]
#[tokio::test]
async fn deposit_validation(alice: Address) {
    let mut context = Context::new(alice).with_jars(&[
        ().build("filling"),
        JarField::Status(JarStatus::Broken).build("broken"),
        [JarField::NativeCoin(contract(0)), JarField::Locked].build("locked"),
    ]);

    assert_eq!(context.planner().deposit("filling", 0).await, Err(JarError::InvalidAmount));
    assert_eq!(
        context.planner().deposit("missing", 1).await,
        Err(JarError::JarNotFound("missing".to_string()))
    );
    assert_eq!(
        context.planner().deposit("broken", 1).await,
        Err(JarError::JarNotFilling("broken".to_string()))
    );
    assert_eq!(
        context.planner().deposit("locked", 1).await,
        Err(JarError::SettlementInProgress("locked".to_string()))
    );
    assert!(context.executor.calls().is_empty());

    context.planner().unlock_jar("locked").unwrap();
    assert!(!context.jar("locked").is_pending_settlement);

    context.planner().deposit("locked", 1).await.unwrap();
    assert_eq!(context.jar("locked").deposited_amount, 1);
}

#[rstest]
#[tokio::test]
async fn random_deposits_accumulate(alice: Address) {
    let target: TokenAmount = 1_000_000;
    let mut context = Context::new(alice).with_jars(&[JarField::Target(target).build("jar")]);

    let mut total = 0;

    while total < target {
        let amount: TokenAmount = (1..50_000).fake();
        let view = context.planner().deposit("jar", amount).await.unwrap();

        total += amount;

        assert_eq!(view.jar.deposited_amount.0, total);
    }

    assert_eq!(context.jar("jar").status, JarStatus::Filled);
}

#[rstest]
#[tokio::test]
async fn break_on_chain_jar(alice: Address) {
    let jar = [JarField::Token(contract(1)), JarField::Deposited(40)].build("goal");
    let mut context = Context::new(alice).with_jars(&[jar.clone()]);

    context.executor.fail_withdraw(true);

    let result = context.planner().break_jar("goal").await;

    assert!(matches!(result, Err(JarError::External(ExternalError::Rejected(_)))));
    assert_eq!(context.jar("goal"), jar);

    context.executor.fail_withdraw(false);

    let view = context.planner().break_jar("goal").await.unwrap();

    assert_eq!(view.status, JarStatus::Broken);
    assert_eq!(view.deposited_amount.0, 0);
    assert_eq!(
        context.planner().break_jar("goal").await,
        Err(JarError::JarAlreadyBroken("goal".to_string()))
    );
    assert_eq!(
        context.planner().deposit("goal", 1).await,
        Err(JarError::JarNotFilling("goal".to_string()))
    );
}

#[rstest]
#[tokio::test]
async fn confirm_manual_payment(alice: Address) {
    let mut context =
        Context::new(alice).with_jars(&[().build("sim"), JarField::NativeCoin(contract(0)).build("chain")]);

    let view = context.planner().confirm_manual_payment("sim").await.unwrap();

    assert_eq!(view.amount.0, RECURRING);
    assert_eq!(view.jar.deposited_amount.0, RECURRING);

    assert_eq!(
        context.planner().confirm_manual_payment("chain").await,
        Err(JarError::NotSimulated("chain".to_string()))
    );
}

#[rstest]
fn days_to_fill(alice: Address) {
    let mut context = Context::new(alice).with_jars(&[
        JarField::Deposited(30).build("weekly"),
        [JarField::Cadence(Cadence::Daily), JarField::Deposited(95)].build("daily"),
        [JarField::Status(JarStatus::Filled), JarField::Deposited(TARGET)].build("filled"),
        JarField::Status(JarStatus::Broken).build("broken"),
    ]);

    assert_eq!(context.planner().get_days_to_fill("weekly"), Ok(49));
    assert_eq!(context.planner().get_days_to_fill("daily"), Ok(1));
    assert_eq!(context.planner().get_days_to_fill("filled"), Ok(0));
    assert_eq!(
        context.planner().get_days_to_fill("broken"),
        Err(JarError::JarNotFilling("broken".to_string()))
    );
}
