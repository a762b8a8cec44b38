use piggy_jar_model::{
    jar::{Cadence, JarKind, JarStatus},
    Address, Day, TokenAmount,
};

use crate::{common::testing::accounts::token, jar::model::Jar};

pub(crate) const TARGET: TokenAmount = 100;
pub(crate) const RECURRING: TokenAmount = 10;

pub(crate) enum JarField {
    Cadence(Cadence),
    Target(TokenAmount),
    Recurring(TokenAmount),
    Deposited(TokenAmount),
    LastPaidDay(Day),
    Status(JarStatus),
    /// Native coin jar deployed at the given address.
    NativeCoin(Address),
    /// Token jar deployed at the given address.
    Token(Address),
    Locked,
}

pub(crate) trait JarBuilder: Sized {
    fn apply(&self, jar: Jar) -> Jar;

    /// Simulated weekly jar with a target of `TARGET` and `RECURRING` per period.
    fn build(&self, id: &str) -> Jar {
        let jar = Jar::create(
            id.to_owned(),
            format!("Jar {id}"),
            JarKind::SimulatedOnly,
            Cadence::Weekly,
            TARGET,
            RECURRING,
            None,
        );
        self.apply(jar)
    }
}

impl JarBuilder for () {
    fn apply(&self, jar: Jar) -> Jar {
        jar
    }
}

impl JarBuilder for JarField {
    fn apply(&self, mut jar: Jar) -> Jar {
        match self {
            JarField::Cadence(cadence) => jar.cadence = *cadence,
            JarField::Target(amount) => jar.target_amount = *amount,
            JarField::Recurring(amount) => jar.recurring_amount = *amount,
            JarField::Deposited(amount) => jar.deposited_amount = *amount,
            JarField::LastPaidDay(day) => jar.last_period_paid_day = Some(*day),
            JarField::Status(status) => jar.status = *status,
            JarField::NativeCoin(address) => {
                jar.kind = JarKind::NativeCoin;
                jar.contract_address = Some(address.clone());
            }
            JarField::Token(address) => {
                jar.kind = JarKind::FungibleToken { token: token() };
                jar.contract_address = Some(address.clone());
            }
            JarField::Locked => jar.lock(),
        }
        jar
    }
}

impl<const SIZE: usize> JarBuilder for [JarField; SIZE] {
    fn apply(&self, jar: Jar) -> Jar {
        let mut jar = jar;
        for j in self {
            jar = j.apply(jar)
        }
        jar
    }
}

/// Address a test jar contract is "deployed" at.
pub(crate) fn contract(index: u8) -> Address {
    format!("0x{:040x}", 0xc0de_0000_u64 + u64::from(index)).parse().unwrap()
}
