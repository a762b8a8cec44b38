use piggy_jar_model::{jar::JarStatus, JarError, TokenAmount};

use crate::jar::model::Jar;

pub(crate) fn assert_positive_amount(amount: TokenAmount) -> Result<(), JarError> {
    if amount == 0 {
        return Err(JarError::InvalidAmount);
    }

    Ok(())
}

pub(crate) fn assert_filling(jar: &Jar) -> Result<(), JarError> {
    if jar.status != JarStatus::Filling {
        return Err(JarError::JarNotFilling(jar.id.clone()));
    }

    Ok(())
}

pub(crate) fn assert_not_broken(jar: &Jar) -> Result<(), JarError> {
    if jar.status == JarStatus::Broken {
        return Err(JarError::JarAlreadyBroken(jar.id.clone()));
    }

    Ok(())
}

pub(crate) fn assert_not_locked(jar: &Jar) -> Result<(), JarError> {
    if jar.is_pending_settlement {
        return Err(JarError::SettlementInProgress(jar.id.clone()));
    }

    Ok(())
}
