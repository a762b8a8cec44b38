use piggy_jar_model::{api::SessionApi, jar::JarView, Address, JarError};

use crate::{
    event::{emit, EventKind},
    Planner,
};

impl SessionApi for Planner {
    fn connect(&mut self) -> Result<Vec<JarView>, JarError> {
        let identity = match self.wallet.account().map(|account| account.parse::<Address>()) {
            Some(Ok(identity)) => identity,
            Some(Err(err)) => {
                tracing::warn!("Wallet reported a malformed account: {err}");
                self.disconnect();
                return Err(JarError::NotConnected);
            }
            None => {
                self.disconnect();
                return Err(JarError::NotConnected);
            }
        };

        self.jars = self.store.load(identity.as_str());

        tracing::info!("Connected {identity} with {} jar(s)", self.jars.len());

        self.identity = Some(identity);

        Ok(self.jars.iter().map(Into::into).collect())
    }

    fn disconnect(&mut self) {
        self.identity = None;
        self.jars.clear();
    }

    fn clear_jars(&mut self) -> Result<(), JarError> {
        let identity = self.connected_identity()?.clone();

        self.store.clear(identity.as_str());
        self.jars.clear();

        emit(EventKind::ClearJars(identity));

        Ok(())
    }
}
