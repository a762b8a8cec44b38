use piggy_jar_model::{Address, JarError};
use rand::{distributions::Alphanumeric, Rng};

use crate::{jar::model::Jar, Planner};

const ID_LENGTH: usize = 10;

impl Planner {
    pub(crate) fn connected_identity(&self) -> Result<&Address, JarError> {
        self.identity.as_ref().ok_or(JarError::NotConnected)
    }

    pub(crate) fn get_jar_internal(&self, jar_id: &str) -> Result<&Jar, JarError> {
        self.jars
            .iter()
            .find(|jar| jar.id == jar_id)
            .ok_or_else(|| JarError::JarNotFound(jar_id.to_owned()))
    }

    pub(crate) fn get_jar_mut_internal(&mut self, jar_id: &str) -> Result<&mut Jar, JarError> {
        self.jars
            .iter_mut()
            .find(|jar| jar.id == jar_id)
            .ok_or_else(|| JarError::JarNotFound(jar_id.to_owned()))
    }

    /// Writes the jar list of the connected identity. Does nothing while disconnected.
    pub(crate) fn save_jars(&mut self) {
        if let Some(identity) = &self.identity {
            self.store.save(identity.as_str(), &self.jars);
        }
    }

    pub(crate) fn save_billing_state(&mut self) {
        self.store.save_clock(&self.clock);
        self.store.save_notifications(&self.notifications);
    }

    pub(crate) fn generate_id() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(ID_LENGTH)
            .map(|c| char::from(c).to_ascii_lowercase())
            .collect()
    }
}
