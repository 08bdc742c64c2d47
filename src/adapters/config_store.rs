//! In-memory configuration store.
//!
//! Mirrors a flash key/value record: the config is kept as one `postcard`
//! blob, so a store handed to the controller behaves like persisted
//! settings (including corruption on a bad blob) without touching disk.

use std::cell::RefCell;

use log::info;

use crate::app::ports::ConfigPort;
use crate::config::ControllerConfig;
use crate::error::ConfigError;

#[derive(Debug, Default)]
pub struct BlobConfigStore {
    blob: RefCell<Option<Vec<u8>>>,
}

impl BlobConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with a raw record.
    pub fn with_blob(bytes: Vec<u8>) -> Self {
        Self {
            blob: RefCell::new(Some(bytes)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.blob.borrow().is_none()
    }

    pub fn erase(&self) {
        self.blob.borrow_mut().take();
    }
}

impl ConfigPort for BlobConfigStore {
    fn load(&self) -> Result<ControllerConfig, ConfigError> {
        match self.blob.borrow().as_deref() {
            Some(bytes) => {
                let config: ControllerConfig =
                    postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
                info!("BlobConfigStore: loaded config");
                Ok(config)
            }
            None => {
                info!("BlobConfigStore: no stored config, using defaults");
                Ok(ControllerConfig::default())
            }
        }
    }

    fn save(&self, config: &ControllerConfig) -> Result<(), ConfigError> {
        config.validate()?;
        let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
        *self.blob.borrow_mut() = Some(bytes);
        info!("BlobConfigStore: config saved");
        Ok(())
    }
}
