//! OS keychain storage for the Gemini API key.

use keyring::Entry;
use tracing::{info, warn};

use crate::error::FinLensError;

const SERVICE: &str = "finlens";
const ACCOUNT: &str = "gemini";

fn entry() -> Result<Entry, FinLensError> {
    Entry::new(SERVICE, ACCOUNT).map_err(|e| {
        warn!("Failed to create keyring entry: {}", e);
        FinLensError::Keychain(e.to_string())
    })
}

pub fn set_api_key(key: &str) -> Result<(), FinLensError> {
    info!("Storing API key in OS keychain");
    entry()?.set_password(key).map_err(|e| {
        warn!("Failed to store API key: {}", e);
        FinLensError::Keychain(e.to_string())
    })
}

pub fn get_api_key() -> Result<Option<String>, FinLensError> {
    match entry()?.get_password() {
        Ok(password) => Ok(Some(password)),
        Err(keyring::Error::NoEntry) => {
            info!("No API key in keychain");
            Ok(None)
        }
        Err(e) => {
            warn!("Failed to read API key: {}", e);
            Err(FinLensError::Keychain(e.to_string()))
        }
    }
}

pub fn delete_api_key() -> Result<(), FinLensError> {
    info!("Deleting API key from OS keychain");
    match entry()?.delete_credential() {
        Ok(()) => Ok(()),
        // Deleting an absent key is a no-op, so `key delete` is idempotent.
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => {
            warn!("Failed to delete API key: {}", e);
            Err(FinLensError::Keychain(e.to_string()))
        }
    }
}
