use log::{debug, warn};

use crate::panel::PanelId;
use crate::store::KeyValueStore;

/// Storage key holding the focused panel
pub const FOCUS_KEY: &str = "focused";

/// Persists which panel is focused, if any, across restarts.
///
/// Focus is a convenience: read failures fall back to no focus and write
/// failures are logged and dropped.
#[derive(Debug, Clone)]
pub struct FocusStore {
    store: KeyValueStore,
}

impl FocusStore {
    pub fn new(store: KeyValueStore) -> Self {
        FocusStore { store }
    }

    pub fn restore(&self) -> Option<PanelId> {
        let raw = match self.store.get(FOCUS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read saved focus: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Option<PanelId>>(&raw) {
            Ok(focused) => focused,
            Err(e) => {
                debug!("Ignoring unreadable saved focus {:?}: {}", raw, e);
                None
            }
        }
    }

    pub fn persist(&self, focused: Option<PanelId>) {
        let encoded = match serde_json::to_string(&focused) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!("Could not encode focus: {}", e);
                return;
            }
        };

        if let Err(e) = self.store.set(FOCUS_KEY, &encoded) {
            warn!("Could not save focus: {}", e);
        }
    }
}
