use sync_logging::sync_warn;

use crate::CanonicalState;

pub const FALLBACK_ERROR: &str = "Unable to reconstitute view state";

/// State used when no usable snapshot reached the UI context.
pub fn fallback_state() -> CanonicalState {
    CanonicalState {
        multiplicand: "0".to_string(),
        multiplier: "0".to_string(),
        product: 0.0,
        error: Some(FALLBACK_ERROR.to_string()),
    }
}

/// Rebuilds the starting state from embedded snapshot text.
///
/// Never fails: absent, blank or unparsable text yields [`fallback_state`].
pub fn reconstitute(raw: Option<&str>) -> CanonicalState {
    let Some(text) = raw.map(str::trim).filter(|text| !text.is_empty()) else {
        return fallback_state();
    };
    match serde_json::from_str(text) {
        Ok(state) => state,
        Err(err) => {
            sync_warn!("Discarding unparsable snapshot: {}", err);
            fallback_state()
        }
    }
}
