//! Display Projection
//!
//! Pure derivation from a source's state to the short label shown in the
//! sidebar. Total over every variant; no side effects.

use super::state::SourceState;

/// Map a source state to its sidebar label.
pub fn render_feature_count(state: &SourceState) -> String {
    match state {
        SourceState::Pending => "Fetching...".to_string(),
        SourceState::Errored(_) => "ERROR".to_string(),
        SourceState::Loaded(payload) => {
            match payload.get("features").and_then(|f| f.as_array()) {
                Some(features) => format!("{} active", features.len()),
                None => "No data".to_string(),
            }
        }
    }
}
