use serde::Serialize;

use super::snapshot::FlagSnapshot;

/// What a flag looks like to a surface that cares about loading states.
/// Most callers collapse NotReady into their default via `resolve`; the
/// admin and targeting-demo views keep the three states apart so the
/// frontend can show a spinner instead of guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlagState {
    NotReady,
    Off,
    On,
}

/// Effective boolean for a flag: the snapshot value when present, the
/// caller's default otherwise. Pure, no I/O, unknown keys are never errors.
pub fn resolve(key: &str, snapshot: &FlagSnapshot, default: bool) -> bool {
    snapshot.value(key).unwrap_or(default)
}

/// Tri-state view of the same lookup. `ready` comes from the readiness
/// gate; while it is false every key reports NotReady.
pub fn resolve_state(key: &str, snapshot: &FlagSnapshot, ready: bool, default: bool) -> FlagState {
    if !ready {
        return FlagState::NotReady;
    }
    if resolve(key, snapshot, default) {
        FlagState::On
    } else {
        FlagState::Off
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn snapshot_of(pairs: &[(&str, bool)]) -> FlagSnapshot {
        let mut values = HashMap::new();
        for (k, v) in pairs {
            values.insert(k.to_string(), *v);
        }
        FlagSnapshot::new(values)
    }

    #[test]
    fn test_present_key_wins_over_default() {
        let snap = snapshot_of(&[("show-admin-page", false)]);
        assert!(!resolve("show-admin-page", &snap, true));

        let snap = snapshot_of(&[("show-admin-page", true)]);
        assert!(resolve("show-admin-page", &snap, false));
    }

    #[test]
    fn test_absent_key_falls_back_to_default() {
        let snap = snapshot_of(&[]);
        assert!(resolve("unknown-flag", &snap, true));
        assert!(!resolve("unknown-flag", &snap, false));
    }

    #[test]
    fn test_state_reports_not_ready_before_gate_opens() {
        let snap = snapshot_of(&[("show-jobs-page", true)]);
        assert_eq!(
            resolve_state("show-jobs-page", &snap, false, false),
            FlagState::NotReady
        );
    }

    #[test]
    fn test_state_once_ready() {
        let snap = snapshot_of(&[("show-jobs-page", true)]);
        assert_eq!(
            resolve_state("show-jobs-page", &snap, true, false),
            FlagState::On
        );
        assert_eq!(
            resolve_state("show-admin-page", &snap, true, false),
            FlagState::Off
        );
        // absent key, ready gate: default decides on vs off
        assert_eq!(
            resolve_state("enable-csv-import", &snap, true, true),
            FlagState::On
        );
    }
}
