//! Profile detection against the live outputs
//!
//! A profile is **exact** when every saved display sits on the output it was
//! saved on and nothing else is connected. A profile that does not pin
//! displays to outputs (`match_outputs = false`) is still **partial** when the
//! same displays are connected through different outputs.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::config::{Profile, Profiles};
use crate::display::Output;

/// Confidence of a detection, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchStrength {
    Exact,
    Partial,
}

/// Detected profiles by name; undetected profiles are absent
pub type Detected = BTreeMap<String, MatchStrength>;

/// Evaluate one profile against the outputs
pub fn match_profile(profile: &Profile, outputs: &[Output]) -> Option<MatchStrength> {
    let expected: BTreeSet<(&str, String)> = profile
        .displays
        .iter()
        .map(|(label, display)| (label.as_str(), profile.identity_of(display)))
        .collect();
    let live: BTreeSet<(&str, String)> = outputs
        .iter()
        .filter(|output| output.connected)
        .map(|output| (output.name.as_str(), profile.identity_of(&output.display)))
        .collect();

    if expected == live {
        return Some(MatchStrength::Exact);
    }
    if profile.match_outputs {
        return None;
    }

    // Displays may have moved between outputs: compare identities as multisets
    let mut expected_ids: Vec<String> = profile
        .displays
        .values()
        .map(|display| profile.identity_of(display))
        .collect();
    let mut live_ids: Vec<String> = outputs
        .iter()
        .filter(|output| output.connected)
        .map(|output| profile.identity_of(&output.display))
        .collect();
    expected_ids.sort();
    live_ids.sort();

    (expected_ids == live_ids).then_some(MatchStrength::Partial)
}

/// Detect every profile matching the outputs
pub fn detect(profiles: &Profiles, outputs: &[Output]) -> Detected {
    profiles
        .iter()
        .filter_map(|(name, profile)| {
            let strength = match_profile(profile, outputs)?;
            debug!(profile = %name, ?strength, "profile detected");
            Some((name.clone(), strength))
        })
        .collect()
}

/// Pick the single best detection: exact before partial, then by name
pub fn best(detected: &Detected) -> Option<(&str, MatchStrength)> {
    detected
        .iter()
        .min_by(|(a_name, a), (b_name, b)| a.cmp(b).then_with(|| a_name.cmp(b_name)))
        .map(|(name, strength)| (name.as_str(), *strength))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::Display;
    use crate::edid::tests::sample_edid;

    fn monitor(name: &str, serial: u32) -> Display {
        Display::new(sample_edid(Some(name), None, serial))
    }

    fn connected(label: &str, display: Display) -> Output {
        Output::new(label, true, display)
    }

    fn desk_outputs() -> Vec<Output> {
        vec![
            connected("DP-1", monitor("Monitor-A", 1)),
            connected("HDMI-1", monitor("Monitor-B", 2)),
            Output::new("HDMI-2", false, Display::default()),
        ]
    }

    fn swapped_outputs() -> Vec<Output> {
        vec![
            connected("DP-1", monitor("Monitor-B", 2)),
            connected("HDMI-1", monitor("Monitor-A", 1)),
        ]
    }

    #[test]
    fn test_match_is_reflexive() {
        for (serial, match_outputs) in [(false, false), (false, true), (true, false), (true, true)] {
            let profile = Profile::from_outputs(&desk_outputs(), serial, match_outputs);
            assert_eq!(match_profile(&profile, &desk_outputs()), Some(MatchStrength::Exact));
        }
    }

    #[test]
    fn test_swap_is_partial_when_outputs_not_matched() {
        let profile = Profile::from_outputs(&desk_outputs(), false, false);
        assert_eq!(match_profile(&profile, &swapped_outputs()), Some(MatchStrength::Partial));
    }

    #[test]
    fn test_swap_is_undetected_when_outputs_matched() {
        let profile = Profile::from_outputs(&desk_outputs(), false, true);
        assert_eq!(match_profile(&profile, &swapped_outputs()), None);
    }

    #[test]
    fn test_extra_monitor_is_undetected() {
        let profile = Profile::from_outputs(&desk_outputs(), false, false);
        let mut outputs = desk_outputs();
        outputs.push(connected("DP-2", monitor("Monitor-C", 3)));
        assert_eq!(match_profile(&profile, &outputs), None);
    }

    #[test]
    fn test_serial_policy_distinguishes_identical_models() {
        let saved = vec![connected("DP-1", monitor("Monitor-A", 1))];
        let twin = vec![connected("DP-1", monitor("Monitor-A", 2))];

        let by_name = Profile::from_outputs(&saved, false, false);
        let by_serial = Profile::from_outputs(&saved, true, false);
        assert_eq!(match_profile(&by_name, &twin), Some(MatchStrength::Exact));
        assert_eq!(match_profile(&by_serial, &twin), None);
    }

    #[test]
    fn test_multiset_counts_duplicate_models() {
        let two = vec![
            connected("DP-1", monitor("Monitor-A", 1)),
            connected("DP-2", monitor("Monitor-A", 2)),
        ];
        let one = vec![connected("DP-3", monitor("Monitor-A", 1))];
        let profile = Profile::from_outputs(&two, false, false);
        assert_eq!(match_profile(&profile, &one), None);
    }

    #[test]
    fn test_detect_and_best_prefer_exact_then_name() {
        let mut profiles = Profiles::new();
        profiles.insert("b-exact".to_string(), Profile::from_outputs(&swapped_outputs(), false, false));
        profiles.insert("a-partial".to_string(), Profile::from_outputs(&desk_outputs(), false, false));
        profiles.insert("c-exact".to_string(), Profile::from_outputs(&swapped_outputs(), false, true));
        profiles.insert("d-strict".to_string(), Profile::from_outputs(&desk_outputs(), false, true));

        let detected = detect(&profiles, &swapped_outputs());
        assert_eq!(detected.get("a-partial"), Some(&MatchStrength::Partial));
        assert_eq!(detected.get("b-exact"), Some(&MatchStrength::Exact));
        assert_eq!(detected.get("c-exact"), Some(&MatchStrength::Exact));
        assert!(!detected.contains_key("d-strict"));

        assert_eq!(best(&detected), Some(("b-exact", MatchStrength::Exact)));
    }

    #[test]
    fn test_best_falls_back_to_partial() {
        let mut detected = Detected::new();
        detected.insert("zeta".to_string(), MatchStrength::Partial);
        detected.insert("alpha".to_string(), MatchStrength::Partial);
        assert_eq!(best(&detected), Some(("alpha", MatchStrength::Partial)));
        assert_eq!(best(&Detected::new()), None);
    }

    #[test]
    fn test_no_connected_outputs_matches_empty_profile() {
        let profile = Profile::default();
        let outputs = vec![Output::new("HDMI-1", false, Display::default())];
        assert_eq!(match_profile(&profile, &outputs), Some(MatchStrength::Exact));
    }
}
