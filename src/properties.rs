use serde::Deserialize;

/// Voice used when the host binds nothing.
pub const DEFAULT_VOICE: &str = "en-US-ChristopherNeural";

/// The full set of bound input values a host delivers on each update cycle.
///
/// The control treats this as an immutable snapshot: an update either adopts
/// the whole incoming set or none of it. Field-by-field comparison against
/// the cached snapshot decides whether an update cycle does any work at all,
/// because hosts also call update for unrelated reasons (container resizes,
/// metadata changes).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TriggerProperties {
    pub text: String,
    /// State string echoed back by the host; adopting it forcibly overwrites
    /// the cached machine state (the host's recovery path).
    pub state: String,
    pub subscription_key: String,
    pub region: String,
    pub language: String,
    pub voice: String,
    pub auto_speak: bool,
}

impl Default for TriggerProperties {
    fn default() -> Self {
        Self {
            text: String::new(),
            state: "waiting".to_string(),
            subscription_key: String::new(),
            region: String::new(),
            language: String::new(),
            voice: DEFAULT_VOICE.to_string(),
            auto_speak: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_an_unbound_control() {
        let props = TriggerProperties::default();
        assert_eq!(props.text, "");
        assert_eq!(props.state, "waiting");
        assert_eq!(props.voice, DEFAULT_VOICE);
        assert!(!props.auto_speak);
    }

    #[test]
    fn identical_snapshots_compare_equal() {
        let a = TriggerProperties {
            text: "Hello".into(),
            region: "westeurope".into(),
            ..Default::default()
        };
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn any_single_field_change_is_detected() {
        let base = TriggerProperties::default();

        let mut changed = base.clone();
        changed.text = "Hello".into();
        assert_ne!(base, changed);

        let mut changed = base.clone();
        changed.auto_speak = true;
        assert_ne!(base, changed);

        let mut changed = base.clone();
        changed.subscription_key = "key".into();
        assert_ne!(base, changed);
    }

    #[test]
    fn deserializes_from_host_payload() {
        let props: TriggerProperties = serde_json::from_str(
            r#"{
                "text": "Hello",
                "state": "waiting",
                "subscription_key": "secret",
                "region": "eastus",
                "language": "en-US",
                "voice": "en-US-ChristopherNeural",
                "auto_speak": true
            }"#,
        )
        .unwrap();
        assert_eq!(props.text, "Hello");
        assert!(props.auto_speak);
    }
}
