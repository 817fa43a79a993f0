//! Device capability probe.

use serde_json::Value;
use tracing::debug;
use voice_skill_common::envelope::RequestEnvelope;

/// Interface a device declares when it can render presentation documents.
pub const APL_INTERFACE: &str = "Alexa.Presentation.APL";

/// Whether the invoking device can render a visual/video presentation.
///
/// Walks context → System → device → supportedInterfaces → APL flag and
/// answers `false` as soon as a link is missing. A present flag counts only
/// if it is truthy (not `null`, `false`, `0` or `""`).
pub fn supports_display(envelope: &RequestEnvelope) -> bool {
    let supported = envelope
        .supported_interfaces()
        .and_then(|interfaces| interfaces.get(APL_INTERFACE))
        .is_some_and(is_truthy);

    debug!(supported, "Probed presentation capability");
    supported
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn envelope(value: Value) -> RequestEnvelope {
        serde_json::from_value(value).unwrap()
    }

    fn with_interfaces(interfaces: Value) -> RequestEnvelope {
        envelope(json!({
            "context": {"System": {"device": {"supportedInterfaces": interfaces}}},
            "request": {"type": "LaunchRequest"}
        }))
    }

    #[test]
    fn test_apl_device_is_supported() {
        let env = with_interfaces(json!({
            "Alexa.Presentation.APL": {"runtime": {"maxVersion": "2022.1"}}
        }));
        assert!(supports_display(&env));
    }

    #[test]
    fn test_audio_only_device_is_not_supported() {
        let env = with_interfaces(json!({"AudioPlayer": {}}));
        assert!(!supports_display(&env));
    }

    #[test]
    fn test_falsy_flag_is_not_supported() {
        for flag in [json!(null), json!(false), json!(0), json!("")] {
            let env = with_interfaces(json!({ "Alexa.Presentation.APL": flag.clone() }));
            assert!(!supports_display(&env), "flag {} should not count", flag);
        }
    }

    #[test]
    fn test_truthy_scalar_flag_is_supported() {
        for flag in [json!(true), json!(1), json!("yes"), json!([])] {
            let env = with_interfaces(json!({ "Alexa.Presentation.APL": flag.clone() }));
            assert!(supports_display(&env), "flag {} should count", flag);
        }
    }

    /// Build an envelope whose metadata chain stops after `depth` links.
    fn truncated_envelope(depth: usize) -> RequestEnvelope {
        let leaf = json!({"AudioPlayer": {}});
        let chain = match depth {
            0 => json!({"request": {"type": "LaunchRequest"}}),
            1 => json!({"context": {}, "request": {"type": "LaunchRequest"}}),
            2 => json!({"context": {"System": {}}, "request": {"type": "LaunchRequest"}}),
            3 => json!({"context": {"System": {"device": {}}}, "request": {"type": "LaunchRequest"}}),
            _ => json!({
                "context": {"System": {"device": {"supportedInterfaces": leaf}}},
                "request": {"type": "LaunchRequest"}
            }),
        };
        envelope(chain)
    }

    /// Same truncation, but the missing link is an explicit `null`.
    fn null_link_envelope(depth: usize) -> RequestEnvelope {
        let chain = match depth {
            0 => json!({"context": null, "request": {"type": "IntentRequest"}}),
            1 => json!({"context": {"System": null}, "request": {"type": "IntentRequest"}}),
            2 => json!({"context": {"System": {"device": null}}, "request": {"type": "IntentRequest"}}),
            _ => json!({
                "context": {"System": {"device": {"supportedInterfaces": null}}},
                "request": {"type": "IntentRequest"}
            }),
        };
        envelope(chain)
    }

    proptest! {
        /// Metadata missing at any level of nesting never reports support.
        #[test]
        fn truncated_metadata_is_not_supported(depth in 0usize..5) {
            prop_assert!(!supports_display(&truncated_envelope(depth)));
        }

        /// Explicit nulls anywhere in the chain never report support.
        #[test]
        fn null_links_are_not_supported(depth in 0usize..4) {
            prop_assert!(!supports_display(&null_link_envelope(depth)));
        }

        /// Other interfaces never stand in for the presentation flag.
        #[test]
        fn unrelated_interfaces_are_not_supported(
            names in prop::collection::vec("[A-Z][a-zA-Z]{2,12}(\\.[A-Z][a-zA-Z]{2,12}){0,2}", 0..6)
        ) {
            let mut interfaces = serde_json::Map::new();
            for name in names.into_iter().filter(|n| n != APL_INTERFACE) {
                interfaces.insert(name, json!({}));
            }
            let env = with_interfaces(Value::Object(interfaces));
            prop_assert!(!supports_display(&env));
        }
    }
}
