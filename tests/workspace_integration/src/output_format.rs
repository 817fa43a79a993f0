//! Output format tests.
//!
//! Every response the skill produces SHALL be a version "1.0" envelope whose
//! speech, when present, is a single SSML document and whose directives are
//! typed objects. Ended sessions answer with an empty response.

use serde_json::Value;

/// Validates the envelope around a response.
fn validate_envelope(envelope: &Value) -> Result<(), String> {
    if envelope["version"] != "1.0" {
        return Err(format!("Envelope version should be 1.0, got: {}", envelope["version"]));
    }
    if envelope.get("sessionAttributes").is_some_and(|a| !a.is_object()) {
        return Err("Session attributes should be an object".to_string());
    }
    match envelope.get("response") {
        Some(response) => validate_response(response),
        None => Err("Envelope should carry a response".to_string()),
    }
}

/// Validates a response body.
fn validate_response(response: &Value) -> Result<(), String> {
    let Some(body) = response.as_object() else {
        return Err("Response should be an object".to_string());
    };

    if let Some(speech) = body.get("outputSpeech") {
        validate_speech(speech)?;
    }

    if let Some(reprompt) = body.get("reprompt") {
        match reprompt.get("outputSpeech") {
            Some(speech) => validate_speech(speech)?,
            None => return Err("Reprompt should carry output speech".to_string()),
        }
        // A reprompt keeps the microphone open
        if body.get("shouldEndSession") == Some(&Value::Bool(true)) {
            return Err("Reprompt should not end the session".to_string());
        }
    }

    if let Some(directives) = body.get("directives") {
        let Some(directives) = directives.as_array() else {
            return Err("Directives should be an array".to_string());
        };
        for directive in directives {
            if !directive["type"].as_str().is_some_and(|t| !t.is_empty()) {
                return Err("Directive should have a type".to_string());
            }
        }
    }

    Ok(())
}

/// Validates one SSML output speech block.
fn validate_speech(speech: &Value) -> Result<(), String> {
    if speech["type"] != "SSML" {
        return Err(format!("Speech type should be SSML, got: {}", speech["type"]));
    }
    let Some(ssml) = speech["ssml"].as_str() else {
        return Err("Speech should have ssml text".to_string());
    };
    if !ssml.starts_with("<speak>") || !ssml.ends_with("</speak>") {
        return Err(format!("SSML should be wrapped in <speak>, got: {}", ssml));
    }
    if ssml.matches("<speak>").count() != 1 {
        return Err(format!("SSML should contain exactly one <speak>, got: {}", ssml));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use voice_skill_common::SkillConfig;
    use voice_skill_hello::hello_skill;

    fn respond(request: Value) -> Value {
        let skill = hello_skill(&SkillConfig::default()).unwrap();
        let out = skill.invoke_json(&request.to_string()).unwrap();
        serde_json::from_str(&out).unwrap()
    }

    #[test]
    fn test_validator_accepts_plain_speech() {
        let envelope = json!({
            "version": "1.0",
            "response": {"outputSpeech": {"type": "SSML", "ssml": "<speak>Hi</speak>"}}
        });
        assert!(validate_envelope(&envelope).is_ok());
    }

    #[test]
    fn test_validator_rejects_unwrapped_speech() {
        let envelope = json!({
            "version": "1.0",
            "response": {"outputSpeech": {"type": "SSML", "ssml": "Hi"}}
        });
        assert!(validate_envelope(&envelope).is_err());
    }

    #[test]
    fn test_validator_rejects_nested_speak() {
        let speech = json!({"type": "SSML", "ssml": "<speak><speak>Hi</speak></speak>"});
        assert!(validate_speech(&speech).is_err());
    }

    #[test]
    fn test_validator_rejects_reprompt_that_ends_session() {
        let response = json!({
            "outputSpeech": {"type": "SSML", "ssml": "<speak>Hi</speak>"},
            "reprompt": {"outputSpeech": {"type": "SSML", "ssml": "<speak>Hi</speak>"}},
            "shouldEndSession": true
        });
        assert!(validate_response(&response).is_err());
    }

    #[test]
    fn test_validator_rejects_untyped_directive() {
        let response = json!({"directives": [{"token": "t"}]});
        assert!(validate_response(&response).is_err());
    }

    #[test]
    fn test_video_launch_output_format() {
        let envelope = respond(json!({
            "context": {"System": {"device": {"supportedInterfaces": {"Alexa.Presentation.APL": {}}}}},
            "request": {"type": "LaunchRequest"}
        }));
        assert!(validate_envelope(&envelope).is_ok());
        assert_eq!(
            envelope["response"]["directives"][0]["type"],
            "Alexa.Presentation.APL.RenderDocument"
        );
    }

    #[test]
    fn test_audio_launch_output_format() {
        let envelope = respond(json!({"request": {"type": "LaunchRequest"}}));
        assert!(validate_envelope(&envelope).is_ok());
        assert!(envelope["response"].get("directives").is_none());
        let ssml = envelope["response"]["outputSpeech"]["ssml"].as_str().unwrap();
        assert!(ssml.contains("<audio src="));
    }

    #[test]
    fn test_session_ended_output_format() {
        let envelope = respond(json!({"request": {"type": "SessionEndedRequest"}}));
        assert!(validate_envelope(&envelope).is_ok());
        assert_eq!(envelope["response"], json!({}));
    }

    #[test]
    fn test_error_output_format() {
        let envelope = respond(json!({"request": {"type": "IntentRequest"}}));
        assert!(validate_envelope(&envelope).is_ok());
        assert_eq!(envelope["response"]["shouldEndSession"], false);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;
    use voice_skill_common::SkillConfig;
    use voice_skill_hello::hello_skill;

    /// Strategy to generate request types, known and unknown
    fn request_type_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("LaunchRequest".to_string()),
            Just("IntentRequest".to_string()),
            Just("SessionEndedRequest".to_string()),
            "[A-Z][A-Za-z]{2,20}Request",
        ]
    }

    /// Strategy to generate intent names, including the skill's own
    fn intent_name_strategy() -> impl Strategy<Value = Option<String>> {
        prop::option::of(prop_oneof![
            Just("HelloWorldIntent".to_string()),
            Just("AMAZON.HelpIntent".to_string()),
            Just("AMAZON.StopIntent".to_string()),
            Just("AMAZON.FallbackIntent".to_string()),
            "[A-Za-z][A-Za-z0-9._]{0,30}",
        ])
    }

    /// Strategy to generate the device's supported interfaces
    fn interfaces_strategy() -> impl Strategy<Value = Option<Value>> {
        prop_oneof![
            Just(None),
            Just(Some(json!({}))),
            Just(Some(json!({"AudioPlayer": {}}))),
            Just(Some(json!({"Alexa.Presentation.APL": {"runtime": {"maxVersion": "2022.1"}}}))),
            Just(Some(json!({"Alexa.Presentation.APL": null}))),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Any request yields a well-formed response envelope.
        #[test]
        fn any_request_yields_valid_envelope(
            request_type in request_type_strategy(),
            intent in intent_name_strategy(),
            interfaces in interfaces_strategy(),
        ) {
            let mut request = json!({"type": request_type});
            if let Some(name) = intent {
                request["intent"] = json!({"name": name});
            }
            let mut envelope = json!({"version": "1.0", "request": request});
            if let Some(interfaces) = interfaces {
                envelope["context"] = json!({"System": {"device": {"supportedInterfaces": interfaces}}});
            }

            let skill = hello_skill(&SkillConfig::default()).unwrap();
            let out = skill.invoke_json(&envelope.to_string()).unwrap();
            let out: Value = serde_json::from_str(&out).unwrap();

            prop_assert!(validate_envelope(&out).is_ok(), "invalid output: {}", out);
        }
    }
}
