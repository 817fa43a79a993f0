//! Server startup integration tests.
//!
//! Tests that the hello skill can be assembled from configuration and
//! answers envelopes over the line-delimited stdio framing.

use voice_skill_common::SkillConfig;

/// Test configuration for integration tests.
fn test_config() -> SkillConfig {
    SkillConfig {
        user_agent: "integration/hello/v0".to_string(),
        video_url: "https://cdn.example.com/hello.mp4".to_string(),
        audio_url: "https://cdn.example.com/hello.mp3".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use voice_skill_common::server::serve_lines;
    use voice_skill_hello::hello_skill;

    #[test]
    fn test_hello_skill_startup() {
        let skill = hello_skill(&test_config()).unwrap();

        assert_eq!(
            skill.handler_names(),
            vec![
                "LaunchRequestHandler",
                "HelloWorldIntentHandler",
                "HelpIntentHandler",
                "CancelAndStopIntentHandler",
                "FallbackIntentHandler",
                "SessionEndedRequestHandler",
                "IntentReflectorHandler",
            ]
        );
        assert_eq!(skill.user_agent(), Some("integration/hello/v0"));
    }

    #[test]
    fn test_default_config_startup() {
        let skill = hello_skill(&SkillConfig::default()).unwrap();
        assert_eq!(skill.user_agent(), Some(voice_skill_common::config::DEFAULT_USER_AGENT));
    }

    #[test]
    fn test_configured_asset_urls_are_used() {
        let skill = hello_skill(&test_config()).unwrap();

        let screen = json!({
            "context": {"System": {"device": {"supportedInterfaces": {"Alexa.Presentation.APL": {}}}}},
            "request": {"type": "LaunchRequest"}
        });
        let out = skill.invoke_json(&screen.to_string()).unwrap();
        assert!(out.contains("https://cdn.example.com/hello.mp4"));

        let speaker = json!({"request": {"type": "LaunchRequest"}});
        let out = skill.invoke_json(&speaker.to_string()).unwrap();
        assert!(out.contains("https://cdn.example.com/hello.mp3"));
    }

    #[test]
    fn test_presigned_audio_url_keeps_ssml_well_formed() {
        let config = SkillConfig::from_lookup(|name| match name {
            "SKILL_AUDIO_URL" => Some(
                "https://cdn.example.com/a.mp3?X-Amz-Expires=60&X-Amz-Signature=ab".to_string(),
            ),
            _ => None,
        })
        .unwrap();
        let skill = hello_skill(&config).unwrap();

        let out = skill
            .invoke_json(&json!({"request": {"type": "LaunchRequest"}}).to_string())
            .unwrap();
        let out: Value = serde_json::from_str(&out).unwrap();
        let ssml = out["response"]["outputSpeech"]["ssml"].as_str().unwrap();

        assert!(ssml.contains("X-Amz-Expires=60&amp;X-Amz-Signature=ab"));
        assert_eq!(ssml.matches('&').count(), ssml.matches("&amp;").count());
    }

    #[tokio::test]
    async fn test_stdio_lines_are_answered_in_order() {
        let skill = hello_skill(&test_config()).unwrap();
        let input = [
            json!({"request": {"type": "IntentRequest", "intent": {"name": "HelloWorldIntent"}}}).to_string(),
            String::new(),
            "not json".to_string(),
            json!({"request": {"type": "SessionEndedRequest", "reason": "USER_INITIATED"}}).to_string(),
            json!({"request": {"type": "IntentRequest", "intent": {"name": "OrderPizzaIntent"}}}).to_string(),
        ]
        .join("\n");

        let mut output = Vec::new();
        let answered = serve_lines(&skill, input.as_bytes(), &mut output).await.unwrap();
        assert_eq!(answered, 3);

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
        assert_eq!(lines.len(), 3);

        assert_eq!(lines[0]["response"]["outputSpeech"]["ssml"], "<speak>Hello World!</speak>");
        assert_eq!(lines[1]["response"], json!({}));
        assert_eq!(
            lines[2]["response"]["outputSpeech"]["ssml"],
            "<speak>You just triggered OrderPizzaIntent</speak>"
        );
        for line in &lines {
            assert_eq!(line["userAgent"], "integration/hello/v0");
        }
    }
}
