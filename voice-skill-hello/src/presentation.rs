//! Video presentation document and its render directive.
//!
//! The document plays one full-viewport video and, when playback ends,
//! speaks the preamble bound from the `imageData` data source.

use serde::Serialize;
use serde_json::{Value, json};
use std::sync::LazyLock;

/// Directive type that asks the device to render a presentation document.
pub const RENDER_DOCUMENT: &str = "Alexa.Presentation.APL.RenderDocument";

/// Directive schema version.
pub const DIRECTIVE_VERSION: &str = "1.1";

/// Token identifying the rendered document in later device events.
pub const DOCUMENT_TOKEN: &str = "HELLO_WORLD_TOKEN";

/// Speech markup spoken once the video finishes.
pub const FAREWELL_SSML: &str = "<speak>Até mais!</speak>";

/// Name of the data source and of the template parameter bound to it.
pub const DATA_SOURCE_NAME: &str = "imageData";

static VIDEO_DOCUMENT: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "APL",
        "version": "2022.1",
        "import": [
            {"name": "alexa-viewport-profiles", "version": "1.2.0"}
        ],
        "onMount": [],
        "mainTemplate": {
            "parameters": [DATA_SOURCE_NAME],
            "item": [
                {
                    "type": "Container",
                    "id": "cardSpeakContainer",
                    "width": "100%",
                    "height": "100%",
                    "speech": "${imageData.properties.preambleSpeech}",
                    "items": [
                        {
                            "type": "Container",
                            "direction": "row",
                            "width": "100%",
                            "height": "100%",
                            "alignItems": "center",
                            "data": "${imageData.properties}",
                            "items": [
                                {
                                    "type": "Video",
                                    "id": "videoPlayer",
                                    "width": "100%",
                                    "height": "100%",
                                    "autoplay": true,
                                    "source": "${data.video_url}",
                                    "audioTrack": "foreground",
                                    "scale": "best-fill",
                                    "onEnd": [
                                        {"type": "SpeakItem", "componentId": "cardSpeakContainer"}
                                    ]
                                }
                            ]
                        }
                    ]
                }
            ]
        }
    })
});

/// The static video-playback document.
pub fn video_document() -> &'static Value {
    &VIDEO_DOCUMENT
}

/// `Alexa.Presentation.APL.RenderDocument` directive.
#[derive(Debug, Clone, Serialize)]
pub struct RenderDocumentDirective {
    #[serde(rename = "type")]
    pub directive_type: &'static str,
    pub version: &'static str,
    pub token: &'static str,
    pub document: &'static Value,
    pub datasources: DataSources,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataSources {
    #[serde(rename = "imageData")]
    pub image_data: ObjectDataSource,
}

/// Object data source with a markup-to-speech transformer.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectDataSource {
    #[serde(rename = "type")]
    pub source_type: &'static str,
    pub properties: VideoProperties,
    pub transformers: Vec<Transformer>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoProperties {
    #[serde(rename = "speechText")]
    pub speech_text: String,
    pub video_url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transformer {
    pub input_path: &'static str,
    pub output_name: &'static str,
    pub transformer: &'static str,
}

impl RenderDocumentDirective {
    /// Directive playing `video_url`, then speaking the farewell.
    pub fn video_playback(video_url: &str) -> Self {
        Self {
            directive_type: RENDER_DOCUMENT,
            version: DIRECTIVE_VERSION,
            token: DOCUMENT_TOKEN,
            document: video_document(),
            datasources: DataSources {
                image_data: ObjectDataSource {
                    source_type: "object",
                    properties: VideoProperties {
                        speech_text: FAREWELL_SSML.to_string(),
                        video_url: video_url.to_string(),
                    },
                    transformers: vec![Transformer {
                        input_path: "speechText",
                        output_name: "preambleSpeech",
                        transformer: "ssmlToSpeech",
                    }],
                },
            },
        }
    }
}
