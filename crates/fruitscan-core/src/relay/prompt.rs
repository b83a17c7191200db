//! Chat-completion request and response shapes for the AI gateway.

use serde::{Deserialize, Serialize};

/// System instruction describing the JSON the model must return.
pub const SYSTEM_PROMPT: &str = r##"You are an expert agricultural pathologist and botanist specializing in fruit disease detection. Analyze the provided fruit image and provide a detailed assessment.

Your response MUST be valid JSON with this exact structure:
{
  "fruitType": "string - the type of fruit detected (e.g., Apple, Orange, Banana, etc.)",
  "isHealthy": boolean,
  "healthStatus": "string - one of: 'Excellent', 'Good', 'Fair', 'Poor', 'Critical'",
  "isEdible": boolean,
  "edibilityReason": "string - why the fruit is or is not safe to eat",
  "affectedPercentage": number between 0 and 100 - estimated share of the fruit that is damaged,
  "disease": {
    "name": "string - name of the disease if detected, or 'None' if healthy",
    "severity": "string - one of: 'Healthy', 'Mild', 'Moderate', 'Severe'",
    "confidence": number between 0 and 100,
    "description": "string - brief description of the disease and visible symptoms"
  },
  "treatment": {
    "immediate": ["array of immediate actions to take"],
    "prevention": ["array of prevention measures for future"],
    "chemicals": ["array of recommended treatments or chemicals if applicable"]
  },
  "additionalNotes": "string - any additional observations about the fruit condition, whether it's a whole fruit or sliced, internal vs external disease, etc."
}

Be specific about:
- Whether the image shows whole fruit (surface/external disease) or sliced fruit (internal disease)
- Visual symptoms you can identify
- Confidence level in your diagnosis
- Practical, actionable treatment advice suitable for farmers

Rules:
- A healthy fruit has severity 'Healthy', disease name 'None' and empty treatment arrays where nothing applies
- Severity 'Severe' or an affectedPercentage above 60 means the fruit is not edible
- Rot, mold or internal browning visible in a sliced fruit makes it not edible

If the image doesn't contain a recognizable fruit, return:
{
  "error": "Unable to identify fruit in the image. Please upload a clear image of a fruit."
}"##;

/// Instruction sent alongside the image in the user turn.
pub const USER_INSTRUCTION: &str = "Analyze this fruit image for diseases. Identify the fruit type, detect any visible diseases (surface or internal if sliced), assess severity, and provide treatment recommendations.";

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Response envelope. Only the fields the relay reads are modelled.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// Text of the first choice, if present and non-empty.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Build the chat-completion request for one image.
///
/// `image_url` must already be a normalized data URI.
pub fn build_request(model: &str, image_url: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: MessageContent::Text(SYSTEM_PROMPT.to_string()),
            },
            ChatMessage {
                role: "user".to_string(),
                content: MessageContent::Parts(vec![
                    ContentPart::Text {
                        text: USER_INSTRUCTION.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: image_url.to_string(),
                        },
                    },
                ]),
            },
        ],
    }
}
