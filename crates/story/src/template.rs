//! System instruction sent with every story request.

use comicgen_core::story::{CHARACTER_NAME, PANEL_COUNT, STYLE_SUFFIX, SUBJECT_TOKENS};

/// Build the fixed system instruction.
///
/// The reply must be a JSON object `{"comics": [{"prompt", "caption"}]}`.
pub fn system_prompt() -> String {
    let [subject, markings] = SUBJECT_TOKENS;
    format!(
        r#"Create a {PANEL_COUNT}-panel comic story about a cat's adventure. For each panel, provide:
1. An image generation prompt that includes '{subject}' and '{markings}' and ends with '{STYLE_SUFFIX}'
2. A caption that refers to the cat as '{CHARACTER_NAME}'

Format the output as JSON with this structure:
{{
    "comics": [
        {{
            "prompt": "Image generation prompt here",
            "caption": "Caption text here"
        }}
    ]
}}"#
    )
}
