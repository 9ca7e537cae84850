//! Story model produced by the text-generation step.
//!
//! The panel contract (count, subject tokens, style suffix, character name)
//! is imposed by the system template sent upstream. It is not enforced when
//! a story is deserialized; [`Story::template_violations`] lets callers
//! inspect how far a returned story strays from it.

use serde::{Deserialize, Serialize};

/// Number of panels every story is asked for.
pub const PANEL_COUNT: usize = 3;

/// Name captions must use for the main character.
pub const CHARACTER_NAME: &str = "Yuri";

/// Tokens every image-generation prompt must contain.
pub const SUBJECT_TOKENS: [&str; 2] = ["YuRi_cat", "white and orange tabby"];

/// Suffix every image-generation prompt must end with.
pub const STYLE_SUFFIX: &str = "cute cartoon style, vivid colors";

/// One unit of a generated story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryPanel {
    /// Prompt handed to the image-generation provider.
    #[serde(rename = "prompt")]
    pub generation_prompt: String,
    /// Caption shown under the panel image.
    pub caption: String,
}

/// Ordered panels of a story. Panel order is the reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub comics: Vec<StoryPanel>,
}

/// A way in which a story deviates from the system template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateViolation {
    /// The story does not have exactly [`PANEL_COUNT`] panels.
    PanelCount(usize),
    /// A panel prompt is missing one of the [`SUBJECT_TOKENS`].
    MissingSubjectToken {
        panel_index: usize,
        token: &'static str,
    },
    /// A panel prompt does not end with [`STYLE_SUFFIX`].
    MissingStyleSuffix { panel_index: usize },
    /// A caption is empty.
    EmptyCaption { panel_index: usize },
    /// A caption does not mention [`CHARACTER_NAME`].
    CaptionWithoutCharacter { panel_index: usize },
}

impl std::fmt::Display for TemplateViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PanelCount(n) => write!(f, "expected {PANEL_COUNT} panels, got {n}"),
            Self::MissingSubjectToken { panel_index, token } => {
                write!(f, "panel {panel_index} prompt is missing '{token}'")
            }
            Self::MissingStyleSuffix { panel_index } => {
                write!(f, "panel {panel_index} prompt does not end with the style suffix")
            }
            Self::EmptyCaption { panel_index } => write!(f, "panel {panel_index} caption is empty"),
            Self::CaptionWithoutCharacter { panel_index } => {
                write!(f, "panel {panel_index} caption does not mention {CHARACTER_NAME}")
            }
        }
    }
}

impl Story {
    pub fn len(&self) -> usize {
        self.comics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comics.is_empty()
    }

    /// Check the story against the panel contract of the system template.
    ///
    /// Returns an empty list when the story conforms.
    pub fn template_violations(&self) -> Vec<TemplateViolation> {
        let mut violations = Vec::new();

        if self.comics.len() != PANEL_COUNT {
            violations.push(TemplateViolation::PanelCount(self.comics.len()));
        }

        for (panel_index, panel) in self.comics.iter().enumerate() {
            for token in SUBJECT_TOKENS {
                if !panel.generation_prompt.contains(token) {
                    violations.push(TemplateViolation::MissingSubjectToken { panel_index, token });
                }
            }

            // Trailing punctuation after the suffix is tolerated.
            let trimmed = panel
                .generation_prompt
                .trim_end()
                .trim_end_matches(['.', '!']);
            if !trimmed.ends_with(STYLE_SUFFIX) {
                violations.push(TemplateViolation::MissingStyleSuffix { panel_index });
            }

            if panel.caption.trim().is_empty() {
                violations.push(TemplateViolation::EmptyCaption { panel_index });
            } else if !panel.caption.contains(CHARACTER_NAME) {
                violations.push(TemplateViolation::CaptionWithoutCharacter { panel_index });
            }
        }

        violations
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
