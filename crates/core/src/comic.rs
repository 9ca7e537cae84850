//! Panels paired with the jobs that illustrate them.
//!
//! [`ComicPanel`] carries the panel/job correspondence explicitly, so no
//! caller has to keep two parallel lists in step. The wire format used by
//! the HTTP API still sends the story and the jobs side by side
//! ([`ComicEnvelope`]); [`Comic::from_parts`] re-pairs them.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::job::Job;
use crate::story::{Story, StoryPanel};

/// A story panel and the job generating its image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComicPanel {
    pub panel: StoryPanel,
    pub job: Job,
}

/// A fully submitted comic: every panel has a job.
#[derive(Debug, Clone, PartialEq)]
pub struct Comic {
    pub panels: Vec<ComicPanel>,
}

/// Wire shape of a submitted comic: `{ "story": ..., "predictions": [...] }`.
///
/// `predictions[i]` belongs to `story.comics[i]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComicEnvelope {
    pub story: Story,
    pub predictions: Vec<Job>,
}

impl Comic {
    /// Pair a story with its jobs. Fails if the lengths differ.
    pub fn from_parts(story: Story, jobs: Vec<Job>) -> Result<Self, CoreError> {
        if story.comics.len() != jobs.len() {
            return Err(CoreError::Misaligned {
                panels: story.comics.len(),
                jobs: jobs.len(),
            });
        }

        let panels = story
            .comics
            .into_iter()
            .zip(jobs)
            .map(|(panel, job)| ComicPanel { panel, job })
            .collect();

        Ok(Self { panels })
    }

    pub fn story(&self) -> Story {
        Story {
            comics: self.panels.iter().map(|p| p.panel.clone()).collect(),
        }
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.panels.iter().map(|p| &p.job)
    }

    pub fn into_envelope(self) -> ComicEnvelope {
        let (comics, predictions) = self
            .panels
            .into_iter()
            .map(|p| (p.panel, p.job))
            .unzip();
        ComicEnvelope {
            story: Story { comics },
            predictions,
        }
    }

    /// Initial view state: captions visible, no images yet.
    pub fn view_state(&self) -> Vec<PanelViewState> {
        self.panels
            .iter()
            .map(|p| PanelViewState {
                panel: p.panel.clone(),
                job: p.job.clone(),
                image_url: None,
            })
            .collect()
    }
}

impl TryFrom<ComicEnvelope> for Comic {
    type Error = CoreError;

    fn try_from(envelope: ComicEnvelope) -> Result<Self, Self::Error> {
        Self::from_parts(envelope.story, envelope.predictions)
    }
}

/// What a caller renders for one panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelViewState {
    pub panel: StoryPanel,
    /// Most recently fetched job snapshot.
    pub job: Job,
    /// Set once the job has succeeded with at least one output.
    pub image_url: Option<String>,
}

impl PanelViewState {
    /// Record a fresh job snapshot. Returns the image URL if this update
    /// revealed one.
    pub fn apply(&mut self, job: Job) -> Option<&str> {
        let newly_ready = self.image_url.is_none() && job.image_url().is_some();
        if newly_ready {
            self.image_url = job.image_url().map(str::to_string);
        }
        self.job = job;
        if newly_ready {
            self.image_url.as_deref()
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
