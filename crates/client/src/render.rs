//! Terminal rendering of poll progress.

use comicgen_core::comic::{Comic, PanelViewState};
use comicgen_core::job::JobStatus;
use comicgen_pipeline::PollEvent;

/// Lines printed once the comic is submitted: every caption, numbered.
pub fn render_captions(comic: &Comic) -> String {
    comic
        .panels
        .iter()
        .enumerate()
        .map(|(i, pair)| format!("Panel {}: {}\n", i + 1, pair.panel.caption))
        .collect()
}

/// Line for a poll event, if it is worth showing.
pub fn render_event(event: &PollEvent, comic: &Comic) -> Option<String> {
    match event {
        PollEvent::PanelReady {
            panel_index,
            image_url,
        } => Some(format!(
            "Panel {} ready: {}\n  {}",
            panel_index + 1,
            caption(comic, *panel_index),
            image_url
        )),
        PollEvent::JobUpdated {
            panel_index,
            status: status @ (JobStatus::Failed | JobStatus::Canceled),
        } => Some(format!("Panel {} image {}", panel_index + 1, status)),
        _ => None,
    }
}

/// Final summary: one line per panel with its image or why it has none.
pub fn render_summary(panels: &[PanelViewState]) -> String {
    panels
        .iter()
        .enumerate()
        .map(|(i, view)| match &view.image_url {
            Some(url) => format!("{}. {}\n   {}\n", i + 1, view.panel.caption, url),
            None => format!(
                "{}. {}\n   (no image, job {})\n",
                i + 1,
                view.panel.caption,
                view.job.status
            ),
        })
        .collect()
}

fn caption(comic: &Comic, panel_index: usize) -> &str {
    comic
        .panels
        .get(panel_index)
        .map(|p| p.panel.caption.as_str())
        .unwrap_or_default()
}
