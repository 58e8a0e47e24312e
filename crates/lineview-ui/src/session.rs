//! A viewport wired to the highlighter and theme chosen by [`EditorSettings`].

use crate::highlighter::build_highlighter;
use crate::settings::EditorSettings;
use crate::theme::Theme;
use lineview_core::{
    EditorViewport, FontMetrics, HighlightError, HighlightWorker, InputEvent, InputOutcome,
    StyleSpanComputer,
};

enum Highlighting {
    Off,
    /// Runs on the UI thread inside [`EditorSession::refresh`].
    Foreground {
        computer: Box<dyn StyleSpanComputer>,
        /// Revision whose pass failed; not retried until the text changes.
        failed_revision: Option<u64>,
    },
    /// A worker is attached to the viewport.
    Background,
}

/// An [`EditorViewport`] plus the highlighting mode and theme from settings.
pub struct EditorSession {
    viewport: EditorViewport,
    highlighting: Highlighting,
    theme: Theme,
    settings: EditorSettings,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match &self.highlighting {
            Highlighting::Off => "off",
            Highlighting::Foreground { .. } => "foreground",
            Highlighting::Background => "background",
        };
        f.debug_struct("EditorSession")
            .field("viewport", &self.viewport)
            .field("highlighting", &mode)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Create a session showing `text`.
    pub fn new(
        settings: EditorSettings,
        font: impl FontMetrics + Send + 'static,
        text: &str,
    ) -> Result<Self, HighlightError> {
        let mut viewport = EditorViewport::new(font, settings.to_viewport_config());
        viewport.set_text(text);

        let highlighting = match build_highlighter(settings.highlighter)? {
            None => Highlighting::Off,
            Some(computer) if settings.background_highlighting => {
                viewport.attach_worker(HighlightWorker::spawn(computer)?);
                Highlighting::Background
            }
            Some(computer) => Highlighting::Foreground {
                computer,
                failed_revision: None,
            },
        };
        tracing::debug!(
            highlighter = %settings.highlighter,
            background = settings.background_highlighting,
            "editor session created"
        );

        let theme = Theme::dark().with_overrides(&settings.colors);
        let mut session = Self {
            viewport,
            highlighting,
            theme,
            settings,
        };
        session.refresh();
        Ok(session)
    }

    pub fn viewport(&self) -> &EditorViewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut EditorViewport {
        &mut self.viewport
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    /// Forward an input event to the viewport.
    pub fn handle_input(&mut self, event: InputEvent) -> InputOutcome {
        self.viewport.handle_input(event)
    }

    /// Bring the spans up to date as far as possible without blocking on a worker.
    ///
    /// Returns `true` if the spans changed.
    pub fn refresh(&mut self) -> bool {
        match &mut self.highlighting {
            Highlighting::Off => false,
            Highlighting::Background => {
                let changed = self.viewport.pump_highlights();
                if !self.viewport.has_worker() {
                    self.highlighting = Highlighting::Off;
                }
                changed
            }
            Highlighting::Foreground {
                computer,
                failed_revision,
            } => {
                let revision = self.viewport.revision();
                if self.viewport.spans_revision() == Some(revision)
                    || *failed_revision == Some(revision)
                {
                    return false;
                }
                match self.viewport.highlight_with(computer.as_mut()) {
                    Ok(()) => {
                        *failed_revision = None;
                        true
                    }
                    Err(_) => {
                        *failed_revision = Some(revision);
                        false
                    }
                }
            }
        }
    }
}
