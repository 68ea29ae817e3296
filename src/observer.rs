//! Presentation hooks for a running assembly.
//!
//! The assembler owns the document; observers only get read access after
//! each change.

use crate::assembler::Phase;
use crate::models::{GeneratedImage, ImagePlaceholder};
use crate::Error;
use std::io::Write;
use std::sync::{Arc, Mutex};

pub trait DocumentObserver: Send + Sync {
    fn on_phase(&self, _phase: Phase) {}

    /// Called after `fragment` has been appended to `document`.
    fn on_fragment(&self, _fragment: &str, _document: &str) {}

    fn on_image_started(&self, _placeholder: &ImagePlaceholder, _total: usize) {}

    /// Called after the marker for `image` has been replaced in `document`.
    fn on_image_inserted(&self, _image: &GeneratedImage, _document: &str) {}

    fn on_image_failed(&self, _placeholder: &ImagePlaceholder, _error: &Error) {}
}

pub struct NoopObserver;

impl DocumentObserver for NoopObserver {}

/// Writes the live stream and image progress to a terminal (or any writer).
pub struct ConsoleObserver<W: Write + Send> {
    out: Mutex<W>,
}

impl ConsoleObserver<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleObserver<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn emit(&self, text: &str) {
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = out.write_all(text.as_bytes()).and_then(|_| out.flush()) {
            tracing::debug!("Failed to write to console: {}", e);
        }
    }
}

impl<W: Write + Send> DocumentObserver for ConsoleObserver<W> {
    fn on_phase(&self, phase: Phase) {
        if phase == Phase::ExtractingPlaceholders {
            self.emit("\n\n");
        }
    }

    fn on_fragment(&self, fragment: &str, _document: &str) {
        self.emit(fragment);
    }

    fn on_image_started(&self, placeholder: &ImagePlaceholder, total: usize) {
        self.emit(&format!(
            "Generating image {}/{}...\n",
            placeholder.index + 1,
            total
        ));
    }

    fn on_image_inserted(&self, image: &GeneratedImage, _document: &str) {
        if let Some(url) = &image.url {
            self.emit(&format!("Inserted image {}: {}\n", image.index + 1, url));
        }
    }

    fn on_image_failed(&self, placeholder: &ImagePlaceholder, error: &Error) {
        self.emit(&format!(
            "Warning: image {} ({}) skipped. {}\n",
            placeholder.index + 1,
            placeholder.description,
            error
        ));
    }
}

/// Captures every notification, for tests and harnesses.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    phases: Arc<Mutex<Vec<Phase>>>,
    snapshots: Arc<Mutex<Vec<String>>>,
    inserted: Arc<Mutex<Vec<GeneratedImage>>>,
    failed: Arc<Mutex<Vec<ImagePlaceholder>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_phases(&self) -> Vec<Phase> {
        self.phases.lock().unwrap().clone()
    }

    /// The document as seen after every fragment and every substitution.
    pub fn get_snapshots(&self) -> Vec<String> {
        self.snapshots.lock().unwrap().clone()
    }

    pub fn get_inserted(&self) -> Vec<GeneratedImage> {
        self.inserted.lock().unwrap().clone()
    }

    pub fn get_failed(&self) -> Vec<ImagePlaceholder> {
        self.failed.lock().unwrap().clone()
    }
}

impl DocumentObserver for RecordingObserver {
    fn on_phase(&self, phase: Phase) {
        self.phases.lock().unwrap().push(phase);
    }

    fn on_fragment(&self, _fragment: &str, document: &str) {
        self.snapshots.lock().unwrap().push(document.to_string());
    }

    fn on_image_inserted(&self, image: &GeneratedImage, document: &str) {
        self.inserted.lock().unwrap().push(image.clone());
        self.snapshots.lock().unwrap().push(document.to_string());
    }

    fn on_image_failed(&self, placeholder: &ImagePlaceholder, _error: &Error) {
        self.failed.lock().unwrap().push(placeholder.clone());
    }
}
