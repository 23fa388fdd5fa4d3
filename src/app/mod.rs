mod controller;
mod preview;
mod state;
mod ui;

use crate::error::UploadError;
use crate::upload::{ProcessingEndpoint, StagedFile};
use crate::utils::mime::detect_mime_type;
use bytes::Bytes;
use eframe::{egui, App};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub use controller::UploadController;
pub use preview::{decode_preview, MAX_PREVIEW_EDGE};
pub use state::{Notice, PreviewStatus, ResultView, UploadState};

pub struct ScanTranslator {
    controller: UploadController,
    server_label: String,
    /// Texture for the current preview, tagged with the generation it was
    /// built from.
    preview_texture: Option<(u64, egui::TextureHandle)>,
}

impl ScanTranslator {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        endpoint: Arc<dyn ProcessingEndpoint>,
        server_label: String,
    ) -> Self {
        debug!("Initializing image text extractor");
        Self::from_controller(UploadController::new(endpoint), server_label)
    }

    fn from_controller(controller: UploadController, server_label: String) -> Self {
        Self {
            controller,
            server_label,
            preview_texture: None,
        }
    }

    pub fn open_file(&mut self, path: &Path) {
        match StagedFile::from_path(path) {
            Ok(file) => self.stage(file),
            Err(e) => self.report_read_error(e),
        }
    }

    fn stage(&mut self, file: StagedFile) {
        if let Err(e) = self.controller.accept_file(file) {
            debug!("File not staged: {}", e);
        }
    }

    fn report_read_error(&mut self, e: UploadError) {
        warn!("{}", e);
        self.controller
            .notify(Notice::new("Could not open file", e.to_string()));
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        self.stage_dropped(dropped);
    }

    /// Only the first dropped file is considered. Drops are ignored while a
    /// notice is open, like every other input behind it.
    fn stage_dropped(&mut self, dropped: Vec<egui::DroppedFile>) {
        if self.controller.notice().is_some() {
            if !dropped.is_empty() {
                debug!("Ignoring {} dropped file(s) behind a notice", dropped.len());
            }
            return;
        }
        if let Some(file) = dropped.into_iter().next() {
            match staged_from_dropped(file) {
                Ok(file) => self.stage(file),
                Err(e) => self.report_read_error(e),
            }
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        if self.controller.poll() {
            ctx.request_repaint();
        }
        if self.controller.has_pending_work() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
        self.sync_preview_texture(ctx);
    }

    fn sync_preview_texture(&mut self, ctx: &egui::Context) {
        let generation = self.controller.preview_generation();
        match self.controller.preview() {
            PreviewStatus::Ready(image) => {
                let current = self.preview_texture.as_ref().map(|(g, _)| *g);
                if current != Some(generation) {
                    let texture =
                        ctx.load_texture("preview", image.clone(), egui::TextureOptions::LINEAR);
                    self.preview_texture = Some((generation, texture));
                }
            }
            _ => self.preview_texture = None,
        }
    }
}

/// Native drops carry a path; web drops carry the bytes.
fn staged_from_dropped(file: egui::DroppedFile) -> Result<StagedFile, UploadError> {
    if let Some(path) = &file.path {
        return StagedFile::from_path(path);
    }

    let content_type = detect_mime_type(Path::new(&file.name));
    match file.bytes {
        Some(bytes) => Ok(StagedFile::new(
            file.name,
            content_type,
            Bytes::from_owner(bytes),
        )),
        None => Err(UploadError::Read {
            path: PathBuf::from(file.name),
            source: io::Error::new(io::ErrorKind::NotFound, "dropped file has no content"),
        }),
    }
}

impl App for ScanTranslator {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.handle_dropped_files(ctx);
        self.render(ctx);
    }
}
