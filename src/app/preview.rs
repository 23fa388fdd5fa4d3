use crate::app::state::PreviewStatus;
use bytes::Bytes;
use eframe::egui::ColorImage;
use std::sync::mpsc::{self, Receiver};
use tracing::{debug, warn};

/// Longest edge of the preview texture, in pixels.
pub const MAX_PREVIEW_EDGE: u32 = 1024;

/// Decode image bytes into something the UI can upload as a texture.
pub fn decode_preview(bytes: &[u8]) -> PreviewStatus {
    match image::load_from_memory(bytes) {
        Ok(img) => {
            let img = if img.width() > MAX_PREVIEW_EDGE || img.height() > MAX_PREVIEW_EDGE {
                img.thumbnail(MAX_PREVIEW_EDGE, MAX_PREVIEW_EDGE)
            } else {
                img
            };
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            debug!("Decoded preview {}x{}", size[0], size[1]);
            PreviewStatus::Ready(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
        }
        Err(e) => {
            warn!("Preview unavailable: {}", e);
            PreviewStatus::Unavailable(e.to_string())
        }
    }
}

/// Decode on a background thread; the receiver yields exactly one status.
pub fn spawn_decode(bytes: Bytes) -> Receiver<PreviewStatus> {
    let (sender, receiver) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = sender.send(decode_preview(&bytes));
    });
    receiver
}
