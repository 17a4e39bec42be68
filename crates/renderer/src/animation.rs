//! Animated GIF assembly.
//!
//! Frames are written in the order given, each exactly once, with a fixed
//! delay and an infinite loop.

use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::Delay;

use crate::error::{RenderError, RenderResult};
use crate::frame::Frame;

/// NeuQuant sampling factor used when a frame has more than 256 colors
/// (1 = best quality, 30 = fastest).
const QUANTIZER_SPEED: i32 = 10;

/// Per-frame delay in whole milliseconds.
pub fn frame_delay_ms(frame_duration_secs: f32) -> u32 {
    (frame_duration_secs * 1000.0).round().max(10.0) as u32
}

/// Encode `frames` as a looping GIF into `writer`.
pub fn encode_gif<W: Write>(
    frames: &[Frame],
    frame_duration_secs: f32,
    writer: W,
) -> RenderResult<()> {
    let first = frames
        .first()
        .ok_or_else(|| RenderError::Encode("no frames to encode".to_string()))?;
    if let Some(bad) = frames
        .iter()
        .find(|f| f.width() != first.width() || f.height() != first.height())
    {
        return Err(RenderError::Encode(format!(
            "frame {} is {}x{}, expected {}x{}",
            bad.timestamp,
            bad.width(),
            bad.height(),
            first.width(),
            first.height()
        )));
    }

    let delay = Delay::from_numer_denom_ms(frame_delay_ms(frame_duration_secs), 1);
    let mut encoder = GifEncoder::new_with_speed(writer, QUANTIZER_SPEED);
    encoder.set_repeat(Repeat::Infinite)?;
    encoder.encode_frames(
        frames
            .iter()
            .map(|f| image::Frame::from_parts(f.image.clone(), 0, 0, delay)),
    )?;

    Ok(())
}

/// Encode `frames` to `path`.
///
/// The GIF is written to a temporary file next to `path` and renamed into
/// place, so a failure leaves any existing file untouched.
pub fn write_gif(frames: &[Frame], frame_duration_secs: f32, path: &Path) -> RenderResult<()> {
    let io_error = |source: std::io::Error| RenderError::Io {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_error)?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        encode_gif(frames, frame_duration_secs, &mut writer)?;
        writer.flush().map_err(io_error)?;
    }

    tmp.persist(path).map_err(|e| io_error(e.error))?;

    tracing::info!(
        path = %path.display(),
        frames = frames.len(),
        delay_ms = frame_delay_ms(frame_duration_secs),
        "Wrote animation"
    );
    Ok(())
}
