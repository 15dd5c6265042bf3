//! macOS implementation of the screen services
//!
//! Uses Core Graphics: `CGDisplay::main().image()` for the snapshot and a
//! `CGEvent` created from the HID event source for the pointer location.

// =============================================================================
// IMPORTS
// =============================================================================

use core_graphics::display::CGDisplay;
use core_graphics::event::CGEvent;
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};

use super::{CaptureError, Point, Snapshot};

// =============================================================================
// POINTER
// =============================================================================

/// Position du pointeur, en pixels de l'image capturée
/// Pointer position, in pixels of the captured image
///
/// CGEvent renvoie des points ; sur un écran Retina l'image capturée a
/// `backingScale` pixels par point, on applique donc le même facteur.
/// CGEvent reports points; on a Retina display the captured image has
/// `backingScale` pixels per point, so the same factor is applied.
pub fn cursor_position() -> Result<Point, CaptureError> {
    let source = CGEventSource::new(CGEventSourceStateID::HIDSystemState)
        .map_err(|_| CaptureError::Platform("CGEventSource creation failed".into()))?;
    let event = CGEvent::new(source)
        .map_err(|_| CaptureError::Platform("CGEvent creation failed".into()))?;
    let location = event.location();

    let scale = backing_scale();
    Ok(Point::new(
        (location.x * scale).floor() as i32,
        (location.y * scale).floor() as i32,
    ))
}

/// Rapport pixels / points de l'écran principal
/// Pixels-per-point ratio of the main display
fn backing_scale() -> f64 {
    let display = CGDisplay::main();
    let points_wide = display.bounds().size.width;
    match display.display_mode() {
        Some(mode) if points_wide > 0.0 => mode.pixel_width() as f64 / points_wide,
        _ => 1.0,
    }
}

// =============================================================================
// SCREEN CAPTURE
// =============================================================================

/// Capture l'écran principal entier (BGRA, 32 bits par pixel)
/// Captures the whole main display (BGRA, 32 bits per pixel)
pub fn capture_primary() -> Result<Snapshot, CaptureError> {
    let image = CGDisplay::main()
        .image()
        .ok_or_else(|| CaptureError::Platform("CGDisplayCreateImage returned null".into()))?;

    if image.bits_per_pixel() != 32 {
        return Err(CaptureError::Platform(format!(
            "unsupported pixel size {} bits",
            image.bits_per_pixel()
        )));
    }

    let data = image.data();
    Snapshot::from_bgra(
        image.width() as u32,
        image.height() as u32,
        image.bytes_per_row(),
        data.bytes(),
    )
}
