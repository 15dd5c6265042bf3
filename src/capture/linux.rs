//! Linux implementation of the screen services
//!
//! Uses the X11 protocol through x11rb's pure Rust connection: the pointer
//! is read with `QueryPointer` and the snapshot with `GetImage` on the root
//! window of the default screen. Wayland sessions work through XWayland
//! only where the compositor allows root window reads.
//!
//! The root window spans every connected monitor, so the snapshot covers
//! the whole X screen rather than only the primary display. Pointer and
//! image share root coordinates, so sampling stays aligned on any monitor.

use x11rb::connection::Connection;
use x11rb::protocol::xproto::{ConnectionExt, ImageFormat, Screen as X11Screen};
use x11rb::rust_connection::RustConnection;

use super::{CaptureError, Point, Snapshot};

/// Ouvre une connexion au serveur X ($DISPLAY)
/// Opens a connection to the X server ($DISPLAY)
fn connect() -> Result<(RustConnection, usize), CaptureError> {
    x11rb::connect(None).map_err(|e| CaptureError::Platform(e.to_string()))
}

fn default_screen(conn: &RustConnection, screen_num: usize) -> Result<&X11Screen, CaptureError> {
    conn.setup()
        .roots
        .get(screen_num)
        .ok_or_else(|| CaptureError::Platform(format!("X11 screen {} not found", screen_num)))
}

/// Position du pointeur relative à la fenêtre racine
/// Pointer position relative to the root window
pub fn cursor_position() -> Result<Point, CaptureError> {
    let (conn, screen_num) = connect()?;
    let root = default_screen(&conn, screen_num)?.root;

    let reply = conn
        .query_pointer(root)
        .map_err(|e| CaptureError::Platform(e.to_string()))?
        .reply()
        .map_err(|e| CaptureError::Platform(e.to_string()))?;

    Ok(Point::new(i32::from(reply.root_x), i32::from(reply.root_y)))
}

/// Capture la fenêtre racine entière (tous les moniteurs) en ZPixmap
/// Captures the whole root window (all monitors) as a ZPixmap
pub fn capture_root() -> Result<Snapshot, CaptureError> {
    let (conn, screen_num) = connect()?;
    let screen = default_screen(&conn, screen_num)?;
    let (width, height) = (screen.width_in_pixels, screen.height_in_pixels);

    let reply = conn
        .get_image(ImageFormat::Z_PIXMAP, screen.root, 0, 0, width, height, !0)
        .map_err(|e| CaptureError::Platform(e.to_string()))?
        .reply()
        .map_err(|e| CaptureError::Platform(e.to_string()))?;

    // Profondeur 24/32 : 4 octets par pixel, ordre BGRX sur les serveurs little-endian
    // Depth 24/32: 4 bytes per pixel, BGRX order on little-endian servers
    if reply.depth != 24 && reply.depth != 32 {
        return Err(CaptureError::Platform(format!("unsupported X11 depth {}", reply.depth)));
    }

    let stride = usize::from(width) * 4;
    log::debug!("X11 capture {}x{} depth {}", width, height, reply.depth);
    Snapshot::from_bgra(u32::from(width), u32::from(height), stride, &reply.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_covers_whole_root_window() {
        // Sans serveur X ($DISPLAY absent), rien à vérifier
        // Without an X server ($DISPLAY unset), nothing to check
        let Ok((conn, screen_num)) = connect() else {
            return;
        };
        let screen = default_screen(&conn, screen_num).unwrap();
        let Ok(snapshot) = capture_root() else {
            return;
        };
        assert_eq!(
            (snapshot.width(), snapshot.height()),
            (u32::from(screen.width_in_pixels), u32::from(screen.height_in_pixels))
        );

        // Le pointeur est en coordonnées racine : il tombe dans la capture
        // The pointer is in root coordinates: it lands inside the capture
        if let Ok(point) = cursor_position() {
            assert!(snapshot.pixel_at(point).is_some());
        }
    }
}
