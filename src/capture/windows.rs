// =============================================================================
// CAPTURE D'ÉCRAN - VERSION WINDOWS
// SCREEN CAPTURE - WINDOWS VERSION
// =============================================================================
// GDI : BitBlt de l'écran principal vers un bitmap mémoire, puis GetDIBits
// GDI: BitBlt of the primary screen into a memory bitmap, then GetDIBits
// =============================================================================

use windows::Win32::{
    Foundation::{HWND, POINT},
    Graphics::Gdi::{
        BitBlt, CreateCompatibleBitmap, CreateCompatibleDC, DeleteDC, DeleteObject, GetDC,
        GetDIBits, ReleaseDC, SelectObject, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
        DIB_RGB_COLORS, SRCCOPY,
    },
    UI::WindowsAndMessaging::{GetCursorPos, GetSystemMetrics, SM_CXSCREEN, SM_CYSCREEN},
};

use super::{CaptureError, Point, Snapshot};

// =============================================================================
// POSITION DU CURSEUR
// CURSOR POSITION
// =============================================================================

/// Position du curseur en coordonnées écran
/// Cursor position in screen coordinates
pub fn cursor_position() -> Result<Point, CaptureError> {
    let mut pt = POINT::default();
    unsafe { GetCursorPos(&mut pt) }.map_err(|e| CaptureError::Platform(e.to_string()))?;
    Ok(Point::new(pt.x, pt.y))
}

// =============================================================================
// CAPTURE D'ÉCRAN
// SCREEN CAPTURE
// =============================================================================

/// Capture l'écran principal entier et extrait les pixels (BGRA)
/// Captures the entire primary screen and extracts pixel data (BGRA)
pub fn capture_primary() -> Result<Snapshot, CaptureError> {
    unsafe {
        // Dimensions de l'écran principal
        // Primary screen dimensions
        let width = GetSystemMetrics(SM_CXSCREEN);
        let height = GetSystemMetrics(SM_CYSCREEN);
        if width <= 0 || height <= 0 {
            return Err(CaptureError::EmptyImage);
        }

        let hdc_screen = GetDC(HWND::default());      // DC de l'écran / Screen DC
        let hdc_mem = CreateCompatibleDC(hdc_screen); // DC mémoire compatible / Compatible memory DC
        let hbitmap = CreateCompatibleBitmap(hdc_screen, width, height);

        let result = if hbitmap.is_invalid() {
            Err(CaptureError::Platform("CreateCompatibleBitmap failed".into()))
        } else {
            let previous = SelectObject(hdc_mem, hbitmap);

            // Copie l'écran dans le bitmap (BitBlt = Bit Block Transfer)
            // Copy the screen to the bitmap (BitBlt = Bit Block Transfer)
            let copied = BitBlt(hdc_mem, 0, 0, width, height, hdc_screen, 0, 0, SRCCOPY);

            // GetDIBits et DeleteObject exigent un bitmap désélectionné
            // GetDIBits and DeleteObject require the bitmap to be deselected
            SelectObject(hdc_mem, previous);

            let mut bmi = BITMAPINFO {
                bmiHeader: BITMAPINFOHEADER {
                    biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                    biWidth: width,
                    biHeight: -height,   // Négatif = top-down / Negative = top-down
                    biPlanes: 1,
                    biBitCount: 32,      // BGRA
                    biCompression: BI_RGB.0,
                    ..Default::default()
                },
                ..Default::default()
            };

            let mut data: Vec<u8> = vec![0; width as usize * height as usize * 4];
            let lines = GetDIBits(
                hdc_mem,
                hbitmap,
                0,
                height as u32,
                Some(data.as_mut_ptr() as *mut _),
                &mut bmi,
                DIB_RGB_COLORS,
            );

            if !DeleteObject(hbitmap).as_bool() {
                log::debug!("DeleteObject failed for the capture bitmap");
            }

            match copied {
                Err(e) => Err(CaptureError::Platform(e.to_string())),
                Ok(()) if lines != height => {
                    Err(CaptureError::Platform(format!("GetDIBits copied {} of {} lines", lines, height)))
                }
                Ok(()) => Snapshot::from_bgra(width as u32, height as u32, width as usize * 4, &data),
            }
        };

        // Libère les ressources GDI
        // Release GDI resources
        let _ = DeleteDC(hdc_mem);
        let _ = ReleaseDC(HWND::default(), hdc_screen);

        result
    }
}

// =============================================================================
// TESTS
// =============================================================================
