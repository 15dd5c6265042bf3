// =============================================================================
// capture/mod.rs - Capture d'écran et position du pointeur
// capture/mod.rs - Screen capture and pointer position
// =============================================================================

use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use thiserror::Error;

use crate::color::Color;

/// Implémentation Linux (X11)
/// Linux implementation (X11)
#[cfg(target_os = "linux")]
mod linux;

/// Implémentation macOS
/// macOS implementation
#[cfg(target_os = "macos")]
mod macos;

/// Implémentation Windows
/// Windows implementation
#[cfg(target_os = "windows")]
mod windows;

// =============================================================================
// ERREURS
// ERRORS
// =============================================================================

/// Échec de capture ou de lecture du pointeur
/// Capture or pointer lookup failure
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("screen capture is not supported on this platform")]
    Unsupported,

    /// Erreur remontée par l'API du système
    /// Error reported by the OS API
    #[error("platform error: {0}")]
    Platform(String),

    #[error("captured image is empty")]
    EmptyImage,

    #[error("pixel buffer too small: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },
}

// =============================================================================
// TYPES
// =============================================================================

/// Coordonnées écran du pointeur, origine en haut à gauche
/// Screen coordinates of the pointer, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Capture complète de l'écran principal
/// Full capture of the primary display
///
/// Chaque appel à [`Screen::capture`] renvoie une nouvelle valeur : il n'y a
/// pas de tampon partagé réutilisé entre deux actions.
/// Every [`Screen::capture`] call returns a new value: no buffer is shared
/// or reused between two actions.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pixels: RgbaImage,
}

impl Snapshot {
    pub fn from_image(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Construit une capture depuis des lignes BGRA/BGRX (ordre natif des API écran)
    /// Builds a snapshot from BGRA/BGRX rows (native order of the screen APIs)
    ///
    /// # Arguments
    /// * `width`, `height` - Dimensions en pixels / Size in pixels
    /// * `stride` - Octets par ligne, >= width * 4 / Bytes per row, >= width * 4
    /// * `data` - Pixels bruts, de haut en bas / Raw pixels, top-down
    ///
    /// L'alpha est forcé à 255 : X11 laisse l'octet de remplissage à zéro.
    /// Alpha is forced to 255: X11 leaves the padding byte at zero.
    pub fn from_bgra(width: u32, height: u32, stride: usize, data: &[u8]) -> Result<Self, CaptureError> {
        if width == 0 || height == 0 {
            return Err(CaptureError::EmptyImage);
        }
        let row_bytes = width as usize * 4;
        let expected = stride
            .checked_mul(height as usize - 1)
            .and_then(|n| n.checked_add(row_bytes))
            .ok_or(CaptureError::BufferSize { expected: usize::MAX, actual: data.len() })?;
        if stride < row_bytes || data.len() < expected {
            return Err(CaptureError::BufferSize { expected, actual: data.len() });
        }

        let pixels = RgbaImage::from_fn(width, height, |x, y| {
            let i = y as usize * stride + x as usize * 4;
            Rgba([data[i + 2], data[i + 1], data[i], 255])
        });
        Ok(Self { pixels })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Couleur du pixel en `point`, `None` hors de la capture
    /// Color of the pixel at `point`, `None` outside the capture
    pub fn pixel_at(&self, point: Point) -> Option<Color> {
        let x = u32::try_from(point.x).ok()?;
        let y = u32::try_from(point.y).ok()?;
        let Rgba([r, g, b, _]) = *self.pixels.get_pixel_checked(x, y)?;
        Some(Color::new(r, g, b))
    }

    /// Écrit la capture en PNG (écrase le fichier existant)
    /// Writes the snapshot as PNG (overwrites any existing file)
    pub fn save_png(&self, path: &Path) -> image::ImageResult<()> {
        self.pixels.save_with_format(path, ImageFormat::Png)
    }
}

// =============================================================================
// TRAIT ÉCRAN
// SCREEN TRAIT
// =============================================================================

/// Services d'écran fournis par le système
/// Screen services provided by the OS
pub trait Screen {
    /// Position actuelle du pointeur sur l'écran principal
    /// Current pointer position on the primary display
    fn cursor_position(&self) -> Result<Point, CaptureError>;

    /// Capture l'écran principal entier
    /// Captures the whole primary display
    fn capture(&self) -> Result<Snapshot, CaptureError>;
}

/// Écran natif, selon la plateforme de compilation
/// Native screen, chosen by the target platform
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeScreen;

impl Screen for NativeScreen {
    fn cursor_position(&self) -> Result<Point, CaptureError> {
        #[cfg(target_os = "linux")]
        {
            linux::cursor_position()
        }

        #[cfg(target_os = "macos")]
        {
            macos::cursor_position()
        }

        #[cfg(target_os = "windows")]
        {
            windows::cursor_position()
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            Err(CaptureError::Unsupported)
        }
    }

    fn capture(&self) -> Result<Snapshot, CaptureError> {
        #[cfg(target_os = "linux")]
        {
            linux::capture_root()
        }

        #[cfg(target_os = "macos")]
        {
            macos::capture_primary()
        }

        #[cfg(target_os = "windows")]
        {
            windows::capture_primary()
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        {
            Err(CaptureError::Unsupported)
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
