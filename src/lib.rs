//! =============================================================================
//! Cursor Checker - Couleur sous le curseur et conversions RGB / hex
//! Cursor Checker - Color under the cursor and RGB / hex conversions
//! =============================================================================
//!
//! Outil console : chaque touche de fonction déclenche une action.
//! Console tool: each function key triggers one action.
//!
//! # Contrôles / Controls
//! - F1: Couleur sous le curseur / Color under the cursor
//! - F2: Pareil après 3 s, à la position d'avant l'attente / Same after 3 s, at the pre-delay position
//! - F3: Ouvre l'écran dans l'éditeur d'image / Open the screen in the image editor
//! - F4: R,G,B -> hex
//! - F5: hex -> R,G,B ("back" annule / cancels)
//! - F6: Efface la console / Clear the console
//! - Esc, Ctrl+C: Quitter / Quit

use std::io;

use anyhow::Context;

// =============================================================================
// MODULES
// =============================================================================

/// Capture d'écran et position du pointeur (par plateforme)
/// Screen capture and pointer position (per platform)
pub mod capture;

/// Type couleur et conversions hexadécimales
/// Color type and hexadecimal conversions
pub mod color;

/// Constantes, chemins et fichier de l'éditeur
/// Constants, paths and the editor sidecar file
pub mod config;

/// Entrées clavier et sortie console
/// Keyboard input and console output
pub mod console;

/// Lancement détaché de l'éditeur externe
/// Detached launch of the external editor
pub mod editor;

/// Boucle interactive
/// Interactive loop
pub mod session;

pub use capture::{CaptureError, NativeScreen, Point, Screen, Snapshot};
pub use color::{Color, ColorError};
pub use session::{Action, Session};

// =============================================================================
// POINT D'ENTRÉE
// ENTRY POINT
// =============================================================================

/// Résout les chemins, charge l'éditeur une fois, puis lance la session
/// Resolves the paths, loads the editor once, then runs the session
pub fn run() -> anyhow::Result<()> {
    let paths = config::AppPaths::beside_executable().context("cannot locate the executable")?;
    let editor = config::load_editor_path(&paths.editor_config);

    let mut session = Session::new(NativeScreen, console::TerminalInput, io::stdout(), paths, editor);
    session.run().context("console I/O failed")
}
