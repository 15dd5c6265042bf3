// =============================================================================
// editor.rs - Lancement de l'éditeur d'image externe
// editor.rs - External image editor launch
// =============================================================================

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

/// Lance `program image` et l'abandonne immédiatement
/// Spawns `program image` and detaches from it immediately
///
/// Aucun handle n'est conservé : la session n'attend pas la fin de l'éditeur,
/// ne le surveille pas et ne supprime jamais le fichier image. Les flux
/// standard sont redirigés vers null pour que l'éditeur n'écrive pas dans la
/// console.
/// No handle is kept: the session never waits for the editor, never
/// supervises it and never removes the image file. The standard streams go
/// to null so the editor cannot write into the console.
///
/// # Returns
/// * `Ok(())` - si le processus a démarré / if the process started
/// * `Err(io::Error)` - si le démarrage a échoué / if it could not be started
pub fn spawn_detached(program: &Path, image: &Path) -> io::Result<()> {
    let child = Command::new(program)
        .arg(image)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    log::debug!("started {} (pid {})", program.display(), child.id());
    drop(child);
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================
