//! Configuration partagée : constantes, chemins et fichier de l'éditeur
//! Shared configuration: constants, paths and the editor sidecar file
//!
//! These values control the file names, the countdown and the banner text.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Nom du fichier texte contenant le chemin de l'éditeur d'image
/// Name of the text file holding the image editor path (beside the executable)
pub const EDITOR_CONFIG_FILE: &str = "ImageEditorLocation.txt";

/// Nom du fichier PNG temporaire passé à l'éditeur
/// Name of the temporary PNG handed to the editor (beside the executable)
pub const TEMP_IMAGE_FILE: &str = "image.png";

/// Durée du compte à rebours de F2, en secondes
/// Length of the F2 countdown, in seconds
pub const COUNTDOWN_SECONDS: u32 = 3;

/// Lignes d'aide affichées sous le chemin de l'exécutable
/// Help lines printed under the executable path
pub const HELP_LINES: [&str; 4] = [
    "Press F1 to scan. Press F2 to wait 3 seconds then scan.",
    "Press F3 to open the current screen in an image editor.",
    "Press F4 to convert RGB to hex. Press F5 to convert hex to RGB. Type \"back\" while converting to cancel.",
    "Press F6 to clear console. Press Esc to quit.",
];

/// Invite de F4 / F4 prompt
pub const RGB_PROMPT: &str = "R,G,B: ";

/// Invite de F5 / F5 prompt
pub const HEX_PROMPT: &str = "Hex: ";

/// Mot-clé qui annule une conversion
/// Keyword that cancels a conversion
pub const BACK_KEYWORD: &str = "back";

// =============================================================================
// CHEMINS
// PATHS
// =============================================================================

/// Chemins utilisés par la session, tous à côté de l'exécutable
/// Paths used by the session, all beside the executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Exécutable en cours (affiché dans la bannière)
    /// Running executable (shown in the banner)
    pub executable: PathBuf,

    /// Fichier `ImageEditorLocation.txt`
    pub editor_config: PathBuf,

    /// Fichier `image.png`
    pub temp_image: PathBuf,
}

impl AppPaths {
    /// Résout les chemins à partir de `std::env::current_exe()`
    /// Resolves the paths from `std::env::current_exe()`
    pub fn beside_executable() -> io::Result<Self> {
        let executable = std::env::current_exe()?;
        let dir = executable
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::in_dir(&dir, executable))
    }

    /// Construit les chemins dans un répertoire donné
    /// Builds the paths inside a given directory
    pub fn in_dir(dir: &Path, executable: PathBuf) -> Self {
        Self {
            executable,
            editor_config: dir.join(EDITOR_CONFIG_FILE),
            temp_image: dir.join(TEMP_IMAGE_FILE),
        }
    }
}

/// Texte de la bannière (chemin de l'exécutable + lignes d'aide + ligne vide)
/// Banner text (executable path + help lines + blank line)
pub fn banner(executable: &Path) -> String {
    let mut text = executable.display().to_string();
    for line in HELP_LINES {
        text.push('\n');
        text.push_str(line);
    }
    text.push('\n');
    text
}

// =============================================================================
// FICHIER DE L'ÉDITEUR
// EDITOR SIDECAR FILE
// =============================================================================

/// Charge le chemin de l'éditeur d'image, une seule fois au démarrage
/// Loads the image editor path, once at startup
///
/// # Returns
/// * `Some(path)` - si le fichier existe et nomme un fichier existant / if the file exists and names an existing file
/// * `None` - fichier absent, vide ou cible inexistante / missing, empty, or nonexistent target
pub fn load_editor_path(config_file: &Path) -> Option<PathBuf> {
    let contents = match fs::read_to_string(config_file) {
        Ok(contents) => contents,
        Err(err) => {
            log::debug!("no editor config at {}: {}", config_file.display(), err);
            return None;
        }
    };

    let trimmed = contents.trim();
    if trimmed.is_empty() {
        log::debug!("editor config {} is empty", config_file.display());
        return None;
    }

    let editor = PathBuf::from(trimmed);
    if editor.is_file() {
        log::debug!("image editor: {}", editor.display());
        Some(editor)
    } else {
        log::debug!("editor path {} does not exist", editor.display());
        None
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_in_dir() {
        let dir = Path::new("/opt/tool");
        let paths = AppPaths::in_dir(dir, dir.join("cursor-checker"));
        assert_eq!(paths.editor_config, dir.join("ImageEditorLocation.txt"));
        assert_eq!(paths.temp_image, dir.join("image.png"));
    }

    #[test]
    fn test_banner() {
        let text = banner(Path::new("/opt/tool/cursor-checker"));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "/opt/tool/cursor-checker");
        assert_eq!(lines[1], HELP_LINES[0]);
        assert_eq!(lines.len(), 5);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_editor_path(&dir.path().join(EDITOR_CONFIG_FILE)), None);
    }

    #[test]
    fn test_empty_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join(EDITOR_CONFIG_FILE);
        fs::write(&config, "  \n").unwrap();
        assert_eq!(load_editor_path(&config), None);
    }

    #[test]
    fn test_config_names_missing_editor() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join(EDITOR_CONFIG_FILE);
        fs::write(&config, dir.path().join("no-such-editor").display().to_string()).unwrap();
        assert_eq!(load_editor_path(&config), None);
    }

    #[test]
    fn test_config_names_existing_editor() {
        let dir = tempfile::tempdir().unwrap();
        let editor = dir.path().join("editor");
        fs::write(&editor, b"").unwrap();
        let config = dir.path().join(EDITOR_CONFIG_FILE);
        // Espaces et retour à la ligne autour du chemin
        // Whitespace and newline around the path
        fs::write(&config, format!("  {}\r\n", editor.display())).unwrap();
        assert_eq!(load_editor_path(&config), Some(editor));
    }
}
