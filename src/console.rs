// =============================================================================
// console.rs - Entrées clavier et sortie console
// console.rs - Keyboard input and console output
// =============================================================================

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use crossterm::{
    cursor::{MoveTo, MoveToColumn, MoveToPreviousLine},
    event::{self, Event, KeyEvent, KeyEventKind},
    queue,
    style::Print,
    terminal::{self, Clear, ClearType},
};

// =============================================================================
// ENTRÉES
// INPUT
// =============================================================================

/// Source des touches et des lignes saisies
/// Source of key presses and typed lines
pub trait Input {
    /// Bloque jusqu'au prochain appui de touche
    /// Blocks until the next key press
    fn read_key(&mut self) -> io::Result<KeyEvent>;

    /// Lit une ligne ; `None` en fin d'entrée
    /// Reads one line; `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Active le mode raw et le désactive à la destruction
/// Enables raw mode and disables it on drop
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            log::error!("failed to leave raw mode: {}", err);
        }
    }
}

/// Terminal réel : touches via crossterm, lignes via stdin
/// Real terminal: keys through crossterm, lines through stdin
///
/// Le mode raw n'est actif que pendant l'attente d'une touche, afin que les
/// lignes affichées et saisies gardent l'écho et l'édition normale.
/// Raw mode is only on while waiting for a key, so printed and typed lines
/// keep their normal echo and editing.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl Input for TerminalInput {
    fn read_key(&mut self) -> io::Result<KeyEvent> {
        let _raw = RawModeGuard::enable()?;
        loop {
            // Windows envoie aussi les relâchements : on ne garde que les appuis
            // Windows also reports releases: only presses are kept
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(key);
                }
            }
        }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }
}

// =============================================================================
// SORTIE
// OUTPUT
// =============================================================================

/// Sortie console avec contrôle du curseur (séquences crossterm)
/// Console output with cursor control (crossterm sequences)
pub struct Console<W: Write> {
    out: W,
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Écrit une ligne complète / Writes a full line
    pub fn line(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }

    /// Écrit une invite sans retour à la ligne
    /// Writes a prompt without a newline
    pub fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{}", text)?;
        self.out.flush()
    }

    /// Ramène le curseur en colonne 0
    /// Moves the cursor back to column 0
    pub fn reset_line(&mut self) -> io::Result<()> {
        queue!(self.out, MoveToColumn(0))?;
        self.out.flush()
    }

    /// Remplace le contenu de la ligne courante (compte à rebours)
    /// Replaces the content of the current line (countdown)
    pub fn overwrite_line(&mut self, text: impl Display) -> io::Result<()> {
        queue!(self.out, MoveToColumn(0), Clear(ClearType::CurrentLine), Print(text))?;
        self.out.flush()
    }

    /// Efface la ligne précédente et y replace le curseur (après "back")
    /// Erases the previous line and puts the cursor on it (after "back")
    pub fn erase_previous_line(&mut self) -> io::Result<()> {
        queue!(self.out, MoveToPreviousLine(1), Clear(ClearType::CurrentLine))?;
        self.out.flush()
    }

    /// Efface l'écran et l'historique, curseur en haut à gauche
    /// Clears the screen and scrollback, cursor at the top-left
    pub fn clear_screen(&mut self) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All), Clear(ClearType::Purge), MoveTo(0, 0))?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

// =============================================================================
// TESTS
// =============================================================================
