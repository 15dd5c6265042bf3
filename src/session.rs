// =============================================================================
// session.rs - Boucle interactive : une touche, une action
// session.rs - Interactive loop: one key, one action
// =============================================================================

use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::capture::{Point, Screen};
use crate::color::{strip_whitespace, Color, ColorError};
use crate::config::{self, AppPaths, BACK_KEYWORD, COUNTDOWN_SECONDS, HEX_PROMPT, RGB_PROMPT};
use crate::console::{Console, Input};
use crate::editor;

// =============================================================================
// ACTIONS
// =============================================================================

/// Action associée à une touche
/// Action bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// F1 - Capture et échantillonne sous le pointeur / Capture and sample under the pointer
    Sample,
    /// F2 - Pareil après un compte à rebours de 3 s / Same after a 3 s countdown
    DelayedSample,
    /// F3 - Ouvre la capture dans l'éditeur / Open the capture in the editor
    OpenInEditor,
    /// F4 - R,G,B -> hex
    RgbToHex,
    /// F5 - hex -> R,G,B
    HexToRgb,
    /// F6 - Efface la console / Clear the console
    Clear,
    /// Esc ou Ctrl+C / Esc or Ctrl+C
    Quit,
    /// Toute autre touche / Any other key
    Ignore,
}

impl Action {
    pub fn from_key(key: &KeyEvent) -> Self {
        match key.code {
            KeyCode::F(1) => Action::Sample,
            KeyCode::F(2) => Action::DelayedSample,
            KeyCode::F(3) => Action::OpenInEditor,
            KeyCode::F(4) => Action::RgbToHex,
            KeyCode::F(5) => Action::HexToRgb,
            KeyCode::F(6) => Action::Clear,
            KeyCode::Esc => Action::Quit,
            // En mode raw, Ctrl+C arrive comme une touche et non comme un signal
            // In raw mode, Ctrl+C arrives as a key, not as a signal
            KeyCode::Char('c') | KeyCode::Char('C') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Action::Quit
            }
            _ => Action::Ignore,
        }
    }
}

/// Suite de la boucle après une action
/// What the loop does after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Ligne de résultat d'un échantillonnage
/// Result line of a sample
pub fn sample_line(point: Point, color: Color) -> String {
    format!(
        "Location (X,Y): {},{}. Color (R,G,B): {}. Hex: {}",
        point.x,
        point.y,
        color,
        color.to_hex()
    )
}

/// Vrai si la saisie R,G,B demande l'annulation ("back", casse indifférente)
/// True when the R,G,B input asks to cancel ("back", any case)
///
/// Seul le premier champ compte, comme pour le découpage R,G,B.
/// Only the first field counts, as with the R,G,B split.
pub fn is_back_rgb(input: &str) -> bool {
    let cleaned = strip_whitespace(input);
    let first = cleaned.split(',').next().unwrap_or_default();
    first.eq_ignore_ascii_case(BACK_KEYWORD)
}

/// Vrai si la saisie hex demande l'annulation
/// True when the hex input asks to cancel
///
/// Toute la saisie nettoyée (sans un `#` initial) doit valoir "back".
/// The whole cleaned input (minus one leading `#`) must be "back".
pub fn is_back_hex(input: &str) -> bool {
    let cleaned = strip_whitespace(input);
    let value = cleaned.strip_prefix('#').unwrap_or(&cleaned);
    value.eq_ignore_ascii_case(BACK_KEYWORD)
}

fn rgb_to_hex(input: &str) -> Result<String, ColorError> {
    Color::parse_rgb(input).map(|color| format!("Hex: {}", color.to_hex()))
}

fn hex_to_rgb(input: &str) -> Result<String, ColorError> {
    Color::parse_hex(input).map(|color| format!("RGB: {}", color))
}

// =============================================================================
// SESSION
// =============================================================================

/// Session interactive : état unique "attente d'une touche"
/// Interactive session: single "awaiting key" state
///
/// Le chemin de l'éditeur est résolu une fois par l'appelant et n'est plus
/// jamais relu. Chaque capture produit un nouveau [`crate::capture::Snapshot`].
/// The editor path is resolved once by the caller and never re-read.
/// Every capture produces a new [`crate::capture::Snapshot`].
pub struct Session<S: Screen, I: Input, W: Write> {
    screen: S,
    input: I,
    console: Console<W>,
    paths: AppPaths,
    editor: Option<PathBuf>,
    banner: String,
    countdown_tick: Duration,
}

impl<S: Screen, I: Input, W: Write> Session<S, I, W> {
    pub fn new(screen: S, input: I, out: W, paths: AppPaths, editor: Option<PathBuf>) -> Self {
        let banner = config::banner(&paths.executable);
        Self {
            screen,
            input,
            console: Console::new(out),
            paths,
            editor,
            banner,
            countdown_tick: Duration::from_secs(1),
        }
    }

    /// Durée d'un pas du compte à rebours (1 s par défaut)
    /// Length of one countdown step (1 s by default)
    pub fn with_countdown_tick(mut self, tick: Duration) -> Self {
        self.countdown_tick = tick;
        self
    }

    /// Affiche la bannière puis traite les touches jusqu'à Esc / Ctrl+C
    /// Prints the banner then handles keys until Esc / Ctrl+C
    pub fn run(&mut self) -> io::Result<()> {
        self.console.line(&self.banner)?;
        loop {
            let key = self.input.read_key()?;
            let action = Action::from_key(&key);
            log::trace!("key {:?} -> {:?}", key.code, action);
            if self.dispatch(action)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    /// Exécute une action
    /// Runs one action
    ///
    /// Seules les erreurs de la console sont renvoyées ; les échecs de
    /// capture ou de lancement sont ignorés silencieusement (log debug).
    /// Only console errors are returned; capture or launch failures are
    /// silently ignored (debug log).
    pub fn dispatch(&mut self, action: Action) -> io::Result<Flow> {
        match action {
            Action::Sample => self.sample()?,
            Action::DelayedSample => self.delayed_sample()?,
            Action::OpenInEditor => self.open_in_editor()?,
            Action::RgbToHex => return self.convert(RGB_PROMPT, is_back_rgb, rgb_to_hex),
            Action::HexToRgb => return self.convert(HEX_PROMPT, is_back_hex, hex_to_rgb),
            Action::Clear => {
                self.console.clear_screen()?;
                self.console.line(&self.banner)?;
            }
            Action::Quit => return Ok(Flow::Quit),
            Action::Ignore => self.console.reset_line()?,
        }
        Ok(Flow::Continue)
    }

    pub fn into_output(self) -> W {
        self.console.into_inner()
    }

    fn cursor(&self) -> Option<Point> {
        self.screen
            .cursor_position()
            .map_err(|err| log::debug!("cursor position unavailable: {}", err))
            .ok()
    }

    fn sample(&mut self) -> io::Result<()> {
        self.console.reset_line()?;
        match self.cursor() {
            Some(point) => self.report(point),
            None => Ok(()),
        }
    }

    /// F2 : la position est lue AVANT le compte à rebours et c'est elle qui
    /// est échantillonnée, même si le pointeur a bougé entre-temps. Cela
    /// permet de viser un point puis de préparer l'écran (ouvrir un menu,
    /// survoler un bouton ailleurs) avant la capture. Ce n'est pas un bug.
    /// F2: the position is read BEFORE the countdown and that position is
    /// sampled, even if the pointer moved meanwhile. This lets the user aim at
    /// a point and then prepare the screen (open a menu, hover a button
    /// elsewhere) before the capture. This is not a bug.
    fn delayed_sample(&mut self) -> io::Result<()> {
        self.console.reset_line()?;
        let Some(point) = self.cursor() else {
            return Ok(());
        };

        for remaining in (1..=COUNTDOWN_SECONDS).rev() {
            self.console
                .overwrite_line(format!("{} at {},{}", remaining, point.x, point.y))?;
            thread::sleep(self.countdown_tick);
        }
        self.console.overwrite_line("")?;
        self.report(point)
    }

    /// Capture maintenant et affiche la couleur en `point`
    /// Captures now and prints the color at `point`
    fn report(&mut self, point: Point) -> io::Result<()> {
        let snapshot = match self.screen.capture() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::debug!("capture failed: {}", err);
                return Ok(());
            }
        };

        match snapshot.pixel_at(point) {
            Some(color) => self.console.line(sample_line(point, color)),
            None => {
                log::debug!(
                    "pointer {},{} is outside the {}x{} capture",
                    point.x,
                    point.y,
                    snapshot.width(),
                    snapshot.height()
                );
                Ok(())
            }
        }
    }

    fn open_in_editor(&mut self) -> io::Result<()> {
        let Some(editor) = self.editor.clone() else {
            return Ok(());
        };

        self.console.reset_line()?;
        self.console.line(format!("Opening {}", editor.display()))?;

        let snapshot = match self.screen.capture() {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::debug!("capture failed: {}", err);
                return Ok(());
            }
        };
        if let Err(err) = snapshot.save_png(&self.paths.temp_image) {
            log::debug!("cannot write {}: {}", self.paths.temp_image.display(), err);
            return Ok(());
        }
        if let Err(err) = editor::spawn_detached(&editor, &self.paths.temp_image) {
            log::debug!("cannot start {}: {}", editor.display(), err);
        }
        Ok(())
    }

    /// Invite, lit une ligne et affiche le résultat ou l'erreur
    /// Prompts, reads one line and prints the result or the error
    fn convert(
        &mut self,
        prompt: &str,
        is_back: fn(&str) -> bool,
        convert: fn(&str) -> Result<String, ColorError>,
    ) -> io::Result<Flow> {
        self.console.reset_line()?;
        self.console.prompt(prompt)?;

        let Some(line) = self.input.read_line()? else {
            // Fin de l'entrée standard / End of standard input
            self.console.line("")?;
            return Ok(Flow::Quit);
        };

        if is_back(&line) {
            self.console.erase_previous_line()?;
            return Ok(Flow::Continue);
        }

        match convert(&line) {
            Ok(text) => self.console.line(text)?,
            Err(err) => self.console.line(err)?,
        }
        Ok(Flow::Continue)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::{CaptureError, Snapshot};
    use image::{Rgba, RgbaImage};
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::path::Path;

    // -------------------------------------------------------------------------
    // Doubles de test / Test doubles
    // -------------------------------------------------------------------------

    /// Écran factice 4x3 : pixel (x, y) = (x*10, y*20, 7)
    /// Fake 4x3 screen: pixel (x, y) = (x*10, y*20, 7)
    struct FakeScreen {
        positions: RefCell<VecDeque<Point>>,
        cursor_reads: Cell<usize>,
        captures: Cell<usize>,
        fail_capture: bool,
    }

    impl FakeScreen {
        fn at(points: &[Point]) -> Self {
            Self {
                positions: RefCell::new(points.iter().copied().collect()),
                cursor_reads: Cell::new(0),
                captures: Cell::new(0),
                fail_capture: false,
            }
        }
    }

    impl Screen for &FakeScreen {
        fn cursor_position(&self) -> Result<Point, CaptureError> {
            self.cursor_reads.set(self.cursor_reads.get() + 1);
            let mut positions = self.positions.borrow_mut();
            // La dernière position reste valable / The last position sticks
            if positions.len() > 1 {
                Ok(positions.pop_front().unwrap())
            } else {
                positions.front().copied().ok_or(CaptureError::Unsupported)
            }
        }

        fn capture(&self) -> Result<Snapshot, CaptureError> {
            self.captures.set(self.captures.get() + 1);
            if self.fail_capture {
                return Err(CaptureError::Platform("no display".into()));
            }
            let image = RgbaImage::from_fn(4, 3, |x, y| Rgba([x as u8 * 10, y as u8 * 20, 7, 255]));
            Ok(Snapshot::from_image(image))
        }
    }

    struct ScriptedInput {
        keys: VecDeque<KeyEvent>,
        lines: VecDeque<String>,
    }

    impl ScriptedInput {
        /// Les touches sont suivies d'un Esc final
        /// Keys are followed by a final Esc
        fn new(keys: &[KeyCode], lines: &[&str]) -> Self {
            let mut keys: VecDeque<KeyEvent> =
                keys.iter().map(|code| KeyEvent::new(*code, KeyModifiers::NONE)).collect();
            keys.push_back(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
            Self {
                keys,
                lines: lines.iter().map(|line| format!("{}\n", line)).collect(),
            }
        }
    }

    impl Input for ScriptedInput {
        fn read_key(&mut self) -> io::Result<KeyEvent> {
            self.keys
                .pop_front()
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
        }

        fn read_line(&mut self) -> io::Result<Option<String>> {
            Ok(self.lines.pop_front())
        }
    }

    fn paths(dir: &Path) -> AppPaths {
        AppPaths::in_dir(dir, dir.join("cursor-checker"))
    }

    /// Exécute la session et renvoie la sortie sans la bannière initiale
    /// Runs the session and returns the output without the first banner
    fn run_session(
        screen: &FakeScreen,
        keys: &[KeyCode],
        lines: &[&str],
        dir: &Path,
        editor: Option<PathBuf>,
    ) -> String {
        let mut session = Session::new(screen, ScriptedInput::new(keys, lines), Vec::new(), paths(dir), editor)
            .with_countdown_tick(Duration::ZERO);
        session.run().unwrap();
        let output = String::from_utf8(session.into_output()).unwrap();
        let banner = format!("{}\n", config::banner(&paths(dir).executable));
        output.strip_prefix(&banner).unwrap().to_string()
    }

    // -------------------------------------------------------------------------
    // Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_key_bindings() {
        let press = |code| Action::from_key(&KeyEvent::new(code, KeyModifiers::NONE));
        assert_eq!(press(KeyCode::F(1)), Action::Sample);
        assert_eq!(press(KeyCode::F(2)), Action::DelayedSample);
        assert_eq!(press(KeyCode::F(3)), Action::OpenInEditor);
        assert_eq!(press(KeyCode::F(4)), Action::RgbToHex);
        assert_eq!(press(KeyCode::F(5)), Action::HexToRgb);
        assert_eq!(press(KeyCode::F(6)), Action::Clear);
        assert_eq!(press(KeyCode::Esc), Action::Quit);
        assert_eq!(press(KeyCode::F(7)), Action::Ignore);
        assert_eq!(press(KeyCode::Char('c')), Action::Ignore);
        assert_eq!(press(KeyCode::Enter), Action::Ignore);
        assert_eq!(
            Action::from_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Action::Quit
        );
    }

    #[test]
    fn test_is_back_rgb() {
        assert!(is_back_rgb("back\n"));
        assert!(is_back_rgb("  BACK "));
        assert!(is_back_rgb("Back,1,2"));
        assert!(!is_back_rgb("#back"));
        assert!(!is_back_rgb("backs"));
        assert!(!is_back_rgb("1,back,2"));
        assert!(!is_back_rgb(""));
    }

    #[test]
    fn test_is_back_hex() {
        assert!(is_back_hex("back\n"));
        assert!(is_back_hex(" b a c k "));
        assert!(is_back_hex("#BACK"));
        assert!(!is_back_hex("back,1"));
        assert!(!is_back_hex("back,zz"));
        assert!(!is_back_hex("##back"));
        assert!(!is_back_hex(""));
    }

    #[test]
    fn test_sample_line_format() {
        assert_eq!(
            sample_line(Point::new(12, 34), Color::new(255, 0, 16)),
            "Location (X,Y): 12,34. Color (R,G,B): 255,0,16. Hex: FF0010"
        );
    }

    #[test]
    fn test_banner_then_quit() {
        let dir = tempfile::tempdir().unwrap();
        let screen = FakeScreen::at(&[Point::new(0, 0)]);
        assert_eq!(run_session(&screen, &[], &[], dir.path(), None), "");
        assert_eq!(screen.captures.get(), 0);
    }

    #[test]
    fn test_sample() {
        let dir = tempfile::tempdir().unwrap();
        let screen = FakeScreen::at(&[Point::new(3, 2)]);
        let output = run_session(&screen, &[KeyCode::F(1)], &[], dir.path(), None);
        assert!(output.ends_with("Location (X,Y): 3,2. Color (R,G,B): 30,40,7. Hex: 1E2807\n"));
        assert_eq!(screen.captures.get(), 1);
    }

    #[test]
    fn test_sample_outside_capture_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let screen = FakeScreen::at(&[Point::new(4, 0)]);
        let output = run_session(&screen, &[KeyCode::F(1)], &[], dir.path(), None);
        assert!(!output.contains("Location"));
        assert_eq!(screen.captures.get(), 1);
    }

    #[test]
    fn test_sample_capture_failure_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let mut screen = FakeScreen::at(&[Point::new(1, 1)]);
        screen.fail_capture = true;
        let output = run_session(&screen, &[KeyCode::F(1), KeyCode::F(2)], &[], dir.path(), None);
        assert!(!output.contains("Location"));
    }

    #[test]
    fn test_delayed_sample_uses_position_before_countdown() {
        let dir = tempfile::tempdir().unwrap();
        // Le pointeur bouge vers (0,0) après la première lecture
        // The pointer moves to (0,0) after the first read
        let screen = FakeScreen::at(&[Point::new(1, 2), Point::new(0, 0)]);
        let output = run_session(&screen, &[KeyCode::F(2)], &[], dir.path(), None);

        assert!(output.contains("3 at 1,2"));
        assert!(output.contains("2 at 1,2"));
        assert!(output.contains("1 at 1,2"));
        assert!(output.ends_with("Location (X,Y): 1,2. Color (R,G,B): 10,40,7. Hex: 0A2807\n"));
        assert_eq!(screen.cursor_reads.get(), 1);
        assert_eq!(screen.captures.get(), 1);
    }

    #[test]
    fn test_open_without_editor_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let screen = FakeScreen::at(&[Point::new(0, 0)]);
        let output = run_session(&screen, &[KeyCode::F(3)], &[], dir.path(), None);
        assert_eq!(output, "");
        assert_eq!(screen.captures.get(), 0);
        assert!(!dir.path().join(config::TEMP_IMAGE_FILE).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_open_in_editor_writes_png() {
        let editor = PathBuf::from("/bin/true");
        if !editor.exists() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let screen = FakeScreen::at(&[Point::new(0, 0)]);
        let output = run_session(&screen, &[KeyCode::F(3)], &[], dir.path(), Some(editor));

        assert!(output.contains("Opening /bin/true\n"));
        assert_eq!(screen.captures.get(), 1);
        let saved = image::open(dir.path().join(config::TEMP_IMAGE_FILE)).unwrap().to_rgba8();
        assert_eq!(saved.dimensions(), (4, 3));
    }

    #[test]
    fn test_rgb_to_hex() {
        let dir = tempfile::tempdir().unwrap();
        let screen = FakeScreen::at(&[Point::new(0, 0)]);
        let keys = [KeyCode::F(4), KeyCode::F(4), KeyCode::F(4)];
        let output = run_session(&screen, &keys, &[" 10 , 20 , 30 ", "256,0,0", "1,2"], dir.path(), None);

        assert!(output.contains("R,G,B: Hex: 0A141E\n"));
        assert_eq!(output.matches("Error: Invalid RGB format\n").count(), 2);
    }

    #[test]
    fn test_hex_to_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let screen = FakeScreen::at(&[Point::new(0, 0)]);
        let keys = [KeyCode::F(5), KeyCode::F(5)];
        let output = run_session(&screen, &keys, &["#1a2b3c", "12345G"], dir.path(), None);

        assert!(output.contains("Hex: RGB: 26,43,60\n"));
        assert!(output.contains("Hex: Error: Invalid hex format\n"));
    }

    #[test]
    fn test_back_cancels_without_output() {
        let dir = tempfile::tempdir().unwrap();
        let screen = FakeScreen::at(&[Point::new(0, 0)]);
        let keys = [KeyCode::F(4), KeyCode::F(5)];
        let output = run_session(&screen, &keys, &["back", "BACK"], dir.path(), None);

        // Aucune ligne complète n'est écrite / No full line is written
        assert!(!output.contains('\n'));
        assert!(output.contains("R,G,B: "));
        // Deux effacements de la ligne d'invite (CSI 1 F, CSI 2 K)
        // Two prompt-line erasures (CSI 1 F, CSI 2 K)
        assert_eq!(output.matches("\x1b[1F\x1b[2K").count(), 2);
    }

    #[test]
    fn test_hex_back_with_extra_fields_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let screen = FakeScreen::at(&[Point::new(0, 0)]);
        let keys = [KeyCode::F(5), KeyCode::F(5)];
        let output = run_session(&screen, &keys, &["back,1", "back,zz"], dir.path(), None);

        assert_eq!(output.matches("Hex: Error: Invalid hex format\n").count(), 2);
        assert!(!output.contains("\x1b[1F"));
    }

    #[test]
    fn test_end_of_input_on_prompt_quits() {
        let dir = tempfile::tempdir().unwrap();
        let screen = FakeScreen::at(&[Point::new(0, 0)]);
        // Aucune ligne : la session s'arrête avant d'atteindre F1
        // No line: the session stops before reaching F1
        let output = run_session(&screen, &[KeyCode::F(4), KeyCode::F(1)], &[], dir.path(), None);
        assert!(!output.contains("Location"));
        assert_eq!(screen.captures.get(), 0);
    }

    #[test]
    fn test_clear_reprints_banner() {
        let dir = tempfile::tempdir().unwrap();
        let screen = FakeScreen::at(&[Point::new(0, 0)]);
        let output = run_session(&screen, &[KeyCode::F(6)], &[], dir.path(), None);
        assert!(output.contains("\x1b[2J"));
        assert!(output.contains(config::HELP_LINES[3]));
    }

    #[test]
    fn test_unknown_key_only_resets_line() {
        let dir = tempfile::tempdir().unwrap();
        let screen = FakeScreen::at(&[Point::new(0, 0)]);
        let output = run_session(&screen, &[KeyCode::Char('x'), KeyCode::F(9)], &[], dir.path(), None);
        assert_eq!(output, "\x1b[1G\x1b[1G");
        assert_eq!(screen.captures.get(), 0);
        assert_eq!(screen.cursor_reads.get(), 0);
    }
}
