//! =============================================================================
//! COLOR.RS - Couleurs RGB et conversions hexadécimales
//! COLOR.RS - RGB colors and hexadecimal conversions
//! =============================================================================
//!
//! Ce module contient le type `Color` et les conversions RGB <-> hex
//! utilisées par l'échantillonnage et par les invites F4 / F5.
//! This module contains the `Color` type and the RGB <-> hex conversions
//! used by sampling and by the F4 / F5 prompts.

use std::fmt;

use thiserror::Error;

// =============================================================================
// ERREURS
// ERRORS
// =============================================================================

/// Erreurs de parsing d'une couleur saisie par l'utilisateur
/// Parse errors for a color typed by the user
///
/// Le message `Display` est exactement la ligne affichée dans la console.
/// The `Display` message is exactly the line printed to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Mauvais nombre de champs ou canal hors de [0, 255]
    /// Wrong field count or channel outside [0, 255]
    #[error("Error: Invalid RGB format")]
    InvalidRgb,

    /// Longueur différente de 6 ou caractère non hexadécimal
    /// Length other than 6 or non-hexadecimal character
    #[error("Error: Invalid hex format")]
    InvalidHex,
}

// =============================================================================
// TYPE COULEUR
// COLOR TYPE
// =============================================================================

/// Couleur 8 bits par canal, dans l'ordre R-G-B
/// 8-bit-per-channel color, in R-G-B order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Formate la couleur en 6 chiffres hexadécimaux majuscules, sans `#`
    /// Formats the color as 6 uppercase hex digits, without `#`
    ///
    /// # Returns
    /// Chaîne au format "RRGGBB" / String in "RRGGBB" format
    #[inline]
    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse un texte hexadécimal `RRGGBB` (casse indifférente)
    /// Parses a hexadecimal `RRGGBB` text (any case)
    ///
    /// Les espaces sont supprimés, ainsi qu'un `#` initial.
    /// Whitespace is removed, then one leading `#`.
    ///
    /// # Returns
    /// * `Ok(Color)` - si exactement 6 chiffres hex / if exactly 6 hex digits
    /// * `Err(ColorError::InvalidHex)` - sinon, jamais de résultat partiel / otherwise, never a partial result
    pub fn parse_hex(input: &str) -> Result<Self, ColorError> {
        let cleaned = strip_whitespace(input);
        let digits = cleaned.strip_prefix('#').unwrap_or(&cleaned);

        // from_str_radix accepte un '+' initial, on vérifie donc chaque caractère
        // from_str_radix accepts a leading '+', so every character is checked
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidHex);
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ColorError::InvalidHex)
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Parse un triplet décimal `R,G,B`
    /// Parses a decimal `R,G,B` triple
    ///
    /// Tous les espaces sont supprimés avant le découpage sur les virgules,
    /// donc " 10 , 20 , 30 " équivaut à "10,20,30".
    /// All whitespace is removed before splitting on commas,
    /// so " 10 , 20 , 30 " is the same as "10,20,30".
    pub fn parse_rgb(input: &str) -> Result<Self, ColorError> {
        let cleaned = strip_whitespace(input);
        let fields: Vec<&str> = cleaned.split(',').collect();
        if fields.len() != 3 {
            return Err(ColorError::InvalidRgb);
        }

        let mut channels = [0u8; 3];
        for (slot, field) in channels.iter_mut().zip(&fields) {
            let value: i64 = field.parse().map_err(|_| ColorError::InvalidRgb)?;
            *slot = u8::try_from(value).map_err(|_| ColorError::InvalidRgb)?;
        }
        let [r, g, b] = channels;
        Ok(Self::new(r, g, b))
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

/// Affiche "r,g,b" (forme décimale utilisée dans les lignes de résultat)
/// Displays "r,g,b" (decimal form used in result lines)
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

/// Supprime tous les caractères d'espacement
/// Removes every whitespace character
pub(crate) fn strip_whitespace(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

// =============================================================================
// TESTS
// =============================================================================
