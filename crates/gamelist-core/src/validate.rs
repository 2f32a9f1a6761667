use serde_json::{Map, Value};
use url::Url;

use crate::game::Game;

/// Message returned to clients for every rejected game.
pub const INVALID_GAME_MESSAGE: &str = "invalid game: missing or malformed required fields";

/// Path suffixes accepted for the `image` field. Matched case-sensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpeg", ".jpg", ".gif", ".png"];

/// Why a candidate was rejected.
///
/// Carried for logging only: `Display` always renders
/// [`INVALID_GAME_MESSAGE`] so clients never learn which field failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: Reason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    NotAnObject,
    Empty,
    Missing,
    WrongType,
    NotNumeric,
    NotAUrl,
    NotAnImage,
}

impl ValidationError {
    fn new(field: &'static str, reason: Reason) -> Self {
        Self { field, reason }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(INVALID_GAME_MESSAGE)
    }
}

impl std::error::Error for ValidationError {}

/// Check an untyped request body and, if every rule holds, return it as a
/// typed [`Game`]. Keys other than the five game fields are dropped.
pub fn validate_game(candidate: &Value) -> Result<Game, ValidationError> {
    let fields = match candidate {
        Value::Object(map) => map,
        _ => return Err(ValidationError::new("body", Reason::NotAnObject)),
    };
    if fields.is_empty() {
        return Err(ValidationError::new("body", Reason::Empty));
    }

    let name = required_text(fields, "name")?;
    let year = parse_year(fields.get("year"))?;
    let studio = required_text(fields, "studio")?;
    let genre = required_text(fields, "genre")?;
    let image = required_text(fields, "image")?;
    check_image_url(&image)?;

    Ok(Game {
        name,
        year,
        studio,
        genre,
        image,
    })
}

fn required_text(fields: &Map<String, Value>, field: &'static str) -> Result<String, ValidationError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(ValidationError::new(field, Reason::Missing)),
        Some(Value::String(s)) if s.is_empty() => Err(ValidationError::new(field, Reason::Empty)),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(ValidationError::new(field, Reason::WrongType)),
    }
}

/// Accepts a JSON integer, a float without a fractional part, or a string
/// of the form `[+-]?[0-9]+`.
fn parse_year(value: Option<&Value>) -> Result<i64, ValidationError> {
    const FIELD: &str = "year";
    match value {
        None | Some(Value::Null) => Err(ValidationError::new(FIELD, Reason::Missing)),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                // i64::MAX as f64 rounds up to 2^63, which does not fit.
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Ok(f as i64)
                },
                _ => Err(ValidationError::new(FIELD, Reason::NotNumeric)),
            }
        },
        Some(Value::String(s)) => parse_integer_literal(s)
            .ok_or_else(|| ValidationError::new(FIELD, Reason::NotNumeric)),
        Some(_) => Err(ValidationError::new(FIELD, Reason::NotNumeric)),
    }
}

fn parse_integer_literal(text: &str) -> Option<i64> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// The raw text must already be a clean URL: the parser silently strips or
/// escapes whitespace, so the extension is checked on both the stored text
/// and the parsed path.
fn check_image_url(image: &str) -> Result<(), ValidationError> {
    const FIELD: &str = "image";
    if image.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ValidationError::new(FIELD, Reason::NotAUrl));
    }
    let url = Url::parse(image).map_err(|_| ValidationError::new(FIELD, Reason::NotAUrl))?;
    if !url.has_host() {
        return Err(ValidationError::new(FIELD, Reason::NotAUrl));
    }
    let without_suffix = image.split(['?', '#']).next().unwrap_or(image);
    if !is_image_path(url.path()) || !is_image_path(without_suffix) {
        return Err(ValidationError::new(FIELD, Reason::NotAnImage));
    }
    Ok(())
}

/// Whether `path` ends in one of [`IMAGE_EXTENSIONS`].
pub fn is_image_path(path: &str) -> bool {
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
