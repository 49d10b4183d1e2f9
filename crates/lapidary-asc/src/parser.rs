//! Facet-diagram parsing: line regions, then a token state machine.

use crate::error::AscError;
use crate::lexer::{tokenize, Token};
use crate::Result;

/// A parsed facet diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetProgram {
    /// Index gear: the denominator turning facet indices into fractions
    /// of a full turn about the stone's main axis.
    pub full_rotation: u32,
    /// Facet sets in file order.
    pub facet_sets: Vec<FacetSet>,
    /// Prose from `H ` lines, marker stripped.
    pub header: String,
    /// Prose from `F ` lines, marker stripped.
    pub footer: String,
}

impl FacetProgram {
    /// Rotation about the main axis for one facet index, in degrees.
    pub fn rotation_degrees(&self, index: i64) -> f64 {
        index as f64 / self.full_rotation as f64 * 360.0
    }
}

/// One `a` instruction: a cutting plane replicated at several indices.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetSet {
    /// Tilt from the horizontal datum, degrees. Negative file values have
    /// already been normalized by adding 180.
    pub angle: f64,
    /// Perpendicular distance of the cutting plane from the main axis.
    pub radius: f64,
    /// Positions around the index gear at which this plane is applied.
    pub indices: Vec<i64>,
}

impl FacetSet {
    fn new() -> Self {
        FacetSet {
            angle: 0.0,
            radius: 0.0,
            indices: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Comment,
    Angle,
    Radius,
    Index,
}

/// Parses facet-diagram text into a [`FacetProgram`].
///
/// The first line starting with `a` begins the instruction region. Before
/// it, `g <n>` lines set the index gear and `H ` lines accumulate header
/// prose; inside it, `F ` lines accumulate footer prose and everything
/// else is instruction text.
pub fn parse(text: &str) -> Result<FacetProgram> {
    let mut full_rotation: Option<u32> = None;
    let mut header_lines: Vec<&str> = Vec::new();
    let mut footer_lines: Vec<&str> = Vec::new();
    let mut instruction_lines: Vec<&str> = Vec::new();
    let mut in_instructions = false;

    for line in text.lines() {
        if in_instructions {
            if let Some(rest) = line.strip_prefix("F ") {
                footer_lines.push(rest);
            } else {
                instruction_lines.push(line);
            }
        } else if line.starts_with('g') {
            full_rotation = Some(parse_gear(line)?);
        } else if let Some(rest) = line.strip_prefix("H ") {
            header_lines.push(rest);
        } else if line.starts_with('a') {
            in_instructions = true;
            instruction_lines.push(line);
        }
    }

    if !in_instructions {
        return Err(AscError::NoInstructions);
    }
    let full_rotation = full_rotation.ok_or(AscError::MissingRotation)?;

    let facet_sets = run_machine(tokenize(&instruction_lines.join("\n")))?;
    Ok(FacetProgram {
        full_rotation,
        facet_sets,
        header: header_lines.join("\n").trim().to_string(),
        footer: footer_lines.join("\n").trim().to_string(),
    })
}

fn parse_gear(line: &str) -> Result<u32> {
    let invalid = || AscError::InvalidRotation {
        line: line.to_string(),
    };
    let value: i64 = line
        .split_whitespace()
        .nth(1)
        .ok_or_else(invalid)?
        .parse()
        .map_err(|_| invalid())?;
    u32::try_from(value)
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(invalid)
}

/// Interprets the instruction tokens.
///
/// Facet names introduced by `n` are discarded before anything else is
/// considered, because a name can be any word at all, including one of
/// the special letters. Comments run from `G` to the end of the line.
/// A bare number is only meaningful while a facet set is open.
fn run_machine(tokens: Vec<Token>) -> Result<Vec<FacetSet>> {
    let mut sets: Vec<FacetSet> = Vec::new();
    let mut state = State::Idle;
    let mut tokens = tokens.into_iter();

    while let Some(token) = tokens.next() {
        let word = match token {
            Token::Newline => {
                if state == State::Comment {
                    state = State::Idle;
                }
                continue;
            }
            Token::Word(word) => word,
        };
        if state == State::Comment {
            continue;
        }

        match word.as_str() {
            "a" => {
                if matches!(state, State::Angle | State::Radius) {
                    return Err(AscError::UnterminatedFacetSet);
                }
                sets.push(FacetSet::new());
                state = State::Angle;
                continue;
            }
            "n" => {
                if matches!(state, State::Angle | State::Radius) {
                    return Err(AscError::UnterminatedFacetSet);
                }
                // The name itself, whatever it may be.
                let _ = tokens.next();
                state = State::Index;
                continue;
            }
            "G" => {
                if matches!(state, State::Angle | State::Radius) {
                    return Err(AscError::UnterminatedFacetSet);
                }
                state = State::Comment;
                continue;
            }
            _ => {}
        }

        match state {
            State::Idle => {
                return Err(AscError::UnexpectedToken { token: word });
            }
            State::Comment => continue,
            State::Angle => {
                let mut angle = parse_number(&word, "a facet angle")?;
                if angle < 0.0 {
                    angle += 180.0;
                }
                if let Some(set) = sets.last_mut() {
                    set.angle = angle;
                }
                state = State::Radius;
            }
            State::Radius => {
                let radius = parse_number(&word, "a facet radius")?;
                if let Some(set) = sets.last_mut() {
                    set.radius = radius;
                }
                state = State::Index;
            }
            State::Index => {
                let index: i64 = word.parse().map_err(|_| AscError::InvalidNumber {
                    expected: "a facet index",
                    token: word.clone(),
                })?;
                match sets.last_mut() {
                    Some(set) => set.indices.push(index),
                    None => return Err(AscError::UnexpectedToken { token: word }),
                }
            }
        }
    }

    if matches!(state, State::Angle | State::Radius) {
        return Err(AscError::UnterminatedFacetSet);
    }
    Ok(sets)
}

fn parse_number(word: &str, expected: &'static str) -> Result<f64> {
    word.parse().map_err(|_| AscError::InvalidNumber {
        expected,
        token: word.to_string(),
    })
}
