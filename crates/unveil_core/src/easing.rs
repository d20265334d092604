//! Easing functions
//!
//! Timing functions for CSS transitions and surface animations, expressed as
//! their CSS names. `cubic-bezier(x1, y1, x2, y2)` is accepted for custom curves.

use std::fmt;
use std::str::FromStr;

use nom::{
    bytes::complete::tag_no_case,
    character::complete::{char, multispace0},
    combinator::all_consuming,
    error::ParseError as NomParseError,
    sequence::{delimited, preceded, tuple},
    Finish, IResult,
};
use serde::{Deserialize, Serialize};

use crate::length::{format_number, parse_number};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Easing {
    Linear,
    Ease,
    EaseIn,
    #[default]
    EaseOut,
    EaseInOut,
    CubicBezier(f32, f32, f32, f32),
}

impl fmt::Display for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Easing::Linear => f.write_str("linear"),
            Easing::Ease => f.write_str("ease"),
            Easing::EaseIn => f.write_str("ease-in"),
            Easing::EaseOut => f.write_str("ease-out"),
            Easing::EaseInOut => f.write_str("ease-in-out"),
            Easing::CubicBezier(x1, y1, x2, y2) => write!(
                f,
                "cubic-bezier({}, {}, {}, {})",
                format_number(x1),
                format_number(y1),
                format_number(x2),
                format_number(y2)
            ),
        }
    }
}

/// Error returned for unrecognized easing names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEasingError(pub String);

impl fmt::Display for ParseEasingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown easing: {:?}", self.0)
    }
}

impl std::error::Error for ParseEasingError {}

fn comma<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, char, E> {
    delimited(multispace0, char(','), multispace0)(input)
}

fn parse_cubic_bezier(input: &str) -> Option<Easing> {
    let args = tuple((
        parse_number,
        preceded(comma, parse_number),
        preceded(comma, parse_number),
        preceded(comma, parse_number),
    ));
    let result: Result<_, nom::error::Error<&str>> = all_consuming(preceded(
        tag_no_case("cubic-bezier"),
        delimited(
            tuple((multispace0, char('('), multispace0)),
            args,
            tuple((multispace0, char(')'))),
        ),
    ))(input)
    .finish();

    let (_, (x1, y1, x2, y2)) = result.ok()?;
    // x control points must stay within [0, 1] for the curve to be a function
    if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
        return None;
    }
    Some(Easing::CubicBezier(x1, y1, x2, y2))
}

impl FromStr for Easing {
    type Err = ParseEasingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        match name.to_ascii_lowercase().as_str() {
            "linear" => Ok(Easing::Linear),
            "ease" => Ok(Easing::Ease),
            "ease-in" => Ok(Easing::EaseIn),
            "ease-out" => Ok(Easing::EaseOut),
            "ease-in-out" => Ok(Easing::EaseInOut),
            _ => parse_cubic_bezier(name).ok_or_else(|| ParseEasingError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Easing {
    type Error = ParseEasingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Easing> for String {
    fn from(easing: Easing) -> Self {
        easing.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_round_trip() {
        for name in ["linear", "ease", "ease-in", "ease-out", "ease-in-out"] {
            let easing: Easing = name.parse().unwrap();
            assert_eq!(easing.to_string(), name);
        }
    }

    #[test]
    fn test_cubic_bezier_parse() {
        let easing: Easing = "cubic-bezier(0.77, 0, 0.175, 1)".parse().unwrap();
        assert_eq!(easing, Easing::CubicBezier(0.77, 0.0, 0.175, 1.0));
        assert_eq!(easing.to_string(), "cubic-bezier(0.77, 0, 0.175, 1)");
    }

    #[test]
    fn test_invalid_easing() {
        assert!("bouncy".parse::<Easing>().is_err());
        assert!("cubic-bezier(1.5, 0, 0.5, 1)".parse::<Easing>().is_err());
        assert!("cubic-bezier(0.5, 0)".parse::<Easing>().is_err());
    }
}
