//! Motion direction

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Transform axis a direction moves along
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Direction {
    pub fn axis(&self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Y,
            Direction::Left | Direction::Right => Axis::X,
        }
    }

    /// -1 for up/left, +1 for down/right
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Up | Direction::Left => -1.0,
            Direction::Down | Direction::Right => 1.0,
        }
    }

    /// Parse a direction name, mapping unknown names to `None`
    ///
    /// `top`/`bottom` are accepted as aliases for `up`/`down`.
    pub fn parse_lenient(name: &str) -> Option<Direction> {
        match name.parse() {
            Ok(direction) => Some(direction),
            Err(_) => {
                if !name.trim().is_empty() {
                    tracing::debug!("Unknown direction {:?}, using no transform", name);
                }
                None
            }
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError(pub String);

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown direction: {:?}", self.0)
    }
}

impl std::error::Error for ParseDirectionError {}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "top" => Ok(Direction::Up),
            "down" | "bottom" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// `translateX(..)` / `translateY(..)` for a direction's axis
pub(crate) fn translate_along(axis: Axis, amount: impl fmt::Display) -> String {
    match axis {
        Axis::X => format!("translateX({amount})"),
        Axis::Y => format!("translateY({amount})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("Up".parse(), Ok(Direction::Up));
        assert_eq!("bottom".parse(), Ok(Direction::Down));
        assert!("diagonal".parse::<Direction>().is_err());
    }

    #[test]
    fn test_lenient_parse() {
        assert_eq!(Direction::parse_lenient("left"), Some(Direction::Left));
        assert_eq!(Direction::parse_lenient("sideways"), None);
        assert_eq!(Direction::parse_lenient(""), None);
    }

    #[test]
    fn test_axis_and_sign() {
        assert_eq!(Direction::Left.axis(), Axis::X);
        assert_eq!(Direction::Down.axis(), Axis::Y);
        assert_eq!(Direction::Up.sign(), -1.0);
        assert_eq!(Direction::Right.sign(), 1.0);
    }
}
