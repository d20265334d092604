//! CSS length values
//!
//! Distances for transforms and intersection root margins. Parsed with nom,
//! accepting `px`, `%`, `rem`, `em`, `vh` and `vw` units. A unitless number
//! is treated as pixels.

use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{char, digit1, multispace0, multispace1, one_of},
    combinator::{all_consuming, map_opt, opt, recognize, value},
    error::ParseError as NomParseError,
    multi::separated_list1,
    sequence::{delimited, pair, tuple},
    Finish, IResult,
};
use serde::{Deserialize, Serialize};

/// A CSS length
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Length {
    Px(f32),
    Percent(f32),
    Rem(f32),
    Em(f32),
    Vh(f32),
    Vw(f32),
}

#[derive(Clone, Copy)]
enum Unit {
    Px,
    Percent,
    Rem,
    Em,
    Vh,
    Vw,
}

impl Length {
    pub const ZERO: Length = Length::Px(0.0);

    /// The numeric component, regardless of unit
    pub fn amount(&self) -> f32 {
        match *self {
            Length::Px(v)
            | Length::Percent(v)
            | Length::Rem(v)
            | Length::Em(v)
            | Length::Vh(v)
            | Length::Vw(v) => v,
        }
    }

    /// Same unit, opposite sign
    pub fn negate(&self) -> Length {
        self.map_amount(|v| -v)
    }

    fn map_amount(&self, f: impl Fn(f32) -> f32) -> Length {
        match *self {
            Length::Px(v) => Length::Px(f(v)),
            Length::Percent(v) => Length::Percent(f(v)),
            Length::Rem(v) => Length::Rem(f(v)),
            Length::Em(v) => Length::Em(f(v)),
            Length::Vh(v) => Length::Vh(f(v)),
            Length::Vw(v) => Length::Vw(f(v)),
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::ZERO
    }
}

/// Format a number without a trailing `.0` and without negative zero
pub(crate) fn format_number(v: f32) -> String {
    if v == 0.0 {
        "0".to_string()
    } else {
        format!("{v}")
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self {
            Length::Px(_) => "px",
            Length::Percent(_) => "%",
            Length::Rem(_) => "rem",
            Length::Em(_) => "em",
            Length::Vh(_) => "vh",
            Length::Vw(_) => "vw",
        };
        write!(f, "{}{}", format_number(self.amount()), unit)
    }
}

/// Parse a signed decimal number
///
/// Exponents are not accepted, so `2em` parses as two `em`.
pub(crate) fn parse_number<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, f32, E> {
    map_opt(
        recognize(tuple((
            opt(one_of("+-")),
            alt((
                recognize(pair(digit1, opt(pair(char('.'), opt(digit1))))),
                recognize(pair(char('.'), digit1)),
            )),
        ))),
        |s: &str| s.parse::<f32>().ok(),
    )(input)
}

fn parse_unit<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Unit, E> {
    alt((
        value(Unit::Px, tag_no_case("px")),
        value(Unit::Percent, tag("%")),
        value(Unit::Rem, tag_no_case("rem")),
        value(Unit::Em, tag_no_case("em")),
        value(Unit::Vh, tag_no_case("vh")),
        value(Unit::Vw, tag_no_case("vw")),
    ))(input)
}

/// Parse a single length with an optional unit suffix
fn parse_length<'a, E: NomParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Length, E> {
    let (input, amount) = parse_number(input)?;
    let (input, unit) = opt(parse_unit)(input)?;

    let length = match unit.unwrap_or(Unit::Px) {
        Unit::Px => Length::Px(amount),
        Unit::Percent => Length::Percent(amount),
        Unit::Rem => Length::Rem(amount),
        Unit::Em => Length::Em(amount),
        Unit::Vh => Length::Vh(amount),
        Unit::Vw => Length::Vw(amount),
    };
    Ok((input, length))
}

/// Error returned when a length string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLengthError(pub String);

impl fmt::Display for ParseLengthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid CSS length: {:?}", self.0)
    }
}

impl std::error::Error for ParseLengthError {}

impl FromStr for Length {
    type Err = ParseLengthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        all_consuming(delimited(
            multispace0,
            parse_length::<nom::error::Error<&str>>,
            multispace0,
        ))(s)
        .finish()
        .map(|(_, length)| length)
        .map_err(|_| ParseLengthError(s.to_string()))
    }
}

impl TryFrom<String> for Length {
    type Error = ParseLengthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Length> for String {
    fn from(length: Length) -> Self {
        length.to_string()
    }
}

/// Intersection root margin in CSS shorthand order (top, right, bottom, left)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RootMargin {
    pub top: Length,
    pub right: Length,
    pub bottom: Length,
    pub left: Length,
}

impl RootMargin {
    /// Same margin on all four sides
    pub fn uniform(length: Length) -> Self {
        Self {
            top: length,
            right: length,
            bottom: length,
            left: length,
        }
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

impl FromStr for RootMargin {
    type Err = ParseLengthError;

    /// Parse 1-4 space-separated lengths using CSS shorthand expansion
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed: Result<(&str, Vec<Length>), nom::error::Error<&str>> = all_consuming(
            delimited(
                multispace0,
                separated_list1(multispace1, parse_length),
                multispace0,
            ),
        )(s)
        .finish();

        let values = match parsed {
            Ok((_, values)) => values,
            Err(_) => return Err(ParseLengthError(s.to_string())),
        };

        let margin = match values.as_slice() {
            [all] => RootMargin::uniform(*all),
            [vertical, horizontal] => RootMargin {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            },
            [top, horizontal, bottom] => RootMargin {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            },
            [top, right, bottom, left] => RootMargin {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            },
            _ => return Err(ParseLengthError(s.to_string())),
        };
        Ok(margin)
    }
}

impl TryFrom<String> for RootMargin {
    type Error = ParseLengthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RootMargin> for String {
    fn from(margin: RootMargin) -> Self {
        margin.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!("20px".parse::<Length>(), Ok(Length::Px(20.0)));
        assert_eq!("100%".parse::<Length>(), Ok(Length::Percent(100.0)));
        assert_eq!("1.5rem".parse::<Length>(), Ok(Length::Rem(1.5)));
        assert_eq!("2em".parse::<Length>(), Ok(Length::Em(2.0)));
        assert_eq!("-10vh".parse::<Length>(), Ok(Length::Vh(-10.0)));
        assert_eq!("50VW".parse::<Length>(), Ok(Length::Vw(50.0)));
        assert_eq!(" 12 ".parse::<Length>(), Ok(Length::Px(12.0)));
        assert_eq!(".5px".parse::<Length>(), Ok(Length::Px(0.5)));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<Length>().is_err());
        assert!("px".parse::<Length>().is_err());
        assert!("10 px".parse::<Length>().is_err());
        assert!("10pt".parse::<Length>().is_err());
    }

    #[test]
    fn test_display_and_negate() {
        assert_eq!(Length::Px(20.0).to_string(), "20px");
        assert_eq!(Length::Percent(100.0).negate().to_string(), "-100%");
        assert_eq!(Length::Px(-8.0).negate().to_string(), "8px");
        assert_eq!(Length::Px(0.0).negate().to_string(), "0px");
        assert_eq!(Length::Rem(0.25).to_string(), "0.25rem");
    }

    #[test]
    fn test_root_margin_shorthand() {
        let one: RootMargin = "10px".parse().unwrap();
        assert_eq!(one, RootMargin::uniform(Length::Px(10.0)));

        let two: RootMargin = "0px 5%".parse().unwrap();
        assert_eq!(two.right, Length::Percent(5.0));
        assert_eq!(two.bottom, Length::Px(0.0));

        let four: RootMargin = "0px 0px -10% 0px".parse().unwrap();
        assert_eq!(four.bottom, Length::Percent(-10.0));
        assert_eq!(four.to_string(), "0px 0px -10% 0px");

        assert!("1px 2px 3px 4px 5px".parse::<RootMargin>().is_err());
        assert!("".parse::<RootMargin>().is_err());
    }
}
