//! Shared sample-aspect-ratio type
//!
//! ffprobe reports SAR as `N:D` while ffmpeg's `setsar` filter takes `N/D`.
//! Both forms go through this one parser so the verifier never compares raw
//! strings from two different tools.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SarParseError {
    #[error("Invalid SAR '{0}': expected N:D or N/D")]
    Malformed(String),

    #[error("Invalid SAR '{0}': denominator must be non-zero")]
    ZeroDenominator(String),
}

/// Sample aspect ratio as an exact rational.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sar {
    pub num: u32,
    pub den: u32,
}

impl Sar {
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Render in ffmpeg filter syntax (`setsar=8/9`).
    pub fn as_filter(&self) -> String {
        format!("{}/{}", self.num, self.den)
    }
}

impl fmt::Display for Sar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.num, self.den)
    }
}

impl PartialEq for Sar {
    /// Cross-multiplied equality, so an unreduced probe result like `16:18`
    /// still matches `8:9`.
    fn eq(&self, other: &Self) -> bool {
        self.num as u64 * other.den as u64 == other.num as u64 * self.den as u64
    }
}

impl Eq for Sar {}

impl FromStr for Sar {
    type Err = SarParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let sep = if s.contains(':') {
            ':'
        } else if s.contains('/') {
            '/'
        } else {
            return Err(SarParseError::Malformed(s.to_string()));
        };

        let parts: Vec<&str> = s.split(sep).collect();
        if parts.len() != 2 {
            return Err(SarParseError::Malformed(s.to_string()));
        }

        let num = parts[0]
            .parse::<u32>()
            .map_err(|_| SarParseError::Malformed(s.to_string()))?;
        let den = parts[1]
            .parse::<u32>()
            .map_err(|_| SarParseError::Malformed(s.to_string()))?;

        if den == 0 {
            return Err(SarParseError::ZeroDenominator(s.to_string()));
        }

        Ok(Sar { num, den })
    }
}

/// Operator aspect-ratio decision. Closed set: the pipeline never accepts a
/// freeform ratio, only these two NTSC pixel geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectChoice {
    /// Option A: 4:3 display, SAR 8:9.
    FourByThree,
    /// Option B: anamorphic 16:9 display, SAR 40:33.
    SixteenByNine,
}

impl AspectChoice {
    pub const fn sar(self) -> Sar {
        match self {
            AspectChoice::FourByThree => Sar::new(8, 9),
            AspectChoice::SixteenByNine => Sar::new(40, 33),
        }
    }

    /// Short label used in candidate file names and the summary report.
    pub const fn label(self) -> &'static str {
        match self {
            AspectChoice::FourByThree => "4x3",
            AspectChoice::SixteenByNine => "16x9",
        }
    }

    /// Map a single prompt keystroke to a choice, case-insensitive.
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_uppercase() {
            'A' => Some(AspectChoice::FourByThree),
            'B' => Some(AspectChoice::SixteenByNine),
            _ => None,
        }
    }
}

impl fmt::Display for AspectChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (SAR {})", self.label(), self.sar())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_separators() {
        let cases: &[(&str, u32, u32)] = &[
            ("8:9", 8, 9),
            ("8/9", 8, 9),
            ("40:33", 40, 33),
            ("40/33", 40, 33),
            ("1:1", 1, 1),
            (" 8:9 ", 8, 9),
        ];

        for (input, num, den) in cases {
            let sar = input.parse::<Sar>().unwrap();
            assert_eq!(sar.num, *num, "num mismatch for {:?}", input);
            assert_eq!(sar.den, *den, "den mismatch for {:?}", input);
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "8", "8:9:1", "8/9/1", "a:b", "-8:9", "8.5:9"] {
            assert!(input.parse::<Sar>().is_err(), "{:?} should not parse", input);
        }
        assert_eq!(
            "8:0".parse::<Sar>(),
            Err(SarParseError::ZeroDenominator("8:0".to_string()))
        );
    }

    #[test]
    fn test_cross_multiplied_equality() {
        assert_eq!(Sar::new(8, 9), Sar::new(16, 18));
        assert_eq!(Sar::new(40, 33), Sar::new(80, 66));
        assert_ne!(Sar::new(8, 9), Sar::new(40, 33));
        assert_ne!(Sar::new(1, 1), Sar::new(8, 9));
    }

    #[test]
    fn test_probed_form_matches_filter_form() {
        // The stored "N/D" and the probed "N:D" must compare equal.
        let stored = "8/9".parse::<Sar>().unwrap();
        let probed = "8:9".parse::<Sar>().unwrap();
        assert_eq!(stored, probed);
    }

    #[test]
    fn test_display_and_filter_forms() {
        let sar = Sar::new(40, 33);
        assert_eq!(sar.to_string(), "40:33");
        assert_eq!(sar.as_filter(), "40/33");
    }

    #[test]
    fn test_choice_constants() {
        assert_eq!(AspectChoice::FourByThree.sar(), Sar::new(8, 9));
        assert_eq!(AspectChoice::SixteenByNine.sar(), Sar::new(40, 33));
        assert_eq!(AspectChoice::FourByThree.label(), "4x3");
        assert_eq!(AspectChoice::SixteenByNine.label(), "16x9");
    }

    #[test]
    fn test_choice_from_key() {
        assert_eq!(AspectChoice::from_key('a'), Some(AspectChoice::FourByThree));
        assert_eq!(AspectChoice::from_key('A'), Some(AspectChoice::FourByThree));
        assert_eq!(
            AspectChoice::from_key('b'),
            Some(AspectChoice::SixteenByNine)
        );
        assert_eq!(
            AspectChoice::from_key('B'),
            Some(AspectChoice::SixteenByNine)
        );
        assert_eq!(AspectChoice::from_key('c'), None);
        assert_eq!(AspectChoice::from_key('1'), None);
        assert_eq!(AspectChoice::from_key(' '), None);
    }
}
