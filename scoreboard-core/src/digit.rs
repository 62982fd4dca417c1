//! Seven-segment digit encoding
//!
//! Maps a decimal digit (or blank) to the byte written to the segment
//! port expander. Bit layout, LSB first: a b c d e f g, with bit 7 reserved
//! for the unit's extra indicator LED.

/// Bit OR'ed into a segment pattern to light the extra indicator
pub const EXTRA_INDICATOR: u8 = 0x80;

/// Segment pattern for an unlit digit
pub const BLANK_PATTERN: u8 = 0x00;

/// Segment patterns for 0-9
const DIGIT_PATTERNS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];

/// Raw value used internally for a blank digit
const BLANK_VALUE: u8 = 10;

/// A value was passed to the encoder that is neither 0-9 nor blank
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidDigit(pub u8);

/// A single displayable digit: 0-9 or blank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Digit(u8);

impl Digit {
    /// The unlit digit
    pub const BLANK: Self = Self(BLANK_VALUE);

    /// Create a digit from a value in 0-9
    pub const fn new(value: u8) -> Result<Self, InvalidDigit> {
        if value < BLANK_VALUE {
            Ok(Self(value))
        } else {
            Err(InvalidDigit(value))
        }
    }

    /// Tens and ones digits of `n % 100`
    pub(crate) const fn split(n: u8) -> (Self, Self) {
        let n = n % 100;
        (Self(n / 10), Self(n % 10))
    }

    /// Numeric value, or `None` for blank
    pub const fn value(self) -> Option<u8> {
        if self.0 < BLANK_VALUE {
            Some(self.0)
        } else {
            None
        }
    }

    pub const fn is_blank(self) -> bool {
        self.0 >= BLANK_VALUE
    }

    /// Hardware segment pattern for this digit
    pub const fn pattern(self) -> u8 {
        match self.value() {
            Some(v) => DIGIT_PATTERNS[v as usize],
            None => BLANK_PATTERN,
        }
    }
}

/// Encode a raw digit value (0-9) to its segment pattern
pub const fn encode(value: u8) -> Result<u8, InvalidDigit> {
    match Digit::new(value) {
        Ok(digit) => Ok(digit.pattern()),
        Err(e) => Err(e),
    }
}

/// Segment pattern for a blank digit
pub const fn encode_blank() -> u8 {
    Digit::BLANK.pattern()
}
