//! Per-unit segment display state
//!
//! Each dual-digit unit caches the number it shows and the two digits
//! derived from it. The tens digit is suppressed (blank) when it is zero,
//! so 7 renders as " 7" and not "07".

use crate::digit::{Digit, EXTRA_INDICATOR};

/// Which digit position of a unit is being driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DigitPosition {
    /// Tens digit, lit by the left digit-enable line
    First,
    /// Ones digit, lit by the right digit-enable line
    Second,
}

impl DigitPosition {
    pub const fn other(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// Whether the multiplexer needs to alternate digit positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayMode {
    /// No unit has a tens digit; only the ones position is lit
    Single,
    /// At least one unit has a tens digit; positions alternate
    Double,
}

/// Cached contents of one segment unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SegmentDisplayState {
    cached_number: Option<u8>,
    digit_1: Digit,
    digit_2: Digit,
    extra_indicator_on: bool,
}

impl Default for SegmentDisplayState {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentDisplayState {
    /// A blank unit with the indicator off
    pub const fn new() -> Self {
        Self {
            cached_number: None,
            digit_1: Digit::BLANK,
            digit_2: Digit::BLANK,
            extra_indicator_on: false,
        }
    }

    /// Set the displayed number, or `None` to blank both digits
    ///
    /// Numbers above 99 keep their last two digits.
    pub fn set_number(&mut self, number: Option<u8>) {
        match number {
            Some(n) => {
                let n = n % 100;
                let (tens, ones) = Digit::split(n);
                self.cached_number = Some(n);
                self.digit_1 = if tens.value() == Some(0) {
                    Digit::BLANK
                } else {
                    tens
                };
                self.digit_2 = ones;
            }
            None => {
                self.cached_number = None;
                self.digit_1 = Digit::BLANK;
                self.digit_2 = Digit::BLANK;
            }
        }
    }

    pub fn number(&self) -> Option<u8> {
        self.cached_number
    }

    /// Tens digit (blank when zero or unset)
    pub fn digit_1(&self) -> Digit {
        self.digit_1
    }

    /// Ones digit (blank when unset)
    pub fn digit_2(&self) -> Digit {
        self.digit_2
    }

    pub fn set_extra_indicator(&mut self, on: bool) {
        self.extra_indicator_on = on;
    }

    pub fn extra_indicator(&self) -> bool {
        self.extra_indicator_on
    }

    /// True when the unit shows a tens digit
    pub fn needs_double(&self) -> bool {
        !self.digit_1.is_blank()
    }

    /// Blank the unit and clear its indicator
    pub fn turn_off(&mut self) {
        self.set_number(None);
        self.extra_indicator_on = false;
    }

    /// Byte to write for `position` under `mode`
    ///
    /// In single mode the first position is never lit. The indicator bit is
    /// merged into every pattern.
    pub fn pattern(&self, position: DigitPosition, mode: DisplayMode) -> u8 {
        let digit = match (position, mode) {
            (DigitPosition::First, DisplayMode::Single) => Digit::BLANK,
            (DigitPosition::First, DisplayMode::Double) => self.digit_1,
            (DigitPosition::Second, _) => self.digit_2,
        };
        digit.pattern() | self.indicator_bits()
    }

    /// Byte to write while blanking between phases
    pub fn blank_pattern(&self) -> u8 {
        Digit::BLANK.pattern() | self.indicator_bits()
    }

    fn indicator_bits(&self) -> u8 {
        if self.extra_indicator_on {
            EXTRA_INDICATOR
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn digit(v: u8) -> Digit {
        Digit::new(v).unwrap()
    }

    #[test]
    fn test_new_is_blank() {
        let state = SegmentDisplayState::new();
        assert_eq!(state.number(), None);
        assert!(state.digit_1().is_blank());
        assert!(state.digit_2().is_blank());
        assert!(!state.extra_indicator());
    }

    #[test]
    fn test_zero_suppression() {
        let mut state = SegmentDisplayState::new();
        state.set_number(Some(0));
        assert!(state.digit_1().is_blank());
        assert_eq!(state.digit_2(), digit(0));

        state.set_number(Some(10));
        assert_eq!(state.digit_1(), digit(1));
        assert_eq!(state.digit_2(), digit(0));
    }

    #[test]
    fn test_unset_blanks_both_digits() {
        let mut state = SegmentDisplayState::new();
        state.set_number(Some(42));
        state.set_number(None);
        assert!(state.digit_1().is_blank());
        assert!(state.digit_2().is_blank());
    }

    #[test]
    fn test_large_number_keeps_last_two_digits() {
        let mut state = SegmentDisplayState::new();
        state.set_number(Some(105));
        assert_eq!(state.number(), Some(5));
        assert!(state.digit_1().is_blank());
        assert_eq!(state.digit_2(), digit(5));
    }

    #[test]
    fn test_pattern_single_mode_blanks_first() {
        let mut state = SegmentDisplayState::new();
        state.set_number(Some(23));
        assert_eq!(state.pattern(DigitPosition::First, DisplayMode::Single), 0x00);
        assert_eq!(state.pattern(DigitPosition::First, DisplayMode::Double), 0x5B);
        assert_eq!(state.pattern(DigitPosition::Second, DisplayMode::Double), 0x4F);
    }

    #[test]
    fn test_indicator_merged_into_every_pattern() {
        let mut state = SegmentDisplayState::new();
        state.set_number(Some(7));
        state.set_extra_indicator(true);
        assert_eq!(state.pattern(DigitPosition::Second, DisplayMode::Single), 0x07 | 0x80);
        assert_eq!(state.blank_pattern(), 0x80);
    }

    #[test]
    fn test_turn_off_clears_indicator() {
        let mut state = SegmentDisplayState::new();
        state.set_number(Some(3));
        state.set_extra_indicator(true);
        state.turn_off();
        assert_eq!(state, SegmentDisplayState::new());
        assert_eq!(state.blank_pattern(), 0x00);
    }

    proptest! {
        #[test]
        fn prop_two_digit_numbers(n in 10u8..=99) {
            let mut state = SegmentDisplayState::new();
            state.set_number(Some(n));
            prop_assert_eq!(state.digit_1(), digit(n / 10));
            prop_assert_eq!(state.digit_2(), digit(n % 10));
            prop_assert!(state.needs_double());
        }

        #[test]
        fn prop_one_digit_numbers(n in 0u8..=9) {
            let mut state = SegmentDisplayState::new();
            state.set_number(Some(n));
            prop_assert!(state.digit_1().is_blank());
            prop_assert_eq!(state.digit_2(), digit(n));
            prop_assert!(!state.needs_double());
        }

        #[test]
        fn prop_set_number_idempotent(n in proptest::option::of(0u8..=99)) {
            let mut once = SegmentDisplayState::new();
            once.set_number(n);
            let mut twice = once;
            twice.set_number(n);
            prop_assert_eq!(once, twice);
        }
    }
}
