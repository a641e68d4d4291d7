//! Modulo-11 check digit shared by fixed-width fiscal identifiers.

/// Compute the modulo-11 check digit over `digits`.
///
/// Weights are applied right-to-left, cycling through `weights`
/// (the access key uses 2..=9). A remainder of 0 or 1 maps to digit 0,
/// anything else to `11 - remainder`.
pub fn mod11_check_digit(digits: &[u8], weights: &[u32]) -> u8 {
    debug_assert!(!weights.is_empty());

    let sum: u32 = digits
        .iter()
        .rev()
        .zip(weights.iter().cycle())
        .map(|(&d, &w)| u32::from(d) * w)
        .sum();

    match sum % 11 {
        0 | 1 => 0,
        rem => (11 - rem) as u8,
    }
}

/// Weight cycle used by the 44-digit fiscal access key.
pub const ACCESS_KEY_WEIGHTS: [u32; 8] = [2, 3, 4, 5, 6, 7, 8, 9];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remainder_below_two_yields_zero() {
        // Single digit 0 with any weight: sum = 0, rem = 0
        assert_eq!(mod11_check_digit(&[0], &ACCESS_KEY_WEIGHTS), 0);
    }

    #[test]
    fn known_sequence() {
        // 1 * 2 = 2, rem 2 -> 11 - 2 = 9
        assert_eq!(mod11_check_digit(&[1], &ACCESS_KEY_WEIGHTS), 9);
        // digits 1,2 -> rightmost 2*2 + 1*3 = 7, rem 7 -> 4
        assert_eq!(mod11_check_digit(&[1, 2], &ACCESS_KEY_WEIGHTS), 4);
    }

    #[test]
    fn weight_cycle_wraps_after_eight_digits() {
        // Nine equal digits: the ninth (leftmost) reuses weight 2.
        let digits = [1u8; 9];
        let sum: u32 = 2 + 3 + 4 + 5 + 6 + 7 + 8 + 9 + 2;
        let expected = match sum % 11 {
            0 | 1 => 0,
            rem => (11 - rem) as u8,
        };
        assert_eq!(mod11_check_digit(&digits, &ACCESS_KEY_WEIGHTS), expected);
    }

    #[test]
    fn single_digit_change_moves_check_digit() {
        let a = [5u8, 3, 8, 1, 0, 2, 9, 4, 7, 6];
        let mut b = a;
        b[4] = 5;
        assert_ne!(
            mod11_check_digit(&a, &ACCESS_KEY_WEIGHTS),
            mod11_check_digit(&b, &ACCESS_KEY_WEIGHTS)
        );
    }
}
