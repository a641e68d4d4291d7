//! Property-based tests for the calculators and identifiers.

use chrono::NaiveDate;
use fisco::core::{AccessKey, AccessKeyParts, Rate};
use fisco::taxes::{cbs, icms, icms::Cst};
use proptest::prelude::*;
use rust_decimal::Decimal;

/// A base amount with cent precision, 0.00 to 99 999 999.99.
fn arb_base() -> impl Strategy<Value = Decimal> {
    (0u64..10_000_000_000u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

/// A percentage with 2-decimal precision in [0, 100].
fn arb_rate() -> impl Strategy<Value = Rate> {
    (0u32..=10_000u32).prop_map(|bp| Rate::new(Decimal::new(i64::from(bp), 2)).unwrap())
}

fn arb_parts() -> impl Strategy<Value = AccessKeyParts> {
    (
        11u8..=53,
        1u32..=999_999_999,
        0u16..=999,
        1u8..=9,
        0u32..=99_999_999,
        0u64..=99_999_999_999_999,
    )
        .prop_map(|(uf, number, series, emission, random, cnpj)| AccessKeyParts {
            uf_code: uf,
            issued: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            issuer: format!("{cnpj:014}"),
            model: "55".into(),
            series,
            number,
            emission_type: emission,
            random_code: random,
        })
}

proptest! {
    #[test]
    fn zero_base_always_zero_tax(rate in arb_rate()) {
        let r = icms::calculate(Decimal::ZERO, &Cst::FullyTaxed { rate }).unwrap();
        prop_assert_eq!(r.total(), Decimal::ZERO);

        let r = cbs::calculate(Decimal::ZERO, rate, None, None).unwrap();
        prop_assert_eq!(r.value, Decimal::ZERO);
    }

    #[test]
    fn zero_rate_always_zero_tax(base in arb_base()) {
        let r = icms::calculate(base, &Cst::FullyTaxed { rate: Rate::ZERO }).unwrap();
        prop_assert_eq!(r.total(), Decimal::ZERO);
    }

    #[test]
    fn reduced_base_never_exceeds_base(base in arb_base(), rate in arb_rate(), reduction in arb_rate()) {
        let r = icms::calculate(base, &Cst::ReducedBase { rate, reduction }).unwrap();
        prop_assert!(r.base <= base);
        prop_assert_eq!(r.base, base * reduction.complement());
    }

    #[test]
    fn negative_base_always_rejected(cents in 1u64..1_000_000_000, rate in arb_rate()) {
        let base = -Decimal::new(cents as i64, 2);
        let cst = Cst::FullyTaxed { rate };
        prop_assert!(icms::calculate(base, &cst).is_err());
        prop_assert!(cbs::calculate(base, rate, None, None).is_err());
    }

    #[test]
    fn cbs_deferred_never_exceeds_value(base in arb_base(), rate in arb_rate(), deferral in arb_rate()) {
        let r = cbs::calculate(base, rate, None, Some(deferral)).unwrap();
        prop_assert!(r.deferred <= r.value);
        prop_assert!(r.due() >= Decimal::ZERO);
    }

    #[test]
    fn substitution_total_is_sum_of_parts(base in arb_base(), rate in arb_rate(), st_rate in arb_rate(), markup in arb_rate()) {
        let r = icms::calculate(base, &Cst::TaxedWithSubstitution { rate, st_rate, markup }).unwrap();
        prop_assert_eq!(r.total(), r.value + r.st_value.unwrap());
        prop_assert!(r.st_base.unwrap() >= base);
    }

    #[test]
    fn rate_constructor_rejects_out_of_range(raw in -1_000_000i64..1_000_000) {
        let value = Decimal::new(raw, 2);
        let in_range = value >= Decimal::ZERO && value <= Decimal::ONE_HUNDRED;
        prop_assert_eq!(Rate::new(value).is_ok(), in_range);
    }

    #[test]
    fn composed_keys_parse_and_are_deterministic(parts in arb_parts()) {
        let a = parts.compose().unwrap();
        let b = parts.compose().unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(AccessKey::parse(a.as_str()).unwrap(), a);
    }

    #[test]
    fn flipping_a_payload_digit_is_caught_by_the_checksum(parts in arb_parts(), position in 0usize..43, bump in 1u8..=9) {
        use fisco::core::checksum::{ACCESS_KEY_WEIGHTS, mod11_check_digit};

        let key = parts.compose().unwrap();
        let mut digits: Vec<u8> = key.as_str().bytes().map(|b| b - b'0').collect();
        digits[position] = (digits[position] + bump) % 10;

        let required = mod11_check_digit(&digits[..43], &ACCESS_KEY_WEIGHTS);
        let tampered: String = digits.iter().map(|d| char::from(b'0' + d)).collect();

        if required == key.check_digit() {
            // mod-11 collapses remainders 0 and 1 onto digit 0; when the
            // flip lands there the key still parses
            prop_assert!(AccessKey::parse(&tampered).is_ok());
        } else {
            prop_assert!(AccessKey::parse(&tampered).is_err());
        }
    }

    #[test]
    fn flipping_the_check_digit_always_fails(parts in arb_parts(), bump in 1u8..=9) {
        let key = parts.compose().unwrap();
        let mut digits: Vec<u8> = key.as_str().bytes().collect();
        digits[43] = b'0' + (digits[43] - b'0' + bump) % 10;
        let tampered = String::from_utf8(digits).unwrap();
        prop_assert!(AccessKey::parse(&tampered).is_err());
    }
}
