//! Psychological price calculation.
//!
//! Prices start from a random base, get a niche multiplier, clamp to
//! [5, 120], and end in `.99` or `.95`. This module is the single source of
//! prices - generated copy quotes the same number it produced, so the
//! "was/now" pair in a description always matches the variant price pushed
//! to the store.

use rand::Rng;
use rust_decimal::Decimal;
use storeforge_core::Niche;

/// Inclusive clamp range for every generated price.
pub const MIN_PRICE: Decimal = Decimal::from_parts(5, 0, 0, false, 0);
/// Upper clamp bound.
pub const MAX_PRICE: Decimal = Decimal::from_parts(120, 0, 0, false, 0);

/// Per-variant price growth: variant `n` costs `base * (1 + n * 0.12)`.
const VARIANT_STEP_PERCENT: i64 = 12;

/// Compare-at markup applied to the default variant (price × 1.3).
const COMPARE_AT_PERCENT: i64 = 130;

/// Niche multipliers applied to the random base price.
///
/// Data, not logic: unlisted niches fall through to 1.0.
const NICHE_MULTIPLIERS: &[(&str, i64)] = &[
    // (niche, multiplier in hundredths)
    ("pets", 120),
    ("beauty", 140),
    ("fitness", 130),
    ("tech", 180),
    ("home", 110),
    ("fashion", 125),
];

/// Compute a psychological price for a niche/index pair.
///
/// `base = random(8..=53)`, times the niche multiplier (1.0 for unlisted
/// niches), clamped to [[`MIN_PRICE`], [`MAX_PRICE`]], then rounded:
/// below 20 → `floor + .99`, below 50 → `floor + .95`, else `floor + .99`.
/// The index is accepted for call-site symmetry with the content and image
/// selectors; the base is random by design.
#[must_use]
pub fn calculate(niche: &Niche, _index: usize) -> Decimal {
    let base = i64::from(rand::rng().random_range(8u8..=53));
    let multiplier = NICHE_MULTIPLIERS
        .iter()
        .find(|(key, _)| *key == niche.as_str())
        .map_or(100, |(_, m)| *m);

    let raw = Decimal::from(base) * Decimal::new(multiplier, 2);
    round_psychological(raw.clamp(MIN_PRICE, MAX_PRICE))
}

/// Price for a logical variant: `base * (1 + variant_index * 0.12)`,
/// re-rounded and re-clamped so bundles never escape the price band.
#[must_use]
pub fn variant_price(base: Decimal, variant_index: usize) -> Decimal {
    let steps = i64::try_from(variant_index).unwrap_or(i64::MAX / VARIANT_STEP_PERCENT);
    let scale = Decimal::new(100 + steps * VARIANT_STEP_PERCENT, 2);
    round_psychological((base * scale).clamp(MIN_PRICE, MAX_PRICE))
}

/// Compare-at price for the default variant: price × 1.3, kept at 2dp.
#[must_use]
pub fn compare_at(price: Decimal) -> Decimal {
    (price * Decimal::new(COMPARE_AT_PERCENT, 2)).round_dp(2)
}

/// Apply the `.99`/`.95` ending rule.
fn round_psychological(price: Decimal) -> Decimal {
    let whole = price.floor();
    if price < Decimal::from(20) {
        whole + Decimal::new(99, 2)
    } else if price < Decimal::from(50) {
        whole + Decimal::new(95, 2)
    } else {
        whole + Decimal::new(99, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_psychological_ending(price: Decimal) -> bool {
        let fraction = price - price.floor();
        fraction == Decimal::new(99, 2) || fraction == Decimal::new(95, 2)
    }

    #[test]
    fn test_price_always_ends_in_99_or_95() {
        for niche in ["pets", "beauty", "tech", "unknown-niche"] {
            let niche = Niche::new(niche);
            for index in 0..50 {
                let price = calculate(&niche, index);
                assert!(
                    has_psychological_ending(price),
                    "price {price} for {niche} must end in .99 or .95"
                );
            }
        }
    }

    #[test]
    fn test_price_stays_in_clamp_range() {
        let niche = Niche::new("tech"); // highest multiplier, most likely to clamp
        for index in 0..100 {
            let price = calculate(&niche, index);
            assert!(price >= MIN_PRICE && price <= MAX_PRICE, "price {price} out of range");
        }
    }

    #[test]
    fn test_pets_price_lands_in_expected_band() {
        // base 8..=53 times 1.2 stays within roughly [9, 64]
        let niche = Niche::new("pets");
        for _ in 0..100 {
            let price = calculate(&niche, 0);
            assert!(price >= Decimal::from(9) && price <= Decimal::from(65));
        }
    }

    #[test]
    fn test_rounding_rule_boundaries() {
        assert_eq!(
            round_psychological(Decimal::new(1950, 2)),
            Decimal::new(1999, 2)
        );
        assert_eq!(
            round_psychological(Decimal::new(2050, 2)),
            Decimal::new(2095, 2)
        );
        assert_eq!(
            round_psychological(Decimal::new(7210, 2)),
            Decimal::new(7299, 2)
        );
    }

    #[test]
    fn test_variant_prices_scale_and_stay_rounded() {
        let base = Decimal::new(2995, 2);
        let first = variant_price(base, 0);
        let second = variant_price(base, 1);
        let third = variant_price(base, 2);
        assert_eq!(first, Decimal::new(2995, 2));
        assert!(second > first && third > second);
        for price in [first, second, third] {
            assert!(has_psychological_ending(price));
        }
    }

    #[test]
    fn test_compare_at_is_thirty_percent_up() {
        assert_eq!(compare_at(Decimal::new(1999, 2)), Decimal::new(2599, 2));
    }
}
