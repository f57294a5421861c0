//! VWAP (Volume-Weighted Average Price)

use crate::data::Candle;

/// Volume-weighted typical price over every candle given.
///
/// Zero-volume candles (synthetic ticks) carry no weight. When the whole
/// window has no volume the plain mean of typical prices is returned.
pub fn vwap<'a>(candles: impl IntoIterator<Item = &'a Candle>) -> Option<f64> {
    let mut price_volume = 0.0;
    let mut volume = 0.0;
    let mut typical_sum = 0.0;
    let mut count = 0usize;

    for candle in candles {
        let typical = candle.typical_price();
        price_volume += typical * candle.volume;
        volume += candle.volume;
        typical_sum += typical;
        count += 1;
    }

    if count == 0 {
        None
    } else if volume > 0.0 {
        Some(price_volume / volume)
    } else {
        Some(typical_sum / count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_vwap_weights_by_volume() {
        let candles = vec![
            Candle::new(100.0, 100.0, 100.0, 100.0, 1.0, Utc::now()),
            Candle::new(200.0, 200.0, 200.0, 200.0, 3.0, Utc::now()),
        ];
        assert_eq!(vwap(&candles), Some(175.0));
    }

    #[test]
    fn test_vwap_zero_volume_falls_back_to_mean() {
        let candles = vec![
            Candle::from_tick(100.0, Utc::now()),
            Candle::from_tick(200.0, Utc::now()),
        ];
        assert_eq!(vwap(&candles), Some(150.0));
    }

    #[test]
    fn test_vwap_empty() {
        assert_eq!(vwap(&Vec::<Candle>::new()), None);
    }
}
