//! Unit tests for signal-engine building blocks through the public API

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use signal_engine::data::{Candle, CandleWindow};
    use signal_engine::indicators::{Indicator, IndicatorCalculator, EMA, MACD, RSI};
    use signal_engine::prelude::*;

    fn candles(count: usize, base_price: f64) -> Vec<Candle> {
        let start = Utc::now();
        (0..count)
            .map(|i| {
                let price = base_price + (i as f64 * 0.1) + (i as f64 % 10.0) * 0.5;
                Candle::new(
                    price,
                    price + 1.0,
                    price - 1.0,
                    price,
                    1000.0,
                    start + Duration::minutes(i as i64),
                )
            })
            .collect()
    }

    #[test]
    fn test_candle_creation() {
        let candle = Candle::new(100.0, 110.0, 95.0, 105.0, 1000.0, Utc::now());
        assert_eq!(candle.open, 100.0);
        assert_eq!(candle.close, 105.0);
        assert_eq!(candle.range(), 15.0);
        assert!(candle.is_valid());
    }

    #[test]
    fn test_rsi_indicator() {
        let mut rsi = RSI::new(14).unwrap();
        for candle in candles(20, 100.0).iter() {
            rsi.update(candle);
        }
        assert!(rsi.is_ready());
        let value = rsi.value().unwrap();
        assert!((0.0..=100.0).contains(&value));
    }

    fn flat_candle(close: f64, half_range: f64, minute: i64) -> Candle {
        Candle::new(
            close,
            close + half_range,
            close - half_range,
            close,
            1000.0,
            Utc::now() + Duration::minutes(minute),
        )
    }

    #[test]
    fn test_snapshot_rsi_uses_wilder_smoothing() {
        // 20 rising closes then 5 falling: still inside the 45..55 neutral band
        let mut closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        closes.extend((1..=5).map(|i| 119.0 - 2.0 * i as f64));
        let window = CandleWindow::from_candles(
            25,
            closes.iter().enumerate().map(|(i, &c)| flat_candle(c, 1.0, i as i64)),
        );

        let calc = IndicatorCalculator::new(IndicatorConfig::default()).unwrap();
        let snapshot = calc.compute(&window).unwrap();
        assert!((snapshot.rsi - 52.7139).abs() < 1e-3, "rsi = {}", snapshot.rsi);
        assert!(snapshot.rsi > 45.0 && snapshot.rsi < 55.0);
    }

    #[test]
    fn test_snapshot_atr_uses_wilder_smoothing() {
        // 14 candles of range 10 then 6 of range 60
        let window = CandleWindow::from_candles(
            25,
            (0..20).map(|i| flat_candle(100.0, if i < 14 { 5.0 } else { 30.0 }, i)),
        );

        let calc = IndicatorCalculator::new(IndicatorConfig::default()).unwrap();
        let snapshot = calc.compute(&window).unwrap();
        assert!((snapshot.atr - 27.9475).abs() < 1e-3, "atr = {}", snapshot.atr);
    }

    #[test]
    fn test_ema_indicator() {
        let mut ema = EMA::new(9).unwrap();
        for candle in candles(9, 100.0).iter() {
            ema.update(candle);
        }
        assert!(ema.is_ready());
    }

    #[test]
    fn test_macd_needs_slow_plus_signal_history() {
        let mut macd = MACD::new(12, 26, 9).unwrap();
        let series = candles(40, 100.0);
        for candle in series.iter().take(30) {
            macd.update(candle);
        }
        assert!(!macd.is_ready());
        for candle in series.iter().skip(30) {
            macd.update(candle);
        }
        assert!(macd.is_ready());
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let calc = IndicatorCalculator::new(IndicatorConfig::default()).unwrap();
        let window = CandleWindow::from_candles(25, candles(40, 24_000.0));
        assert_eq!(window.len(), 25);
        assert_eq!(calc.compute(&window), calc.compute(&window));
    }

    #[test]
    fn test_window_evicts_oldest() {
        let mut window = CandleWindow::new(25);
        let series = candles(30, 100.0);
        window.extend(series.iter().cloned());
        assert_eq!(window.len(), 25);
        assert_eq!(window.iter().next(), Some(&series[5]));
        assert_eq!(window.latest(), series.last());
    }

    #[test]
    fn test_structure_from_window() {
        let window = CandleWindow::from_candles(25, candles(2, 100.0));
        assert_eq!(MarketStructure::detect(&window), MarketStructure::BullishBos);
        assert_eq!(
            MarketStructure::detect(&CandleWindow::new(25)),
            MarketStructure::NoData
        );
    }
}
