//! Vertical refresh rate derivation from raw mode timings.

use crate::snapshot::ModeRecord;

/// Vertical refresh frequency of `mode` in Hz.
///
/// Doublescan doubles the number of lines per frame; interlace splits the
/// frame into two fields and the field rate is what monitors typically
/// report.  Returns `0.0` when either total is zero, which RandR uses for
/// placeholder modes.
pub fn refresh_hz(mode: &ModeRecord) -> f64 {
    let mut v_total = f64::from(mode.v_total);

    if mode.double_scan {
        v_total *= 2.0;
    }

    if mode.interlace {
        v_total /= 2.0;
    }

    if mode.h_total != 0 && v_total != 0.0 {
        mode.dot_clock as f64 / (f64::from(mode.h_total) * v_total)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mode(dot_clock: u64, h_total: u32, v_total: u32) -> ModeRecord {
        ModeRecord {
            id: 1,
            name: "test".into(),
            dot_clock,
            h_total,
            v_total,
            interlace: false,
            double_scan: false,
        }
    }

    #[test]
    fn plain_1080p_is_near_60() {
        // CEA-861 1920x1080@59.94: 148.352 MHz, 2200x1125 total.
        let rate = refresh_hz(&mode(148_352_000, 2200, 1125));
        assert!((rate - 59.94).abs() < 0.01, "got {rate}");
    }

    #[test]
    fn zero_totals_yield_zero() {
        assert_eq!(refresh_hz(&mode(148_500_000, 0, 1125)), 0.0);
        assert_eq!(refresh_hz(&mode(148_500_000, 2200, 0)), 0.0);
        assert_eq!(refresh_hz(&mode(0, 0, 0)), 0.0);
    }

    #[test]
    fn interlace_doubles_reported_rate() {
        let base = refresh_hz(&mode(148_500_000, 2200, 1125));
        let mut m = mode(148_500_000, 2200, 1125);
        m.interlace = true;
        assert!((refresh_hz(&m) - base * 2.0).abs() < 1e-9);
    }

    #[test]
    fn double_scan_halves_reported_rate() {
        let base = refresh_hz(&mode(148_500_000, 2200, 1125));
        let mut m = mode(148_500_000, 2200, 1125);
        m.double_scan = true;
        assert!((refresh_hz(&m) - base / 2.0).abs() < 1e-9);
    }

    #[test]
    fn both_flags_cancel_out() {
        let base = refresh_hz(&mode(148_500_000, 2200, 1125));
        let mut m = mode(148_500_000, 2200, 1125);
        m.interlace = true;
        m.double_scan = true;
        assert!((refresh_hz(&m) - base).abs() < 1e-9);
    }

    #[test]
    fn odd_v_total_is_not_truncated_under_interlace() {
        // 1235 / 2 must be computed as 617.5, not 617.
        let mut m = mode(148_500_000, 2080, 1235);
        m.interlace = true;
        let expected = 148_500_000.0 / (2080.0 * 617.5);
        assert!((refresh_hz(&m) - expected).abs() < 1e-9);
    }

    #[test]
    fn rate_scales_as_a_dimensionless_ratio() {
        let m = mode(148_500_000, 2080, 1235);
        // Clock and line totals scale together: k*clock over (k*h * k*v)
        // divides the rate by k.
        let k = 3;
        let scaled = mode(148_500_000 * k, 2080 * k as u32, 1235 * k as u32);
        assert!((refresh_hz(&scaled) - refresh_hz(&m) / k as f64).abs() < 1e-9);
        // Scaling clock against a single total cancels exactly.
        let balanced = mode(148_500_000 * k, 2080 * k as u32, 1235);
        assert!((refresh_hz(&balanced) - refresh_hz(&m)).abs() < 1e-9);
    }
}
