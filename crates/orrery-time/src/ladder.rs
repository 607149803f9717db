//! Discrete simulation speeds, symmetric around a stopped centre.

/// Forward rates in simulated seconds per real second, slowest first, with
/// their short labels.
const FORWARD: [(f64, &str); 28] = [
    (6.0, "6sec"),
    (8.0, "8sec"),
    (10.0, "10sec"),
    (15.0, "15sec"),
    (20.0, "20sec"),
    (30.0, "30sec"),
    (45.0, "45sec"),
    (60.0, "1min"),
    (120.0, "2min"),
    (180.0, "3min"),
    (300.0, "5min"),
    (600.0, "10min"),
    (1_200.0, "20min"),
    (1_800.0, "30min"),
    (3_600.0, "1hr"),
    (7_200.0, "2hr"),
    (10_800.0, "3hr"),
    (21_600.0, "6hr"),
    (43_200.0, "12hr"),
    (86_400.0, "1day"),
    (172_800.0, "2day"),
    (432_000.0, "5day"),
    (604_800.0, "1wk"),
    (1_209_600.0, "2wk"),
    (2_592_000.0, "1mth"),
    (7_776_000.0, "3mth"),
    (15_552_000.0, "6mth"),
    (31_536_000.0, "1yr"),
];

const MINUTE: f64 = 60.0;
const HOUR: f64 = 3_600.0;
const DAY: f64 = 86_400.0;
const WEEK: f64 = 604_800.0;
const MONTH: f64 = 2_592_000.0;
const YEAR: f64 = 31_536_000.0;

/// One ladder rung.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeedPreset {
    /// Simulated seconds per real second. Negative runs time backwards.
    pub rate: f64,
    /// Short label, e.g. `"1hr/s"` or `"2day/r"`.
    pub label: String,
}

/// Ordered list of speed presets from fastest reverse to fastest forward.
#[derive(Clone, Debug)]
pub struct SpeedLadder {
    presets: Vec<SpeedPreset>,
    centre: usize,
}

impl SpeedLadder {
    /// The 57-rung ladder: ±1 year/s down to ±6 s/s around a stopped centre.
    pub fn standard() -> Self {
        let reverse = FORWARD.iter().rev().map(|&(rate, short)| SpeedPreset {
            rate: -rate,
            label: format!("{short}/r"),
        });
        let stop = std::iter::once(SpeedPreset {
            rate: 0.0,
            label: "stop".to_string(),
        });
        let forward = FORWARD.iter().map(|&(rate, short)| SpeedPreset {
            rate,
            label: format!("{short}/s"),
        });
        let presets: Vec<_> = reverse.chain(stop).chain(forward).collect();
        Self {
            centre: FORWARD.len(),
            presets,
        }
    }

    /// Number of presets.
    pub fn len(&self) -> usize {
        self.presets.len()
    }

    /// Returns true if the ladder has no presets.
    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    /// Index of the zero-rate centre.
    pub fn centre(&self) -> usize {
        self.centre
    }

    /// Preset at `index`.
    pub fn get(&self, index: usize) -> Option<&SpeedPreset> {
        self.presets.get(index)
    }

    /// Iterate over presets in ladder order.
    pub fn iter(&self) -> impl Iterator<Item = &SpeedPreset> {
        self.presets.iter()
    }
}

impl Default for SpeedLadder {
    fn default() -> Self {
        Self::standard()
    }
}

/// Human-readable description of a rate, e.g. `"2 hours/s"` or
/// `"1 week/s (reverse)"`.
pub fn describe_rate(rate: f64) -> String {
    let magnitude = rate.abs();
    if magnitude == 0.0 {
        return "stopped".to_string();
    }
    let (amount, unit) = if magnitude < MINUTE {
        (magnitude, "second")
    } else if magnitude < HOUR {
        (magnitude / MINUTE, "minute")
    } else if magnitude < DAY {
        (magnitude / HOUR, "hour")
    } else if magnitude < WEEK {
        (magnitude / DAY, "day")
    } else if magnitude < MONTH {
        (magnitude / WEEK, "week")
    } else if magnitude < YEAR {
        (magnitude / MONTH, "month")
    } else {
        (magnitude / YEAR, "year")
    };
    let plural = if amount == 1.0 { "" } else { "s" };
    let reverse = if rate < 0.0 { " (reverse)" } else { "" };
    format!("{amount} {unit}{plural}/s{reverse}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_ladder_shape() {
        let ladder = SpeedLadder::standard();
        assert_eq!(ladder.len(), 57);
        assert_eq!(ladder.centre(), 28);
        assert_eq!(ladder.get(28).unwrap().rate, 0.0);
        assert_eq!(ladder.get(0).unwrap().rate, -31_536_000.0);
        assert_eq!(ladder.get(56).unwrap().rate, 31_536_000.0);
        assert_eq!(ladder.get(29).unwrap().rate, 6.0);
        assert_eq!(ladder.get(27).unwrap().rate, -6.0);
    }

    #[test]
    fn test_ladder_is_symmetric_and_sorted() {
        let ladder = SpeedLadder::standard();
        let rates: Vec<f64> = ladder.iter().map(|p| p.rate).collect();
        assert!(rates.windows(2).all(|w| w[0] < w[1]));
        for i in 0..ladder.len() {
            assert_eq!(rates[i], -rates[ladder.len() - 1 - i]);
        }
    }

    #[test]
    fn test_labels() {
        let ladder = SpeedLadder::standard();
        assert_eq!(ladder.get(0).unwrap().label, "1yr/r");
        assert_eq!(ladder.get(27).unwrap().label, "6sec/r");
        assert_eq!(ladder.get(29).unwrap().label, "6sec/s");
        assert_eq!(ladder.get(43).unwrap().label, "1hr/s");
        assert_eq!(ladder.get(48).unwrap().rate, 86_400.0);
    }

    #[test]
    fn test_describe_rate() {
        assert_eq!(describe_rate(0.0), "stopped");
        assert_eq!(describe_rate(45.0), "45 seconds/s");
        assert_eq!(describe_rate(7_200.0), "2 hours/s");
        assert_eq!(describe_rate(-604_800.0), "1 week/s (reverse)");
        assert_eq!(describe_rate(15_552_000.0), "6 months/s");
        assert_eq!(describe_rate(-31_536_000.0), "1 year/s (reverse)");
        assert_eq!(describe_rate(90.0), "1.5 minutes/s");
    }
}
