/// `part / whole` as a percentage, None when there is nothing to divide by
pub fn percentage(part: usize, whole: usize) -> Option<f64> {
    match whole {
        positive if positive > 0 => Some(part as f64 / whole as f64 * 100.0),
        _ => None,
    }
}

/// Coarse rating used to color scores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Good,
    Fair,
    Poor,
}

impl ScoreBand {
    pub fn for_percentage(pct: f64) -> Self {
        match pct {
            p if p >= 90.0 => ScoreBand::Good,
            p if p >= 70.0 => ScoreBand::Fair,
            _ => ScoreBand::Poor,
        }
    }
}
