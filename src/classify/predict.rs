//! Prediction selection and the per-frame diagnostics overlay.

use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};

use crate::classify::labels::LabelTable;

/// Index of the maximum score. Ties resolve to the first maximum
/// encountered. `None` for an empty vector.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (idx, &score) in scores.iter().enumerate() {
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Per-frame classification result.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub index: usize,
    pub label: String,
    pub confidence: f32,
}

impl Prediction {
    /// Pick the highest-scoring class and resolve its label.
    pub fn select(scores: &[f32], labels: &LabelTable) -> Result<Self> {
        let index = argmax(scores).ok_or_else(|| anyhow!("empty output vector"))?;
        let label = labels
            .get(index)
            .ok_or_else(|| anyhow!("no label for class index {}", index))?
            .to_string();
        Ok(Self {
            index,
            label,
            confidence: scores[index],
        })
    }

    /// Overlay line: predicted label, confidence to 3 decimals, FPS.
    pub fn overlay_text(&self, fps: i64) -> String {
        format!("{} : {:.3} , FPS {}", self.label, self.confidence, fps)
    }
}

/// Instantaneous frames-per-second meter.
///
/// Reports the truncated reciprocal of the previous iteration's wall-clock
/// duration; before any iteration has completed it reports the sentinel -1.
pub struct FpsMeter {
    fps: i64,
    started: Option<Instant>,
}

impl FpsMeter {
    pub fn new() -> Self {
        Self {
            fps: -1,
            started: None,
        }
    }

    /// Mark the start of a loop iteration.
    pub fn begin_iteration(&mut self) {
        self.started = Some(Instant::now());
    }

    /// Mark the end of a loop iteration, updating the reported value.
    pub fn end_iteration(&mut self) {
        if let Some(started) = self.started.take() {
            self.record(started.elapsed());
        }
    }

    /// FPS value to report for the current iteration.
    pub fn fps(&self) -> i64 {
        self.fps
    }

    fn record(&mut self, elapsed: Duration) {
        let secs = elapsed.as_secs_f64();
        if secs > 0.0 {
            self.fps = (1.0 / secs) as i64;
        }
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_picks_unique_maximum() {
        assert_eq!(argmax(&[0.1, 0.85, 0.05]), Some(1));
        assert_eq!(argmax(&[0.9, 0.05, 0.05]), Some(0));
        assert_eq!(argmax(&[0.0, 0.0, 1.0]), Some(2));
    }

    #[test]
    fn argmax_ties_resolve_to_first() {
        assert_eq!(argmax(&[0.4, 0.4, 0.2]), Some(0));
    }

    #[test]
    fn argmax_of_empty_is_none() {
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn select_resolves_label_and_confidence() -> Result<()> {
        let labels = LabelTable::parse("0 no_mask\n1 mask\n2 incorrect\n")?;
        let pred = Prediction::select(&[0.1, 0.85, 0.05], &labels)?;
        assert_eq!(pred.index, 1);
        assert_eq!(pred.label, "mask");
        assert_eq!(pred.confidence, 0.85);
        Ok(())
    }

    #[test]
    fn select_fails_on_missing_label() -> Result<()> {
        let labels = LabelTable::parse("0 only\n")?;
        assert!(Prediction::select(&[0.1, 0.9], &labels).is_err());
        Ok(())
    }

    #[test]
    fn overlay_text_formats_three_decimals() -> Result<()> {
        let labels = LabelTable::parse("0 no_mask\n1 mask\n2 incorrect\n")?;
        let pred = Prediction::select(&[0.1, 0.85, 0.05], &labels)?;
        assert_eq!(pred.overlay_text(-1), "mask : 0.850 , FPS -1");
        assert_eq!(pred.overlay_text(30), "mask : 0.850 , FPS 30");
        Ok(())
    }

    #[test]
    fn fps_meter_starts_at_sentinel() {
        let meter = FpsMeter::new();
        assert_eq!(meter.fps(), -1);
    }

    #[test]
    fn fps_meter_truncates_reciprocal() {
        let mut meter = FpsMeter::new();
        meter.record(Duration::from_millis(40)); // 25 fps exactly
        assert_eq!(meter.fps(), 25);
        meter.record(Duration::from_millis(33)); // 30.3 -> 30
        assert_eq!(meter.fps(), 30);
    }

    #[test]
    fn fps_meter_ignores_zero_duration() {
        let mut meter = FpsMeter::new();
        meter.record(Duration::ZERO);
        assert_eq!(meter.fps(), -1);
    }
}
