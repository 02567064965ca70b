//! Score counter and its display text

/// Monotonic run score plus the string shown on the HUD
#[derive(Debug, Clone, Default)]
pub struct ScoreTracker {
    value: u64,
    text: String,
}

impl ScoreTracker {
    /// A zeroed tracker whose text is set up with `increment(0)`
    pub fn new() -> Self {
        let mut score = Self::default();
        score.increment(0);
        score
    }

    pub fn increment(&mut self, n: u64) {
        self.value += n;
        self.text = format!("Score: {}", self.value);
    }

    pub fn reset(&mut self) {
        self.value = 0;
        self.text = format!("Score: {}", self.value);
    }

    #[inline]
    pub fn value(&self) -> u64 {
        self.value
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}
