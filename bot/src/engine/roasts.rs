use std::sync::Mutex;

use rand::Rng;
use tracing::info;

use super::validation;

/// Placeholder replaced with the target's name when a roast is served.
pub const USERNAME_PLACEHOLDER: &str = "%U%";

/// In-memory roast store. Seeding and any persistence belong to the
/// embedder; the board owns only the selection and submission rules.
pub struct RoastBoard {
    roasts: Mutex<Vec<String>>,
    probability: f64,
}

impl RoastBoard {
    /// `probability` is the per-message chance that [`roll`](Self::roll)
    /// fires, clamped to 0.0..=1.0.
    pub fn new(probability: f64) -> Self {
        Self::with_roasts(probability, Vec::new())
    }

    pub fn with_roasts(probability: f64, roasts: Vec<String>) -> Self {
        Self {
            roasts: Mutex::new(roasts),
            probability: probability.clamp(0.0, 1.0),
        }
    }

    /// Decide, per message, whether the bot should roast. Always false
    /// while the board is empty.
    pub fn roll(&self) -> bool {
        if self.is_empty() {
            return false;
        }
        rand::thread_rng().gen_bool(self.probability)
    }

    /// A uniformly random roast with every placeholder replaced by
    /// `target_name`, or `None` while the board is empty.
    pub fn pick(&self, target_name: &str) -> Option<String> {
        let roasts = self.roasts.lock().unwrap();
        if roasts.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..roasts.len());
        Some(roasts[index].replace(USERNAME_PLACEHOLDER, target_name))
    }

    /// Add a roast to the board.
    pub fn add(&self, roast: &str) -> Result<(), String> {
        validation::validate_roast(roast)?;
        let mut roasts = self.roasts.lock().unwrap();
        roasts.push(roast.to_string());
        info!(total = roasts.len(), "roast added");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.roasts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.roasts.lock().unwrap().is_empty()
    }
}
