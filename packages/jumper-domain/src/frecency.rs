//! Frecency: a blend of visit recency and decayed visit frequency.
//!
//! The score has two terms inside the logarithm. The hyperbolic term rewards a visit in the last
//! few hours regardless of history, and the exponential term carries the long-horizon weight.

#[derive(Clone, Debug, PartialEq)]
pub struct FrecencyModel {
	pub short_decay: f64,
	pub long_decay: f64,
	pub recency_reward: f64,
	pub offset: f64,
}
impl Default for FrecencyModel {
	fn default() -> Self {
		Self::from(&jumper_config::Frecency::default())
	}
}
impl From<&jumper_config::Frecency> for FrecencyModel {
	fn from(cfg: &jumper_config::Frecency) -> Self {
		Self {
			short_decay: cfg.short_decay,
			long_decay: cfg.long_decay,
			recency_reward: cfg.recency_reward,
			offset: cfg.offset,
		}
	}
}
impl FrecencyModel {
	/// Weight left after `elapsed_seconds` without a visit. Negative elapsed time counts as zero.
	pub fn decay_visits(&self, weight: f64, elapsed_seconds: f64) -> f64 {
		(-self.long_decay * elapsed_seconds.max(0.0)).exp() * weight
	}

	pub fn record_visit(&self, weight: f64, elapsed_seconds: f64, visit_weight: f64) -> f64 {
		visit_weight + self.decay_visits(weight, elapsed_seconds)
	}

	pub fn frecency(&self, weight: f64, elapsed_seconds: f64) -> f64 {
		let elapsed = elapsed_seconds.max(0.0);
		let recency = self.recency_reward / (1.0 + elapsed * self.short_decay);

		self.offset + (0.1 + recency + self.decay_visits(weight, elapsed)).ln()
	}
}

pub fn decay_visits(weight: f64, elapsed_seconds: f64) -> f64 {
	FrecencyModel::default().decay_visits(weight, elapsed_seconds)
}

pub fn record_visit(weight: f64, elapsed_seconds: f64, visit_weight: f64) -> f64 {
	FrecencyModel::default().record_visit(weight, elapsed_seconds, visit_weight)
}

pub fn frecency(weight: f64, elapsed_seconds: f64) -> f64 {
	FrecencyModel::default().frecency(weight, elapsed_seconds)
}
