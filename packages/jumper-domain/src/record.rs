use crate::frecency::FrecencyModel;

/// One visited path with its accumulated visit weight and last visit time in Unix seconds.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
	pub path: String,
	pub visit_weight: f64,
	pub last_visit: i64,
}
impl Record {
	pub fn new(path: impl Into<String>, visit_weight: f64, last_visit: i64) -> Self {
		Self { path: path.into(), visit_weight, last_visit }
	}

	pub fn elapsed(&self, now: i64) -> f64 {
		now.saturating_sub(self.last_visit) as f64
	}

	/// Decays the stored weight to `now`, credits `visit_weight`, and stamps the visit.
	pub fn visit(&mut self, now: i64, visit_weight: f64, model: &FrecencyModel) {
		self.visit_weight = model.record_visit(self.visit_weight, self.elapsed(now), visit_weight);
		self.last_visit = now;
	}

	pub fn frecency(&self, now: i64, model: &FrecencyModel) -> f64 {
		model.frecency(self.visit_weight, self.elapsed(now))
	}

	pub fn decayed_visits(&self, now: i64, model: &FrecencyModel) -> f64 {
		model.decay_visits(self.visit_weight, self.elapsed(now))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn visit_stamps_time_and_accumulates() {
		let model = FrecencyModel::default();
		let mut record = Record::new("/tmp", 2.0, 1_000);

		record.visit(1_000, 1.0, &model);

		assert_eq!(record.visit_weight, 3.0);
		assert_eq!(record.last_visit, 1_000);

		record.visit(1_000 + 86_400, 1.0, &model);

		assert!(record.visit_weight < 4.0);
		assert_eq!(record.last_visit, 1_000 + 86_400);
	}
}
