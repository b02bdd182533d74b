/// Tunable constants of the bulk-rise estimator.
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Bulk rise at the reference temperature and inoculation.
    pub baseline_minutes: f64,
    pub baseline_temp_c: f64,
    pub baseline_inoculation: f64,

    /// Duration multiplier per degree above the reference temperature.
    pub temp_factor_per_degree: f64,

    /// Finished bakes needed before history is blended in
    pub min_history_bakes: usize,
    /// Shorter bulk windows are ignored as bogus
    pub min_history_minutes: i64,

    /// Blend weights
    pub weight_theory: f64,
    pub weight_history: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            baseline_minutes: 420.0,
            baseline_temp_c: 21.0,
            baseline_inoculation: 20.0,
            temp_factor_per_degree: 0.92,
            min_history_bakes: 3,
            min_history_minutes: 60,
            weight_theory: 0.30,
            weight_history: 0.70,
        }
    }
}
