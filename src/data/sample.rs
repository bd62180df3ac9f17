//! Synthetic loan applications for smoke runs and load checks.
//!
//! Ranges follow what the application form offers: amounts in steps of 500,
//! durations in steps of 6 months, ages 18..=75. Category codes are drawn
//! uniformly over the Code Book domains. Output is deterministic per seed.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::codebook::CodeBook;
use crate::domain::{CodeDimension, LoanApplication};
use crate::error::AppError;

const AMOUNT_MIN: u32 = 500;
const AMOUNT_MAX: u32 = 20_000;
const AMOUNT_STEP: u32 = 500;

const DURATION_MIN: u32 = 6;
const DURATION_MAX: u32 = 72;
const DURATION_STEP: u32 = 6;

const AGE_MIN: f64 = 18.0;
const AGE_MAX: f64 = 75.0;
const AGE_MEAN: f64 = 35.0;
const AGE_SD: f64 = 11.0;

#[derive(Debug, Clone, Copy)]
pub struct SampleConfig {
    pub count: usize,
    pub seed: u64,
}

pub fn generate_applications(config: &SampleConfig, codebook: &CodeBook) -> Result<Vec<LoanApplication>, AppError> {
    if config.count == 0 {
        return Err(AppError::new(2, "Sample count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let age_dist = Normal::new(AGE_MEAN, AGE_SD)
        .map_err(|e| AppError::new(4, format!("Age distribution error: {e}")))?;

    let domains = CodeDimension::ALL.map(|dim| codebook.codes(dim));
    if domains.iter().any(Vec::is_empty) {
        return Err(AppError::new(4, "Code Book has an empty dimension."));
    }

    let mut out = Vec::with_capacity(config.count);
    for _ in 0..config.count {
        let amount_steps = rng.gen_range(0..=(AMOUNT_MAX - AMOUNT_MIN) / AMOUNT_STEP);
        let duration_steps = rng.gen_range(0..=(DURATION_MAX - DURATION_MIN) / DURATION_STEP);
        let age = age_dist.sample(&mut rng).round().clamp(AGE_MIN, AGE_MAX);

        let mut codes = [0i64; 4];
        for (slot, domain) in codes.iter_mut().zip(&domains) {
            *slot = domain[rng.gen_range(0..domain.len())];
        }
        let [job, checking_status, savings_status, purpose] = codes;

        out.push(LoanApplication {
            duration: f64::from(DURATION_MIN + duration_steps * DURATION_STEP),
            credit_amount: f64::from(AMOUNT_MIN + amount_steps * AMOUNT_STEP),
            age,
            job,
            checking_status,
            savings_status,
            purpose,
        });
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(count: usize, seed: u64) -> SampleConfig {
        SampleConfig { count, seed }
    }

    #[test]
    fn same_seed_same_sample() {
        let book = CodeBook::standard();
        let a = generate_applications(&config(50, 7), &book).unwrap();
        let b = generate_applications(&config(50, 7), &book).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn values_stay_on_form_grid() {
        let book = CodeBook::standard();
        let apps = generate_applications(&config(500, 42), &book).unwrap();
        for app in &apps {
            assert!((500.0..=20_000.0).contains(&app.credit_amount));
            assert_eq!(app.credit_amount % 500.0, 0.0);
            assert!((6.0..=72.0).contains(&app.duration));
            assert_eq!(app.duration % 6.0, 0.0);
            assert!((18.0..=75.0).contains(&app.age));
            assert!((0..=3).contains(&app.job));
            assert!((0..=2).contains(&app.savings_status));
            assert!((0..=8).contains(&app.purpose));
        }
    }

    #[test]
    fn zero_count_is_rejected() {
        let err = generate_applications(&config(0, 1), &CodeBook::standard()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
