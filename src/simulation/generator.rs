//! Patient generation and arrival sampling.
//!
//! One seeded RNG stream drives every random draw (diagnosis, triage
//! escalation, age, service time, inter-arrival gaps), so a run is
//! reproducible from its seed.
//!
//! Arrivals for a cycle are generated ahead of event processing: the
//! cursor walks the cycle window drawing exponential gaps whose mean
//! follows the hourly arrival-rate profile, and each landing inside
//! the window becomes one pre-scheduled arrival.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp, Normal};

use crate::config::Config;
use crate::error::Result;
use crate::expr::ArrivalRate;
use crate::models::{Patient, PatientId, TriageClassifier, TriageLevel};

/// Probability of each diagnosis code 1..=17.
///
/// Empirical distribution over presenting-complaint groups; sums to
/// ~1.0 with a tiny rounding tail that falls through to code 17.
pub const DIAGNOSIS_PROBABILITIES: [f64; 17] = [
    3.72908417e-02,
    3.45021445e-02,
    6.44438692e-04,
    1.42655116e-01,
    4.82845207e-03,
    2.06028792e-01,
    4.42272662e-02,
    1.19613046e-02,
    6.28956682e-06,
    9.97375315e-02,
    2.83615920e-02,
    7.33431225e-02,
    1.14778789e-01,
    4.28604950e-02,
    4.97795023e-02,
    4.95869448e-02,
    5.94073777e-02,
];

/// Probability that a classified patient is escalated one level.
const ESCALATION_PROBABILITY: f64 = 0.05;

/// Floor for sampled durations; keeps event times strictly advancing.
const MIN_DURATION_MINS: i64 = 1;

/// Seedable patient and arrival sampler.
#[derive(Debug)]
pub struct PatientGenerator {
    rng: StdRng,
    classifier: TriageClassifier,
    treatment_means: [f64; 5],
    min_age: u8,
    max_age: u8,
    next_id: u64,
}

impl PatientGenerator {
    /// Creates a generator from configuration with the given seed.
    pub fn new(config: &Config, classifier: TriageClassifier, seed: u64) -> Self {
        let mut treatment_means = [1.0; 5];
        for (i, level) in TriageLevel::ALL.iter().enumerate() {
            treatment_means[i] = config.treatment_mean_mins(*level);
        }
        Self {
            rng: StdRng::seed_from_u64(seed),
            classifier,
            treatment_means,
            min_age: config.patient_min_age,
            max_age: config.patient_max_age,
            next_id: 0,
        }
    }

    /// The active classifier variant.
    pub fn classifier(&self) -> TriageClassifier {
        self.classifier
    }

    /// Samples a diagnosis code in 1..=17.
    ///
    /// Inverse-CDF draw over [`DIAGNOSIS_PROBABILITIES`]; the rounding
    /// tail (r beyond the cumulative sum) maps to code 17.
    pub fn sample_diagnosis(&mut self) -> u8 {
        let r: f64 = self.rng.random();
        let mut cumulative = 0.0;
        for (i, p) in DIAGNOSIS_PROBABILITIES.iter().enumerate() {
            cumulative += p;
            if r < cumulative {
                return (i + 1) as u8;
            }
        }
        DIAGNOSIS_PROBABILITIES.len() as u8
    }

    /// Generates one patient. Arrival time is stamped later by the
    /// event loop.
    pub fn generate(&mut self) -> Result<Patient> {
        let diagnosis = self.sample_diagnosis();
        let mut level = self.classifier.classify(diagnosis)?;
        if self.rng.random::<f64>() < ESCALATION_PROBABILITY {
            level = level.escalated();
        }
        let age = self.rng.random_range(self.min_age..=self.max_age);
        let service_time_mins = self.sample_service_time(level);

        let id = PatientId(self.next_id);
        self.next_id += 1;
        Ok(Patient::new(id, age, level, service_time_mins))
    }

    /// Samples a service time for a triage level, minutes.
    ///
    /// Normal with mean from configuration and sigma = 0.25 * mean;
    /// negative tail samples clamp to one minute.
    fn sample_service_time(&mut self, level: TriageLevel) -> i64 {
        let mean = self.treatment_means[(level.priority() - 1) as usize];
        let normal = Normal::new(mean, 0.25 * mean)
            .expect("validated config yields positive treatment means");
        (normal.sample(&mut self.rng) as i64).max(MIN_DURATION_MINS)
    }

    /// Pre-generates the arrival stream for one cycle window.
    ///
    /// Walks `[cycle_start_mins, cycle_end_mins)` drawing exponential
    /// gaps with mean `tau0 / f(hour)`, clamped to one minute. The
    /// returned list is sorted by arrival time.
    pub fn generate_arrivals(
        &mut self,
        rate: &ArrivalRate,
        tau0_mins: f64,
        cycle_start_mins: i64,
        cycle_end_mins: i64,
    ) -> Result<Vec<(i64, Patient)>> {
        let mut arrivals = Vec::new();
        let mut cursor = cycle_start_mins;
        while cursor < cycle_end_mins {
            let hour = cursor.div_euclid(60);
            let mean = tau0_mins / rate.multiplier(hour)?;
            let exp = Exp::new(1.0 / mean)
                .expect("positive multiplier yields a positive mean gap");
            let gap = (exp.sample(&mut self.rng) as i64).max(MIN_DURATION_MINS);
            cursor += gap;
            if cursor < cycle_end_mins {
                arrivals.push((cursor, self.generate()?));
            }
        }
        arrivals.sort_by_key(|(time, patient)| (*time, patient.id));
        Ok(arrivals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::sample_config;

    fn generator(seed: u64) -> PatientGenerator {
        PatientGenerator::new(&sample_config(), TriageClassifier::Ctas, seed)
    }

    #[test]
    fn test_probability_vector_sums_to_one() {
        let total: f64 = DIAGNOSIS_PROBABILITIES.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_diagnosis_distribution_matches_probabilities() {
        let mut gen = generator(42);
        const DRAWS: usize = 200_000;
        let mut counts = [0u32; 17];
        for _ in 0..DRAWS {
            let code = gen.sample_diagnosis();
            counts[(code - 1) as usize] += 1;
        }
        for (i, expected) in DIAGNOSIS_PROBABILITIES.iter().enumerate() {
            let observed = counts[i] as f64 / DRAWS as f64;
            assert!(
                (observed - expected).abs() < 0.005,
                "code {}: observed {observed:.4}, expected {expected:.4}",
                i + 1
            );
        }
    }

    #[test]
    fn test_patient_attributes_in_range() {
        let mut gen = generator(7);
        for _ in 0..500 {
            let p = gen.generate().unwrap();
            assert!(p.age >= 5 && p.age <= 99);
            assert!(p.service_time_mins >= 1);
            assert!(p.arrival_time_mins.is_none());
        }
    }

    #[test]
    fn test_patient_ids_are_sequential() {
        let mut gen = generator(1);
        let a = gen.generate().unwrap();
        let b = gen.generate().unwrap();
        assert_eq!(a.id, PatientId(0));
        assert_eq!(b.id, PatientId(1));
    }

    #[test]
    fn test_generation_is_reproducible() {
        let mut a = generator(123);
        let mut b = generator(123);
        for _ in 0..100 {
            let pa = a.generate().unwrap();
            let pb = b.generate().unwrap();
            assert_eq!(pa.triage_level, pb.triage_level);
            assert_eq!(pa.age, pb.age);
            assert_eq!(pa.service_time_mins, pb.service_time_mins);
        }
    }

    #[test]
    fn test_arrivals_sorted_and_bounded() {
        let mut gen = generator(9);
        let rate = ArrivalRate::parse("flat", "1").unwrap();
        let arrivals = gen.generate_arrivals(&rate, 15.0, 0, 24 * 60).unwrap();

        assert!(!arrivals.is_empty());
        for window in arrivals.windows(2) {
            assert!(window[0].0 <= window[1].0);
        }
        for (time, _) in &arrivals {
            assert!(*time > 0 && *time < 24 * 60);
        }
    }

    #[test]
    fn test_arrival_volume_tracks_rate() {
        // Doubling f(t) halves the mean gap and roughly doubles volume.
        let slow = generator(11)
            .generate_arrivals(&ArrivalRate::parse("slow", "1").unwrap(), 15.0, 0, 7 * 24 * 60)
            .unwrap()
            .len();
        let fast = generator(11)
            .generate_arrivals(&ArrivalRate::parse("fast", "2").unwrap(), 15.0, 0, 7 * 24 * 60)
            .unwrap()
            .len();
        assert!(
            fast as f64 > slow as f64 * 1.5,
            "fast {fast} should be well above slow {slow}"
        );
    }

    #[test]
    fn test_near_zero_rate_produces_no_arrivals() {
        let mut gen = generator(3);
        let rate = ArrivalRate::parse("trickle", "0.0001").unwrap();
        // tau0 1 minute, f=0.0001 → mean gap 10000 minutes ≫ 1 day.
        let arrivals = gen.generate_arrivals(&rate, 1.0, 0, 24 * 60).unwrap();
        assert!(arrivals.len() <= 1);
    }

    #[test]
    fn test_non_positive_rate_fails_generation() {
        let mut gen = generator(5);
        let rate = ArrivalRate::parse("zero", "0").unwrap();
        assert!(gen.generate_arrivals(&rate, 15.0, 0, 60).is_err());
    }

    #[test]
    fn test_escalation_shifts_distribution() {
        // Under CTAS, code 3 is the only RED source; with escalation
        // ORANGE patients also land on RED. Red share should therefore
        // exceed the raw code-3 probability.
        let mut gen = generator(21);
        const DRAWS: usize = 50_000;
        let mut reds = 0usize;
        for _ in 0..DRAWS {
            if gen.generate().unwrap().triage_level == TriageLevel::Red {
                reds += 1;
            }
        }
        let red_share = reds as f64 / DRAWS as f64;
        let raw_code3 = DIAGNOSIS_PROBABILITIES[2];
        assert!(red_share > raw_code3, "red share {red_share} vs raw {raw_code3}");
    }
}
