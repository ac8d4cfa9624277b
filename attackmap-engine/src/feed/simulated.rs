use anyhow::Result;
use attackmap_messages::{AttackEvent, AttackType, Endpoint};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::AttackSource;

/// Approximate geographic centres of the countries the simulated backend uses.
const COUNTRIES: &[(&str, f64, f64)] = &[
    ("United States", 37.09, -95.71),
    ("Russia", 61.52, 105.32),
    ("China", 35.86, 104.20),
    ("India", 20.59, 78.96),
    ("Brazil", -14.24, -51.93),
    ("Germany", 51.17, 10.45),
    ("United Kingdom", 55.38, -3.44),
    ("France", 46.23, 2.21),
    ("Japan", 36.20, 138.25),
    ("Canada", 56.13, -106.35),
    ("Australia", -25.27, 133.78),
    ("South Korea", 35.91, 127.77),
    ("Netherlands", 52.13, 5.29),
    ("Iran", 32.43, 53.69),
    ("Turkey", 38.96, 35.24),
    ("Vietnam", 14.06, 108.28),
    ("Poland", 51.92, 19.15),
    ("Ukraine", 48.38, 31.17),
    ("Taiwan", 23.70, 120.96),
    ("Romania", 45.94, 24.97),
];

const ATTACK_TYPES: &[AttackType] = &[
    AttackType::UdpFlood,
    AttackType::SynFlood,
    AttackType::HttpGet,
    AttackType::DnsAmplification,
];

/// Generates an endless stream of random attacks between distinct countries.
pub struct SimulatedSource {
    rng: StdRng,
}

impl SimulatedSource {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    fn endpoint(&mut self, index: usize) -> Endpoint {
        let (country, lat, lng) = COUNTRIES[index];
        // Jitter so repeated pairs don't draw identical arcs
        Endpoint::new(
            country,
            lat + self.rng.gen_range(-2.0..2.0),
            lng + self.rng.gen_range(-2.0..2.0),
        )
    }
}

impl AttackSource for SimulatedSource {
    fn next_attack(&mut self) -> Result<Option<AttackEvent>> {
        let from = self.rng.gen_range(0..COUNTRIES.len());
        let to = (from + self.rng.gen_range(1..COUNTRIES.len())) % COUNTRIES.len();
        let attack_type = ATTACK_TYPES
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or(AttackType::UdpFlood);

        let source = self.endpoint(from);
        let destination = self.endpoint(to);
        Ok(Some(AttackEvent::new(attack_type, source, destination)))
    }
}
