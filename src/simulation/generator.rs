//! Random market generation.
//!
//! Every student ranks every school and every school ranks every student,
//! each order drawn uniformly at random. Students are drawn first, in index
//! order, then schools, so a given RNG state always yields the same market.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::MarketConfig;
use crate::error::MarketError;
use crate::types::{Market, SchoolId, StudentId};

/// Draw a market with uniformly random strict preferences and priorities.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use school_choice::config::MarketConfig;
/// use school_choice::simulation::generator::generate_market;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let market = generate_market(&MarketConfig::default(), &mut rng).unwrap();
///
/// assert_eq!(market.num_students(), 18);
/// assert_eq!(market.num_schools(), 3);
/// ```
pub fn generate_market<R>(config: &MarketConfig, rng: &mut R) -> Result<Market, MarketError>
where
    R: Rng + ?Sized,
{
    let schools: Vec<SchoolId> = (0..config.num_schools()).map(SchoolId::new).collect();
    let students: Vec<StudentId> = (0..config.students()).map(StudentId::new).collect();

    let preferences = (0..config.students())
        .map(|_| shuffled(&schools, &mut *rng))
        .collect();
    let priorities = (0..config.num_schools())
        .map(|_| shuffled(&students, &mut *rng))
        .collect();

    Market::new(config.capacities().to_vec(), preferences, priorities)
}

fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut order = items.to_vec();
    order.shuffle(rng);
    order
}
