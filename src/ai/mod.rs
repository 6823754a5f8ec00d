use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::types::Choice;

/// The computer's pick: uniform over the three choices, no memory of past rounds.
pub fn computer_choice<R: Rng + ?Sized>(rng: &mut R) -> Choice {
    *Choice::ALL
        .choose(rng)
        .unwrap_or(&Choice::Snake)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn every_choice_comes_up_roughly_a_third_of_the_time() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts: HashMap<Choice, u32> = HashMap::new();
        for _ in 0..3000 {
            *counts.entry(computer_choice(&mut rng)).or_default() += 1;
        }
        for c in Choice::ALL {
            let n = counts.get(&c).copied().unwrap_or(0);
            assert!((800..1200).contains(&n), "{c:?} drawn {n} times");
        }
    }
}
