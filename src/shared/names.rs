use crate::game::constants::{ADJECTIVES, ANIMALS, NAME_NUMBER_LIMIT};
use rand::seq::SliceRandom;
use rand::Rng;

pub fn generate_player_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES.choose(rng).copied().unwrap_or("Brave");
    let animal = ANIMALS.choose(rng).copied().unwrap_or("Fox");
    let number = rng.gen_range(0..NAME_NUMBER_LIMIT);
    format!("{adjective} {animal} {number}")
}
