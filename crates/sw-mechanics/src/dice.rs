//! The d20 every check rolls.

use rand::RngCore;

use crate::rng::UnitRng;

/// Faces on the check die.
pub const D20_SIDES: u32 = 20;

/// Roll a d20 from one unit float: `clamp(ceil(u * 20), 1, 20)`.
pub fn roll_d20<R: RngCore + ?Sized>(rng: &mut R) -> u32 {
    let face = (rng.next_unit() * f64::from(D20_SIDES)).ceil() as u32;
    face.clamp(1, D20_SIDES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FixedRng, make_rng};

    #[test]
    fn d20_faces_from_fixed_values() {
        assert_eq!(roll_d20(&mut FixedRng(0.0)), 1);
        assert_eq!(roll_d20(&mut FixedRng(0.5)), 10);
        assert_eq!(roll_d20(&mut FixedRng(0.95)), 19);
        assert_eq!(roll_d20(&mut FixedRng(0.999_999)), 20);
    }

    #[test]
    fn rolls_stay_on_the_die() {
        let mut rng = make_rng(Some(42));
        for _ in 0..500 {
            assert!((1..=D20_SIDES).contains(&roll_d20(&mut rng)));
        }
    }
}
