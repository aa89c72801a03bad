//! Game implementations.

pub mod lucky_dice;
