//! Catalog domain records
//!
//! Cards and sets are built only by the response mapper from a trusted
//! payload and are immutable afterwards.

mod card;
mod color;
mod set;

pub use card::Card;
pub use color::Color;
pub use set::Set;
