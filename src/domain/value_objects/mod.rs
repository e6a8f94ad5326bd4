pub mod player_tag;

pub use player_tag::*;
