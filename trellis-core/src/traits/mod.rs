mod cost;

pub use cost::{ICostModel, TokenizerId};
