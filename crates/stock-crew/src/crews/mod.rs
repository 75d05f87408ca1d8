//! The two stock crews

pub mod investment;
pub mod news_opinion;

pub use investment::{InvestmentCrew, PLAN};
pub use news_opinion::NewsOpinionCrew;
