pub mod contract;
pub mod instrument;
pub mod recommendation;
