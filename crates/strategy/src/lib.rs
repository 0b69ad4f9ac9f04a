pub mod services;

pub use services::decision_engine::{Collaborators, DecisionEngine};
