pub mod capital_one;
pub mod chase_visa;
