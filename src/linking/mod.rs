pub mod decision;
pub mod report;
