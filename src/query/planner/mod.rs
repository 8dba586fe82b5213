// Query Planner Module
//
// Plan-document parsing and translation into executable operator trees.

pub mod filter_pushdown;
pub mod operator_builder;
pub mod physical_plan;

pub use self::operator_builder::OperatorBuilder;
pub use self::physical_plan::{JoinMethod, PhysicalPlan};
