// Operator Builder
//
// Translates physical plans into executable operator trees, applying the
// filter-over-join pushdown rewrite during translation.

use std::path::{Path, PathBuf};

use log::debug;

use crate::catalog::{Catalog, Schema};
use crate::query::executor::operators::filter::FilterOperator;
use crate::query::executor::operators::join::{
    BlockNestedLoopJoinOperator, HashJoinOperator, NestedLoopJoinOperator,
};
use crate::query::executor::operators::limit::LimitOperator;
use crate::query::executor::operators::project::ProjectOperator;
use crate::query::executor::operators::scan::ScanOperator;
use crate::query::executor::operators::Operator;
use crate::query::executor::result::{QueryError, QueryResult};
use crate::query::expression::{BinaryOperator, Expression};
use crate::query::planner::filter_pushdown::{column_name_set, pushdown_side, PushdownSide};
use crate::query::planner::physical_plan::{JoinMethod, PhysicalPlan};

/// Builds executable operator trees from physical plans
pub struct OperatorBuilder<'a> {
    /// Catalog for schema resolution during scan construction
    catalog: &'a Catalog,
    /// Directory the plan's table names are resolved against
    data_dir: PathBuf,
}

impl<'a> OperatorBuilder<'a> {
    /// Create a new operator builder
    pub fn new(catalog: &'a Catalog, data_dir: &Path) -> Self {
        OperatorBuilder {
            catalog,
            data_dir: data_dir.to_path_buf(),
        }
    }

    /// Build an operator tree from a physical plan
    pub fn build(&self, plan: &PhysicalPlan) -> QueryResult<Box<dyn Operator>> {
        match plan {
            PhysicalPlan::TableScan { table, alias } => {
                let path = self.data_dir.join(table);
                Ok(Box::new(ScanOperator::new(path, alias, self.catalog)?))
            }
            PhysicalPlan::Filter { input, predicate } => self.build_filter(input, predicate),
            PhysicalPlan::Project { input, expressions } => {
                let input_op = self.build(input)?;
                Ok(Box::new(ProjectOperator::new(
                    input_op,
                    expressions.clone(),
                )?))
            }
            PhysicalPlan::Limit { input, limit } => {
                Ok(Box::new(LimitOperator::new(self.build(input)?, *limit)))
            }
            PhysicalPlan::Join {
                left,
                right,
                condition,
                method,
            } => {
                let left_op = self.build(left)?;
                let right_op = self.build(right)?;
                self.build_join(left_op, right_op, condition, *method)
            }
        }
    }

    /// Build a filter node. When the filter sits directly above a join and
    /// its predicate references columns from only one side, the filter is
    /// relocated below the join onto that input.
    fn build_filter(
        &self,
        input: &PhysicalPlan,
        predicate: &Expression,
    ) -> QueryResult<Box<dyn Operator>> {
        if let PhysicalPlan::Join {
            left,
            right,
            condition,
            method,
        } = input
        {
            let mut left_op = self.build(left)?;
            let mut right_op = self.build(right)?;
            return match pushdown_side(predicate, left_op.schema(), right_op.schema()) {
                Some(side) => {
                    // A pushed filter under a hash join is not supported;
                    // fall back to the loop-based method.
                    let method = match method {
                        JoinMethod::Hash => JoinMethod::NestedLoop,
                        other => *other,
                    };
                    match side {
                        PushdownSide::Left => {
                            debug!("pushing filter below join onto the left input");
                            left_op = Box::new(FilterOperator::new(left_op, predicate.clone()));
                        }
                        PushdownSide::Right => {
                            debug!("pushing filter below join onto the right input");
                            right_op = Box::new(FilterOperator::new(right_op, predicate.clone()));
                        }
                    }
                    self.build_join(left_op, right_op, condition, method)
                }
                None => {
                    let join = self.build_join(left_op, right_op, condition, *method)?;
                    Ok(Box::new(FilterOperator::new(join, predicate.clone())))
                }
            };
        }

        let input_op = self.build(input)?;
        Ok(Box::new(FilterOperator::new(input_op, predicate.clone())))
    }

    fn build_join(
        &self,
        left: Box<dyn Operator>,
        right: Box<dyn Operator>,
        condition: &Expression,
        method: JoinMethod,
    ) -> QueryResult<Box<dyn Operator>> {
        match method {
            JoinMethod::NestedLoop => Ok(Box::new(NestedLoopJoinOperator::new(
                left,
                right,
                condition.clone(),
            ))),
            JoinMethod::BlockNestedLoop => Ok(Box::new(BlockNestedLoopJoinOperator::new(
                left,
                right,
                condition.clone(),
            ))),
            JoinMethod::Hash => {
                let (probe_key, build_key) =
                    split_hash_keys(condition, left.schema(), right.schema())?;
                Ok(Box::new(HashJoinOperator::new(
                    left, right, probe_key, build_key,
                )))
            }
        }
    }
}

/// Pull the probe (left) and build (right) key expressions out of a hash
/// join's equality condition, swapping them when the plan lists them in the
/// opposite order from the operator inputs.
fn split_hash_keys(
    condition: &Expression,
    left: &Schema,
    right: &Schema,
) -> QueryResult<(Expression, Expression)> {
    let (cond_left, cond_right) = match condition {
        Expression::BinaryOp {
            op: BinaryOperator::Eq,
            left,
            right,
        } => (left.as_ref(), right.as_ref()),
        _ => {
            return Err(QueryError::PlanError(
                "hash join requires an EQ condition".to_string(),
            ))
        }
    };

    let left_columns = column_name_set(left);
    let right_columns = column_name_set(right);
    if cond_left.column_refs().is_subset(&left_columns)
        && cond_right.column_refs().is_subset(&right_columns)
    {
        Ok((cond_left.clone(), cond_right.clone()))
    } else if cond_right.column_refs().is_subset(&left_columns)
        && cond_left.column_refs().is_subset(&right_columns)
    {
        Ok((cond_right.clone(), cond_left.clone()))
    } else {
        Err(QueryError::PlanError(
            "hash join keys do not align with either input".to_string(),
        ))
    }
}
