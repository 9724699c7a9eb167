//! Generated module fragments.
//!
//! - [`document`] - block/expression model and its single renderer
//! - [`fragments`] - the variables, locals, lookup and output passes

pub mod document;
pub mod fragments;

pub use document::{render_block, render_blocks, render_expr, Block, Expr};
pub use fragments::{
    locals_block, lookup_attribute, lookup_blocks, plan_outputs, variable_blocks, write_locals,
    write_lookups, write_outputs, write_variables, OutputPlan, INPUTS_FILE, LOCALS_FILE,
    OUTPUTS_FILE, VARIABLES_FILE,
};
