//! The per-step render passes.
//!
//! Each pass writes one generated file into the step workspace:
//!
//! | pass      | file                      | mode    |
//! |-----------|---------------------------|---------|
//! | variables | `infrapipe_variables.tf`  | append  |
//! | locals    | `infrapipe_locals.tf`     | rewrite |
//! | lookups   | `infrapipe_inputs.tf`     | append  |
//! | outputs   | `infrapipe_outputs.tf`    | append  |

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::config::ValueMap;
use crate::error::{PipelineError, Result};
use crate::inject::InjectSpec;
use crate::outputs::ResolvedOutput;
use crate::workspace::DeclaredResources;

use super::document::{render_block, render_blocks, Block, Expr};

pub const VARIABLES_FILE: &str = "infrapipe_variables.tf";
pub const LOCALS_FILE: &str = "infrapipe_locals.tf";
pub const INPUTS_FILE: &str = "infrapipe_inputs.tf";
pub const OUTPUTS_FILE: &str = "infrapipe_outputs.tf";

/// Resource families whose data sources are not addressed by `id`.
const LOOKUP_ATTRIBUTES: &[(&str, &str)] = &[("aws_instance", "instance_id")];

const DEFAULT_LOOKUP_ATTRIBUTE: &str = "id";

/// The attribute a data source of `resource_type` is looked up by.
pub fn lookup_attribute(resource_type: &str) -> &'static str {
    LOOKUP_ATTRIBUTES
        .iter()
        .find(|(family, _)| *family == resource_type)
        .map(|(_, attr)| *attr)
        .unwrap_or(DEFAULT_LOOKUP_ATTRIBUTE)
}

/// One `variable` block per key, with the value as its default.
pub fn variable_blocks(variables: &ValueMap) -> Vec<Block> {
    variables
        .iter()
        .map(|(key, value)| {
            Block::new("variable")
                .label(key)
                .attr("default", Expr::from(value))
        })
        .collect()
}

/// A single `locals` block holding every entry of `locals`.
pub fn locals_block(locals: &ValueMap) -> Block {
    locals
        .iter()
        .fold(Block::new("locals"), |block, (key, value)| {
            block.attr(key, Expr::from(value))
        })
}

/// One data-source lookup per resolved output.
pub fn lookup_blocks(outputs: &[ResolvedOutput]) -> Vec<Block> {
    outputs
        .iter()
        .map(|output| {
            Block::new("data")
                .label(&output.resource_type)
                .label(&output.name)
                .attr(
                    lookup_attribute(&output.resource_type),
                    Expr::string(&output.id),
                )
        })
        .collect()
}

/// Output declarations for the injects this step can satisfy.
#[derive(Debug, Default)]
pub struct OutputPlan {
    /// One block per distinct output name.
    pub blocks: Vec<Block>,
    /// Every inject whose resource the step declares, in inject order.
    pub matched: Vec<InjectSpec>,
}

/// Plan outputs for every inject whose `(type, resource_name)` the step
/// declares. Unmatched injects are skipped.
///
/// # Errors
///
/// Returns `ConfigError` when two matched injects on different resources
/// need the same output name.
pub fn plan_outputs(injects: &[InjectSpec], declared: &DeclaredResources) -> Result<OutputPlan> {
    let mut plan = OutputPlan::default();
    let mut emitted: HashMap<String, &InjectSpec> = HashMap::new();

    for inject in injects {
        if !declared.contains(&inject.resource_type, &inject.resource_name) {
            continue;
        }
        let name = inject.output_name();
        match emitted.get(&name) {
            Some(owner) if owner.resource_type != inject.resource_type => {
                return Err(PipelineError::config(format!(
                    "injects '{}' ({}.{}) and '{}' ({}.{}) both need output '{}'",
                    owner.name,
                    owner.resource_type,
                    owner.resource_name,
                    inject.name,
                    inject.resource_type,
                    inject.resource_name,
                    name
                )));
            }
            Some(_) => {}
            None => {
                plan.blocks.push(Block::new("output").label(&name).attr(
                    "value",
                    Expr::traversal([
                        inject.resource_type.as_str(),
                        inject.resource_name.as_str(),
                        "id",
                    ]),
                ));
                emitted.insert(name, inject);
            }
        }
        plan.matched.push(inject.clone());
    }

    Ok(plan)
}

/// Variables pass: append declarations for `variables`.
pub fn write_variables(dir: &Path, variables: &ValueMap) -> Result<()> {
    append_blocks(&dir.join(VARIABLES_FILE), &variable_blocks(variables))
}

/// Locals pass: rewrite the locals file with a single block.
pub fn write_locals(dir: &Path, locals: &ValueMap) -> Result<()> {
    fs::write(dir.join(LOCALS_FILE), render_block(&locals_block(locals)))?;
    Ok(())
}

/// Data-lookup pass: append a lookup per resolved output.
pub fn write_lookups(dir: &Path, outputs: &[ResolvedOutput]) -> Result<()> {
    append_blocks(&dir.join(INPUTS_FILE), &lookup_blocks(outputs))
}

/// Output-declaration pass: append outputs and return the matched injects.
pub fn write_outputs(
    dir: &Path,
    injects: &[InjectSpec],
    declared: &DeclaredResources,
) -> Result<Vec<InjectSpec>> {
    let plan = plan_outputs(injects, declared)?;
    append_blocks(&dir.join(OUTPUTS_FILE), &plan.blocks)?;
    Ok(plan.matched)
}

fn append_blocks(path: &Path, blocks: &[Block]) -> Result<()> {
    if blocks.is_empty() {
        return Ok(());
    }

    let needs_separator = fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if needs_separator {
        file.write_all(b"\n")?;
    }
    file.write_all(render_blocks(blocks).as_bytes())?;
    Ok(())
}
