//! Implementation of the `formguard rules` command.

use formguard_adapters::rules::catalog;

use crate::{cli::OutputFormat, error::CliResult, output::OutputManager};

pub fn execute(output: OutputManager) -> CliResult<()> {
    let rules = catalog();

    if output.format() == OutputFormat::Json {
        return output.json(rules);
    }

    output.header("Built-in rules:")?;
    for rule in rules {
        let params = if rule.parameters.is_empty() {
            String::new()
        } else {
            format!(" ({})", rule.parameters.join(", "))
        };
        output.print(&format!("  {:<10} {}{}", rule.type_name, rule.description, params))?;
    }
    Ok(())
}
