//! @ai:module:intent Format search spaces and check results for terminals and JSON consumers
//! @ai:module:layer infrastructure
//! @ai:module:public_api OutputFormat, format_definition, format_check_result, to_json
//! @ai:module:depends_on definition, space
//! @ai:module:stateless true

use crate::definition::ProblemDefinition;
use crate::parameter::Parameter;
use crate::space::CheckResult;
use colored::Colorize;
use serde::Serialize;

/// @ai:intent Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    JsonPretty,
}

/// @ai:intent Render a benchmark definition as a string
/// @ai:effects pure
pub fn format_definition(definition: &ProblemDefinition, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(definition, false),
        OutputFormat::JsonPretty => to_json(definition, true),
        OutputFormat::Text => format_definition_text(definition),
    }
}

fn format_definition_text(definition: &ProblemDefinition) -> String {
    let space = definition.search_space();
    let mut output = String::new();

    output.push_str(&format!("{}\n", definition.name().bold()));

    output.push_str(&format!("\n{}\n", "Parameters:".cyan()));
    for param in space.params() {
        output.push_str(&format_param_line(param));
    }

    if !space.fidelity_params().is_empty() {
        output.push_str(&format!("\n{}\n", "Fidelity:".cyan()));
        for param in space.fidelity_params() {
            output.push_str(&format_param_line(param));
        }
    }

    output.push_str(&format!("\n{}\n", "Metrics:".cyan()));
    for metric in space.metrics() {
        let shape = if metric.singular { "scalar" } else { "per-repeat" };
        output.push_str(&format!(
            "  [{}] {} {}\n",
            metric.index,
            metric.name,
            shape.dimmed()
        ));
    }

    if !space.objectives().is_empty() {
        output.push_str(&format!("\n{}\n", "Objectives:".cyan()));
        for objective in space.objectives() {
            output.push_str(&format!(
                "  {} {} {}\n",
                objective.direction().yellow(),
                objective.name,
                format!("(metric {})", objective.metric.name).dimmed()
            ));
        }
    }

    if !space.constraints().is_empty() {
        output.push_str(&format!("\n{}\n", "Constraints:".cyan()));
        for constraint in space.constraints() {
            let deps: Vec<&str> = constraint
                .dependent_params()
                .iter()
                .map(String::as_str)
                .collect();
            output.push_str(&format!(
                "  {} {}\n",
                constraint.expression(),
                format!("[{}]", deps.join(", ")).dimmed()
            ));
        }
    }

    if let Some(size) = space.size() {
        output.push_str(&format!("\nUnconstrained size: {}\n", size));
    }

    output
}

fn format_param_line(param: &Parameter) -> String {
    let default = param
        .default()
        .map(|v| format!("default {}", v))
        .unwrap_or_else(|| "no default".to_string());
    format!("  {} {} {}\n", param.name(), param.domain(), default.dimmed())
}

/// @ai:intent Render a constraint check outcome as a string
/// @ai:effects pure
pub fn format_check_result(result: &CheckResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(result, false),
        OutputFormat::JsonPretty => to_json(result, true),
        OutputFormat::Text => format_check_result_text(result),
    }
}

fn format_check_result_text(result: &CheckResult) -> String {
    let mut output = String::new();

    for violation in &result.violations {
        output.push_str(&format!(
            "{} constraint #{} - {} ({})\n",
            "VIOLATED".red().bold(),
            violation.index,
            violation.expression,
            violation.dependent_params.join(", ").dimmed()
        ));
    }

    output.push_str(&format!(
        "Checked {} of {} constraints\n",
        result.constraints_checked, result.constraints_total
    ));

    if result.passed() {
        output.push_str(&format!("{} configuration is feasible\n", "OK".green().bold()));
    } else {
        output.push_str(&format!(
            "{} violations\n",
            result.violations.len().to_string().red().bold()
        ));
    }

    output
}

/// @ai:intent Serialize any value to JSON
/// @ai:effects pure
pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    if pretty {
        serde_json::to_string_pretty(value).unwrap_or_default()
    } else {
        serde_json::to_string(value).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::Constraint;
    use crate::metric::{Metric, Objective};
    use crate::space::{SearchSpace, Violation};

    fn definition() -> ProblemDefinition {
        let time = Metric::new("compute_time", 0, true);
        let space = SearchSpace::builder()
            .params(vec![
                Parameter::integer("tile", (1, 8), Some(2)).unwrap(),
                Parameter::permutation("permutation", 3, None).unwrap(),
            ])
            .objectives(vec![Objective::new("compute_time", &time, true)])
            .metrics(vec![time])
            .constraints(vec![Constraint::new("tile % 2 == 0", &["tile"]).unwrap()])
            .build()
            .unwrap();
        ProblemDefinition::new("demo", space).unwrap()
    }

    #[test]
    fn test_text_lists_every_section() {
        let text = format_definition(&definition(), OutputFormat::Text);
        assert!(text.contains("tile integer [1, 8]"));
        assert!(text.contains("permutation permutation of 3"));
        assert!(text.contains("compute_time"));
        assert!(text.contains("tile % 2 == 0"));
        assert!(text.contains("Unconstrained size: 48"));
    }

    #[test]
    fn test_json_output_is_parseable() {
        let json = format_definition(&definition(), OutputFormat::Json);
        let back: ProblemDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, definition());
    }

    #[test]
    fn test_check_result_text() {
        let result = CheckResult {
            constraints_checked: 1,
            constraints_total: 3,
            violations: vec![Violation {
                index: 2,
                expression: "tile % 2 == 0".to_string(),
                dependent_params: vec!["tile".to_string()],
            }],
        };
        let text = format_check_result(&result, OutputFormat::Text);
        assert!(text.contains("constraint #2 - tile % 2 == 0"));
        assert!(text.contains("Checked 1 of 3 constraints"));
    }
}
