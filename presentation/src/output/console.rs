//! Console output formatter for tools and invocation results

use colored::Colorize;
use serde_json::Value;
use toolbridge_domain::config::{ConfigIssue, Severity};
use toolbridge_domain::tool::entities::ToolDefinition;
use toolbridge_domain::tool::schema::FieldDescriptor;
use toolbridge_domain::tool::value_objects::InvocationResult;

/// Formats tool listings and results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the tools registered from a page
    pub fn format_tools(page: &str, tools: &[ToolDefinition]) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Tools on {}", page)));
        output.push('\n');

        if tools.is_empty() {
            output.push_str(&format!("\n{}\n", "No annotated elements found.".dimmed()));
        }
        for tool in tools {
            output.push('\n');
            output.push_str(&Self::format_tool(tool));
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format one tool with its parameters
    pub fn format_tool(tool: &ToolDefinition) -> String {
        let mut output = format!(
            "{} {} {}\n",
            tool.name.as_str().yellow().bold(),
            format!("[{}]", tool.kind).dimmed(),
            tool.title
        );
        if !tool.description.is_empty() {
            output.push_str(&Self::indent(&tool.description, "  "));
            output.push('\n');
        }
        for field in tool.input_schema.iter() {
            output.push_str(&format!("  * {}\n", Self::format_field(field)));
        }
        output
    }

    fn format_field(field: &FieldDescriptor) -> String {
        let kind = match &field.enum_values {
            Some(values) => values.join(" | "),
            None => field.kind.to_string(),
        };
        let name = if field.required {
            field.name.bold().to_string()
        } else {
            field.name.clone()
        };
        format!("{} ({}): {}", name, kind.cyan(), field.description)
    }

    /// Format an invocation result envelope
    pub fn format_result(tool: &str, result: &InvocationResult) -> String {
        let status = if result.is_error() {
            "ERROR".red().bold()
        } else {
            "OK".green().bold()
        };
        let mut output = format!("{} {}\n", status, tool.bold());
        for text in result.content.iter().map(|block| block.text()) {
            output.push_str(&Self::indent(text, "  "));
            output.push('\n');
        }
        output
    }

    /// Format as JSON
    pub fn format_json(value: &Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format configuration issues, one per line
    pub fn format_issues(issues: &[ConfigIssue]) -> String {
        issues
            .iter()
            .map(|issue| {
                let label = match issue.severity {
                    Severity::Error => "error:".red().bold(),
                    Severity::Warning => "warning:".yellow().bold(),
                };
                format!("{} {}\n", label, issue.message)
            })
            .collect()
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolbridge_domain::config::ConfigIssueCode;
    use toolbridge_domain::page::{FormControl, FormElement};
    use toolbridge_domain::tool::entities::ToolKind;
    use toolbridge_domain::tool::naming::ToolName;
    use toolbridge_domain::tool::schema::build_param_schema;
    use toolbridge_domain::tool::value_objects::ToolError;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_format_tools() {
        plain();
        let form = FormElement::new()
            .with_control(FormControl::input("text").named("text").required())
            .with_control(FormControl::input("number").named("priority"));
        let tool = ToolDefinition::new(ToolName::parse("add-todo").unwrap(), "Add a todo", ToolKind::Form)
            .with_schema(build_param_schema(&form).0);

        let output = ConsoleFormatter::format_tools("https://todo.example/", &[tool]);
        assert!(output.contains("add-todo [form] Add Todo"));
        assert!(output.contains("  Add a todo"));
        assert!(output.contains("  * text (string): [required]"));
        assert!(output.contains("  * priority (number): Numeric value [number] [optional]"));

        let empty = ConsoleFormatter::format_tools("https://todo.example/", &[]);
        assert!(empty.contains("No annotated elements found."));
    }

    #[test]
    fn test_format_result() {
        plain();
        let ok = InvocationResult::text("{\n  \"success\": true\n}");
        assert_eq!(
            ConsoleFormatter::format_result("add-todo", &ok),
            "OK add-todo\n  {\n    \"success\": true\n  }\n"
        );

        let failed = InvocationResult::from(ToolError::not_found("nope"));
        assert!(ConsoleFormatter::format_result("nope", &failed).starts_with("ERROR nope"));
    }

    #[test]
    fn test_format_issues() {
        plain();
        let issues = vec![ConfigIssue::warning(
            ConfigIssueCode::ZeroDuration {
                field: "watch.interval_secs".to_string(),
            },
            "watch.interval_secs is 0",
        )];
        assert_eq!(
            ConsoleFormatter::format_issues(&issues),
            "warning: watch.interval_secs is 0\n"
        );
    }
}
