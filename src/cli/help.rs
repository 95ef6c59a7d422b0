//! Usage text rendering

use crate::{
    cli::schema::{Param, SpecSchema, ValueKind},
    config::{
        CLI_FLAG_LONG_PREFIX, CLI_FLAG_SHORT_PREFIX, CLI_FLAG_VALUE_SEPARATOR,
        CLI_OPTION_VALUES_SEPARATOR, PROGRAM_NAME,
    },
};

fn param_placeholder(param: Param) -> String {
    match param {
        Param::Flag => String::new(),
        Param::Boolean => format!("[{CLI_FLAG_VALUE_SEPARATOR}true|false]"),
        Param::Value {
            alias,
            kind: ValueKind::String,
        } => format!("{CLI_FLAG_VALUE_SEPARATOR}<{alias}>"),
        Param::Value {
            alias,
            kind: ValueKind::StringList,
        } => format!(
            "{CLI_FLAG_VALUE_SEPARATOR}<{alias}{CLI_OPTION_VALUES_SEPARATOR}{alias}{CLI_OPTION_VALUES_SEPARATOR}...>"
        ),
    }
}

/// Render the usage line followed by one entry per option, in schema order
pub fn build_help(schema: &SpecSchema) -> String {
    let mut lines = vec![format!(
        "Usage: {PROGRAM_NAME} [<options>] <target-command> [<args>]"
    )];

    if schema.is_empty() {
        return lines.join("\n");
    }

    lines.push("\nOptions:".to_string());
    for (_, spec) in schema.iter() {
        let placeholder = param_placeholder(spec.param);
        let mut flags = format!("\t{CLI_FLAG_LONG_PREFIX}{}{placeholder}", spec.long_flag);
        if let Some(short) = spec.short_flag {
            flags.push_str(&format!(", {CLI_FLAG_SHORT_PREFIX}{short}{placeholder}"));
        }
        lines.push(flags);
        lines.push(format!("\t\t{}", spec.description));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::schema::OptionSpec;

    const USAGE: &str = "Usage: envloadr [<options>] <target-command> [<args>]";

    fn single(short_flag: Option<&'static str>, param: Param) -> SpecSchema {
        SpecSchema::new([(
            "flag",
            OptionSpec {
                description: "Option description",
                long_flag: "flag",
                short_flag,
                param,
            },
        )])
        .unwrap()
    }

    fn expected(flags: &str) -> String {
        [USAGE, "\nOptions:", flags, "\t\tOption description"].join("\n")
    }

    #[test]
    fn test_empty_schema_renders_usage_only() {
        assert_eq!(build_help(&SpecSchema::default()), USAGE);
    }

    #[test]
    fn test_boolean_option() {
        assert_eq!(
            build_help(&single(None, Param::Boolean)),
            expected("\t--flag[=true|false]")
        );
        assert_eq!(
            build_help(&single(Some("f"), Param::Boolean)),
            expected("\t--flag[=true|false], -f[=true|false]")
        );
    }

    #[test]
    fn test_string_option() {
        let param = Param::Value {
            alias: "value",
            kind: ValueKind::String,
        };
        assert_eq!(build_help(&single(None, param)), expected("\t--flag=<value>"));
        assert_eq!(
            build_help(&single(Some("f"), param)),
            expected("\t--flag=<value>, -f=<value>")
        );
    }

    #[test]
    fn test_string_list_option() {
        let param = Param::Value {
            alias: "value",
            kind: ValueKind::StringList,
        };
        assert_eq!(
            build_help(&single(Some("f"), param)),
            expected("\t--flag=<value,value,...>, -f=<value,value,...>")
        );
    }

    #[test]
    fn test_presence_only_option() {
        assert_eq!(build_help(&single(None, Param::Flag)), expected("\t--flag"));
    }

    #[test]
    fn test_default_schema_lists_every_option() {
        let help = build_help(&crate::cli::schema::default_schema().unwrap());
        assert!(help.starts_with(USAGE));
        assert!(help.contains("\t--file=<path,path,...>, -f=<path,path,...>"));
        assert!(help.contains("\t--help, -h\n"));
        assert!(help.contains("\t--no-override[=true|false]\n"));
        assert!(help.contains("\t--verbose[=true|false], -v[=true|false]"));
    }
}
