use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Ion Schema code generation orchestrator
#[derive(Parser, Debug)]
#[command(
    name = "islgen",
    about = "Ion Schema code generation orchestrator for incremental builds",
    version,
    long_about = "islgen runs the ion CLI's code generator as a managed pre-compilation \
                  step: it resolves the tool (honoring the ION_CLI override), invokes it \
                  per schema file, fingerprints schema inputs so unchanged projects skip \
                  regeneration, and reports the generated source set for the build to \
                  compile."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Increase verbosity (debug logging)"
    )]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Generate sources from Ion Schema files",
        long_about = "Runs the generator tool for every schema declared in islgen.toml, \
                      skipping generation when the fingerprinted inputs are unchanged.\n\n\
                      Examples:\n  \
                      islgen generate\n  \
                      islgen generate /path/to/project\n  \
                      islgen generate --force --format json\n  \
                      islgen generate --language rust --schema-dir schema --schema foo.isl"
    )]
    Generate(GenerateArgs),

    #[command(
        about = "Report whether generated sources are up to date",
        long_about = "Checks staleness without invoking the generator.\n\n\
                      Exit codes: 0 fresh, 1 stale, 2 error.\n\n\
                      Examples:\n  \
                      islgen check\n  \
                      islgen check --format json"
    )]
    Check(CheckArgs),

    #[command(about = "Remove the generated output directory and its fingerprint")]
    Clean(CleanArgs),

    #[command(
        about = "Check generator tool availability",
        long_about = "Resolves the generator tool the way 'generate' would (ION_CLI \
                      override, then PATH) and reports where it was found and its \
                      version.\n\n\
                      Examples:\n  \
                      islgen doctor\n  \
                      ION_CLI=/opt/ion/bin/ion islgen doctor --format json"
    )]
    Doctor(DoctorArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct GenerateArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to project root (defaults to current directory)"
    )]
    pub project_path: Option<PathBuf>,

    #[arg(long, help = "Regenerate even when inputs are unchanged")]
    pub force: bool,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'l',
        long,
        value_name = "LANGUAGE",
        help = "Target language, overriding the manifest (java, rust)"
    )]
    pub language: Option<String>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Schema source directory, overriding the manifest"
    )]
    pub schema_dir: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        help = "Generated-source output directory, overriding the manifest"
    )]
    pub out_dir: Option<PathBuf>,

    #[arg(
        short = 's',
        long = "schema",
        value_name = "FILE",
        help = "Schema file to generate for (repeatable, overrides the manifest)"
    )]
    pub schemas: Vec<String>,

    #[arg(long, help = "Disable input fingerprinting for this run")]
    pub no_fingerprint: bool,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the report to a file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to project root (defaults to current directory)"
    )]
    pub project_path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct CleanArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to project root (defaults to current directory)"
    )]
    pub project_path: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct DoctorArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_args_verify() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_default_generate_args() {
        let args = CliArgs::parse_from(["islgen", "generate"]);
        match args.command {
            Commands::Generate(generate_args) => {
                assert!(generate_args.project_path.is_none());
                assert!(!generate_args.force);
                assert_eq!(generate_args.format, OutputFormatArg::Human);
                assert!(generate_args.language.is_none());
                assert!(generate_args.schemas.is_empty());
                assert!(!generate_args.no_fingerprint);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_generate_with_options() {
        let args = CliArgs::parse_from([
            "islgen",
            "generate",
            "/tmp/project",
            "--force",
            "--format",
            "json",
            "--language",
            "rust",
            "--schema-dir",
            "schema",
            "--out-dir",
            "generated",
            "-s",
            "a.isl",
            "-s",
            "b.isl",
            "--no-fingerprint",
        ]);

        match args.command {
            Commands::Generate(generate_args) => {
                assert_eq!(
                    generate_args.project_path,
                    Some(PathBuf::from("/tmp/project"))
                );
                assert!(generate_args.force);
                assert_eq!(generate_args.format, OutputFormatArg::Json);
                assert_eq!(generate_args.language, Some("rust".to_string()));
                assert_eq!(generate_args.schema_dir, Some(PathBuf::from("schema")));
                assert_eq!(generate_args.out_dir, Some(PathBuf::from("generated")));
                assert_eq!(generate_args.schemas, vec!["a.isl", "b.isl"]);
                assert!(generate_args.no_fingerprint);
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_check_command() {
        let args = CliArgs::parse_from(["islgen", "check", "--format", "yaml"]);
        match args.command {
            Commands::Check(check_args) => {
                assert_eq!(check_args.format, OutputFormatArg::Yaml);
            }
            _ => panic!("Expected Check command"),
        }
    }

    #[test]
    fn test_doctor_command() {
        let args = CliArgs::parse_from(["islgen", "doctor"]);
        match args.command {
            Commands::Doctor(doctor_args) => {
                assert_eq!(doctor_args.format, OutputFormatArg::Human);
            }
            _ => panic!("Expected Doctor command"),
        }
    }

    #[test]
    fn test_global_verbose_flag() {
        let args = CliArgs::parse_from(["islgen", "-v", "generate"]);
        assert!(args.verbose);
        assert!(!args.quiet);
    }

    #[test]
    fn test_global_quiet_flag() {
        let args = CliArgs::parse_from(["islgen", "-q", "check"]);
        assert!(!args.verbose);
        assert!(args.quiet);
    }

    #[test]
    fn test_log_level_flag() {
        let args = CliArgs::parse_from(["islgen", "--log-level", "debug", "clean"]);
        assert_eq!(args.log_level, Some("debug".to_string()));
    }
}
