//! Paramflow CLI - inspect, validate and render workflow parameter templates

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use paramflow::graph::inbound_sources;
use paramflow::template::spans;
use paramflow::{
    validate_template, validate_value, FixSuggestion, ParamflowError, TemplateExpression,
    WorkflowRun,
};

#[derive(Parser)]
#[command(name = "paramflow")]
#[command(about = "Paramflow - parameter templates for workflow nodes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate template strings, or every node parameter in a run file
    Validate {
        /// Template strings to check
        #[arg(required_unless_present = "run")]
        templates: Vec<String>,

        /// Check all node parameters in this run file instead
        #[arg(short, long, conflicts_with = "templates")]
        run: Option<PathBuf>,
    },

    /// Resolve a node's parameters against the run's context
    Render {
        /// Path to run file (.yaml or .json)
        file: PathBuf,

        /// Node whose parameters to resolve
        #[arg(short, long)]
        node: String,

        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
    },

    /// List the template variables available to a node
    Vars {
        /// Path to run file (.yaml or .json)
        file: PathBuf,

        /// Node to list variables for
        #[arg(short, long)]
        node: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Show how each expression in a template is classified
    Inspect {
        template: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { templates, run } => match run {
            Some(path) => validate_run(&path),
            None => validate_templates(&templates),
        },
        Commands::Render {
            file,
            node,
            compact,
        } => render(&file, &node, compact),
        Commands::Vars { file, node, format } => list_vars(&file, &node, format),
        Commands::Inspect { template } => {
            inspect(&template);
            Ok(())
        }
    };

    if let Err(e) = result {
        let source = e.downcast_ref::<ParamflowError>();
        let label = match source {
            Some(err) if err.is_validation() => "Invalid template:",
            _ => "Error:",
        };
        eprintln!("{} {:#}", label.red().bold(), e);
        if let Some(suggestion) = source.and_then(|e| e.fix_suggestion()) {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

fn load_run(path: &Path) -> anyhow::Result<WorkflowRun> {
    let source = fs::read_to_string(path)
        .map_err(ParamflowError::from)
        .with_context(|| format!("Failed to read run file {}", path.display()))?;
    let run = WorkflowRun::from_yaml(&source)
        .with_context(|| format!("Failed to load run file {}", path.display()))?;
    Ok(run)
}

fn validate_templates(templates: &[String]) -> anyhow::Result<()> {
    for template in templates {
        validate_template(template)?;
        println!("{} {}", "✓".green(), template);
    }
    Ok(())
}

fn validate_run(path: &Path) -> anyhow::Result<()> {
    let run = load_run(path)?;

    for node in &run.nodes {
        for (key, value) in &node.parameters {
            validate_value(value)
                .with_context(|| format!("node '{}', parameter '{}'", node.node_id, key))?;
        }
    }

    println!("{} Run file '{}' is valid", "✓".green(), path.display());
    println!("  Nodes: {}", run.nodes.len());
    println!("  Connections: {}", run.connections.len());
    Ok(())
}

fn render(path: &Path, node_id: &str, compact: bool) -> anyhow::Result<()> {
    let run = load_run(path)?;
    let params = serde_json::Value::Object(run.substitute_node(node_id)?);

    let out = if compact {
        serde_json::to_string(&params)
    } else {
        serde_json::to_string_pretty(&params)
    };
    let out = out.map_err(ParamflowError::from)?;

    println!("{out}");
    Ok(())
}

fn list_vars(path: &Path, node_id: &str, format: OutputFormat) -> anyhow::Result<()> {
    let run = load_run(path)?;
    let vars = run.variables_for(node_id)?;

    if format == OutputFormat::Json {
        let out = serde_json::to_string_pretty(&vars).map_err(ParamflowError::from)?;
        println!("{out}");
        return Ok(());
    }

    if vars.is_empty() {
        println!("{} No variables available for '{}'", "→".cyan(), node_id);
        return Ok(());
    }

    println!("{} Variables for '{}':", "→".cyan(), node_id.cyan().bold());
    for var in &vars {
        println!(
            "  {:<28} {:<16} {}",
            var.value.bold(),
            var.kind.as_str().dimmed(),
            var.description
        );
    }

    // previous_output/input.* follow the first inbound connection only
    let node = run.node(node_id)?;
    let inbound: Vec<&str> = inbound_sources(node, &run.connections).collect();
    if inbound.len() > 1 {
        println!(
            "  {} {} inbound connections; previous_output uses '{}'",
            "note:".yellow(),
            inbound.len(),
            inbound[0]
        );
    }

    Ok(())
}

fn inspect(template: &str) {
    let found: Vec<_> = spans(template).collect();
    if found.is_empty() {
        println!("{} No template expressions", "→".cyan());
        return;
    }

    for span in found {
        let parsed = TemplateExpression::parse(span.expr);
        let kind = parsed.kind().map_or("unknown", |k| k.as_str());
        let verdict = match validate_template(&template[span.range.clone()]) {
            Ok(()) => "✓".green(),
            Err(_) => "✗".red(),
        };
        let reads = if parsed.needs_predecessor() {
            "(reads predecessor)".dimmed().to_string()
        } else {
            String::new()
        };
        println!(
            "  {} {:>4}..{:<4} {:<16} {} {}",
            verdict,
            span.range.start,
            span.range.end,
            kind,
            parsed,
            reads
        );
    }
}
