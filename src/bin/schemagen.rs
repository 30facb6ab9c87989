//! schemagen CLI - schema-driven code generation from SQL DDL
//!
//! Parses DDL into a schema document, merges it with authored views and
//! application visibility, and generates sources from templates.

use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use schemagen::codegen::yaml_loader::read_document;
use schemagen::codegen::{
    load_applications, load_schema, load_views, merge, save_merged, save_schema,
    CodeGenerator, DocumentSource, GeneratorOptions, NamingConvention,
    ProjectConfig, TemplateSet, ViewsDocument, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE,
};
use schemagen::ddl::{DdlParser, SqlServerDdlParser};
use schemagen::schema::build_schema;

#[derive(Parser)]
#[command(name = "schemagen")]
#[command(version, about = "Schema-driven data-access code generation from SQL DDL", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a DDL script into a schema document
    Parse {
        /// SQL DDL script
        input_sql: PathBuf,

        /// Schema document to write
        output_yaml: PathBuf,

        /// Key convention of the written document
        #[arg(long, default_value = "snake_case")]
        convention: NamingConvention,
    },

    /// Merge a schema document with views and application visibility
    Merge {
        /// Schema document (snake_case)
        #[arg(long)]
        schema_yaml: PathBuf,

        /// Optional views document
        #[arg(long)]
        views_yaml: Option<PathBuf>,

        /// Key convention of the views document
        #[arg(long, default_value = "pascal_case")]
        views_convention: NamingConvention,

        /// Optional applications document (snake_case)
        #[arg(long)]
        applications_yaml: Option<PathBuf>,

        /// Merged document to write (snake_case)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate sources from a schema or views document
    Generate {
        #[command(subcommand)]
        target: GenerateTarget,
    },

    /// Run parse, merge and generate from a project configuration file
    Run {
        /// Path to schemagen.yaml (default: $SCHEMAGEN_CONFIG or ./schemagen.yaml)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum GenerateTarget {
    /// Generate one file per entity
    Entities {
        /// Schema or merged document
        #[arg(long)]
        schema_yaml: PathBuf,

        /// Output directory for entity sources
        #[arg(long)]
        output_dir: PathBuf,

        /// Directory holding entity.cs.tera
        #[arg(long, default_value = "templates")]
        templates: PathBuf,

        /// Namespace of generated classes
        #[arg(long, default_value = "Generated")]
        namespace: String,
    },

    /// Generate view sources
    Views {
        /// Views or merged document
        #[arg(long)]
        views_yaml: PathBuf,

        /// Key convention of the views document
        #[arg(long, default_value = "pascal_case")]
        views_convention: NamingConvention,

        /// Output directory for view sources
        #[arg(long)]
        output_dir: PathBuf,

        /// Directory holding view.cs.tera
        #[arg(long, default_value = "templates")]
        templates: PathBuf,

        /// Namespace of generated classes
        #[arg(long, default_value = "Generated")]
        namespace: String,
    },
}

fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("schemagen=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse {
            input_sql,
            output_yaml,
            convention,
        } => parse_command(input_sql, output_yaml, convention),
        Commands::Merge {
            schema_yaml,
            views_yaml,
            views_convention,
            applications_yaml,
            output,
        } => merge_command(schema_yaml, views_yaml, views_convention, applications_yaml, output),
        Commands::Generate { target } => match target {
            GenerateTarget::Entities {
                schema_yaml,
                output_dir,
                templates,
                namespace,
            } => generate_entities_command(schema_yaml, output_dir, templates, namespace),
            GenerateTarget::Views {
                views_yaml,
                views_convention,
                output_dir,
                templates,
                namespace,
            } => generate_views_command(views_yaml, views_convention, output_dir, templates, namespace),
        },
        Commands::Run { config } => run_command(config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Parse DDL and write the schema document
fn parse_command(
    input_sql: PathBuf,
    output_yaml: PathBuf,
    convention: NamingConvention,
) -> schemagen::Result<()> {
    println!("🔍 Parsing {}...", input_sql.display());

    let sql = fs::read_to_string(&input_sql).map_err(|e| schemagen::Error::Io {
        path: input_sql.clone(),
        source: e,
    })?;
    let tables = SqlServerDdlParser::new().parse(&sql)?;
    println!("  ✓ Parsed {} tables", tables.len());

    let schema = build_schema(&tables);
    save_schema(&schema, &DocumentSource::new(&output_yaml, convention))?;
    println!("  ✓ Wrote {} entities to {}", schema.entities.len(), output_yaml.display());

    Ok(())
}

/// Merge schema, views and applications into one document
fn merge_command(
    schema_yaml: PathBuf,
    views_yaml: Option<PathBuf>,
    views_convention: NamingConvention,
    applications_yaml: Option<PathBuf>,
    output: PathBuf,
) -> schemagen::Result<()> {
    println!("🔀 Merging {}...", schema_yaml.display());

    let schema = load_schema(&DocumentSource::new(schema_yaml, NamingConvention::SnakeCase))?;
    println!("  ✓ Loaded {} entities", schema.entities.len());

    let views_source = views_yaml.map(|p| DocumentSource::new(p, views_convention));
    let views = load_views(views_source.as_ref())?;
    match &views {
        Some(doc) => println!("  ✓ Loaded {} views", doc.views.len()),
        None => println!("  ℹ No views document (optional)"),
    }

    let apps_source = applications_yaml.map(|p| DocumentSource::new(p, NamingConvention::SnakeCase));
    let applications = load_applications(apps_source.as_ref())?;
    match &applications {
        Some(doc) => println!("  ✓ Loaded {} applications", doc.applications.len()),
        None => println!("  ℹ No applications document (optional)"),
    }

    let document = merge(schema, views, applications);
    save_merged(&document, &DocumentSource::new(&output, NamingConvention::SnakeCase))?;
    println!("  ✓ Wrote {}", output.display());

    Ok(())
}

/// Generate entity sources from a schema or merged document
fn generate_entities_command(
    schema_yaml: PathBuf,
    output_dir: PathBuf,
    templates: PathBuf,
    namespace: String,
) -> schemagen::Result<()> {
    println!("🔧 Generating entities from {}...", schema_yaml.display());

    let schema = load_schema(&DocumentSource::new(schema_yaml, NamingConvention::SnakeCase))?;
    let generator = CodeGenerator::new(GeneratorOptions {
        namespace,
        ..Default::default()
    });

    let count = generator.generate_entities(
        &schema.entities,
        &TemplateSet::from_dir(&templates).entity,
        &output_dir,
    )?;
    println!("  ✓ Generated {} entity files in {}", count, output_dir.display());
    println!("✨ Code generation complete!");

    Ok(())
}

/// Generate view sources from a views or merged document
fn generate_views_command(
    views_yaml: PathBuf,
    views_convention: NamingConvention,
    output_dir: PathBuf,
    templates: PathBuf,
    namespace: String,
) -> schemagen::Result<()> {
    println!("🔧 Generating views from {}...", views_yaml.display());

    let document: ViewsDocument = read_document(&DocumentSource::new(views_yaml, views_convention))?;
    if document.is_empty() {
        println!("  ℹ Document defines no views");
    }
    let generator = CodeGenerator::new(GeneratorOptions {
        namespace,
        ..Default::default()
    });

    let count = generator.generate_views(
        &document.views,
        &TemplateSet::from_dir(&templates).view,
        &output_dir,
    )?;
    println!("  ✓ Generated {} view files in {}", count, output_dir.display());
    println!("✨ Code generation complete!");

    Ok(())
}

/// Run the full pipeline from schemagen.yaml
fn run_command(config: Option<PathBuf>) -> schemagen::Result<()> {
    let config_path = config
        .or_else(|| std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    println!("📋 Loading configuration from {}...", config_path.display());
    let config = ProjectConfig::from_file(&config_path)?;

    let summary = schemagen::codegen::run_pipeline(&config)?;
    println!("  ✓ Parsed {} tables", summary.tables);
    println!("  ✓ Merged {} entities and {} views", summary.entities, summary.views);
    println!("  ✓ Updated {} applications", summary.applications);
    println!("  ✓ Wrote {} files", summary.files_written);
    println!("✨ Code generation complete!");

    Ok(())
}
