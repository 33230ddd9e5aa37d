use std::error::Error;
use std::fs;
use std::io::{self, Read, Write};
use std::rc::Rc;

use clap::{ArgAction, Parser};
use property_graph::{Arena, DatumKind, Factory, ParseOptions, ScopeId, TypeManager};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "scope-dump",
    version,
    about = "Load a table-grammar JSON document and print its property tree"
)]
struct Args {
    /// Input file path. Omit or use '-' to read from stdin.
    input: Option<String>,

    /// Output file path (prints to stdout if omitted).
    #[arg(short, long, value_name = "file")]
    output: Option<String>,

    /// Extra class name to accept for "class" keys; built as a plain scope.
    #[arg(long = "class", value_name = "name")]
    classes: Vec<String>,

    /// JSON file with parse options (maxDepth, strict).
    #[arg(long, value_name = "file")]
    config: Option<String>,

    /// Deepest object nesting to accept.
    #[arg(long = "max-depth", value_name = "number")]
    max_depth: Option<usize>,

    /// Convert literals leniently and accept bare "key": literal properties.
    #[arg(long = "no-strict", action = ArgAction::SetFalse, default_value_t = true)]
    strict: bool,

    /// Log parse events to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("ERROR  {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let options = resolve_options(&args)?;
    let mut factory = Factory::new();
    for class in &args.classes {
        factory.register_scope(class);
    }

    let input = read_input(args.input.as_deref())?;
    let (arena, root) = property_graph::from_str_with_options(
        &input,
        Rc::new(factory),
        Rc::new(TypeManager::new()),
        &options,
    )?;

    with_output_writer(args.output.as_deref(), |writer| {
        write_scope(writer, &arena, root, 0)
    })
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "property_graph=debug"
    } else {
        "property_graph=info"
    };
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn resolve_options(args: &Args) -> Result<ParseOptions, Box<dyn Error>> {
    let mut options = match args.config.as_deref() {
        Some(path) => ParseOptions::from_json_str(&fs::read_to_string(path)?)?,
        None => ParseOptions::new(),
    };
    if let Some(max_depth) = args.max_depth {
        options = options.with_max_depth(max_depth);
    }
    if !args.strict {
        options = options.with_strict(false);
    }
    Ok(options)
}

fn read_input(input: Option<&str>) -> Result<String, Box<dyn Error>> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(fs::read_to_string(path)?),
    }
}

fn with_output_writer<F>(path: Option<&str>, f: F) -> Result<(), Box<dyn Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn Error>>,
{
    match path {
        Some(path) if path != "-" => {
            let mut file = fs::File::create(path)?;
            f(&mut file)
        }
        _ => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            f(&mut handle)
        }
    }
}

/// One line per property, nested scopes indented under their table.
fn write_scope(
    writer: &mut dyn Write,
    arena: &Arena,
    id: ScopeId,
    level: usize,
) -> Result<(), Box<dyn Error>> {
    let pad = "  ".repeat(level);
    for (name, datum) in arena.get(id)?.entries() {
        match datum.kind() {
            None => writeln!(writer, "{pad}{name}: unset")?,
            Some(DatumKind::Table) => {
                writeln!(writer, "{pad}{name}: table[{}]", datum.len())?;
                for (index, child) in datum.scopes().iter().enumerate() {
                    let class = arena.get(*child)?.class_name();
                    writeln!(writer, "{pad}  [{index}] {class}")?;
                    write_scope(writer, arena, *child, level + 2)?;
                }
            }
            Some(kind) => writeln!(writer, "{pad}{name}: {kind}[{}] = {datum}", datum.len())?,
        }
    }
    Ok(())
}
