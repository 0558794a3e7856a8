use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jsir_codegen::JsBackend;
use jsir_driver::report::report_failure;
use jsir_driver::{CompilerArguments, Driver, ExitStatus, Outcome};

#[derive(Parser, Debug)]
#[command(
    name = "jsirc",
    about = "Compile sources and libraries to a JavaScript module through the jsir backend",
    disable_version_flag = true
)]
struct Cli {
    /// Source files or directories
    sources: Vec<String>,

    /// Libraries to compile against (directories or zip/jar archives), separated by ':' (';' on Windows)
    #[arg(long, env = "JSIR_LIBRARIES")]
    libraries: Option<String>,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write a library artifact next to the output
    #[arg(long)]
    meta_info: bool,

    /// Module kind: plain, commonjs, amd or umd
    #[arg(long, value_name = "KIND")]
    module_kind: Option<String>,

    /// ECMAScript version of the output (only v5)
    #[arg(long)]
    target: Option<String>,

    /// Whether to call main when the module loads: call or noCall
    #[arg(long)]
    main: Option<String>,

    /// Generate a source map
    #[arg(long)]
    source_map: bool,

    /// Prefix for paths in a source map
    #[arg(long)]
    source_map_prefix: Option<String>,

    /// Base directories used to relativize source map paths
    #[arg(long)]
    source_map_base_dirs: Option<String>,

    /// Embed sources into the source map: always, never or inlining
    #[arg(long, value_name = "MODE")]
    source_map_embed_sources: Option<String>,

    /// Modules whose internal declarations are visible to this one
    #[arg(long)]
    friend_modules: Option<String>,

    /// Disable friend modules
    #[arg(long)]
    friend_modules_disabled: bool,

    /// Translate primitive arrays to typed arrays
    #[arg(long)]
    typed_arrays: bool,

    /// Incremental mode: allow running without sources
    #[arg(long, env = "JSIR_INCREMENTAL")]
    incremental: bool,

    /// Print the compiler version
    #[arg(long)]
    version: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Keep directories extracted from library archives
    #[arg(long)]
    keep_extracted: bool,
}

impl From<Cli> for CompilerArguments {
    fn from(cli: Cli) -> Self {
        CompilerArguments {
            sources: cli.sources,
            libraries: cli.libraries,
            output: cli.output,
            meta_info: cli.meta_info,
            module_kind: cli.module_kind,
            target: cli.target,
            main: cli.main,
            source_map: cli.source_map,
            source_map_prefix: cli.source_map_prefix,
            source_map_base_dirs: cli.source_map_base_dirs,
            source_map_embed_sources: cli.source_map_embed_sources,
            friend_modules: cli.friend_modules,
            friend_modules_disabled: cli.friend_modules_disabled,
            typed_arrays: cli.typed_arrays,
            incremental: cli.incremental,
            version: cli.version,
            verbose: cli.verbose,
            keep_extracted: cli.keep_extracted,
        }
    }
}

fn main() -> ExitCode {
    let args = CompilerArguments::from(Cli::parse());
    init_logging(args.verbose);

    if args.version {
        println!("jsirc {}", env!("CARGO_PKG_VERSION"));
    }

    let driver = Driver::new(JsBackend::new());
    match driver.run(&args) {
        Ok(Outcome::VersionOnly) => ExitStatus::Ok.into(),
        Ok(Outcome::Compiled(compilation)) => {
            if args.verbose {
                println!("Output written to: {}", compilation.output.display());
                if let Some(artifact) = &compilation.library_artifact {
                    println!("Library written to: {}", artifact.display());
                }
            }
            ExitStatus::Ok.into()
        }
        Err(failure) => {
            if let Err(e) = report_failure(&failure.error, args.libraries.as_deref()) {
                eprintln!("error: {} ({})", failure.error, e);
            }
            failure.exit_status().into()
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("JSIR_LOG").unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
