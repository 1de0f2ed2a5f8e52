use clap::Parser;
use tracing::debug;

mod demos;

#[derive(Parser)]
#[command(name = "krait")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Poke at the embedded Python interpreter through the delegation bridge")]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Trigger foreign exceptions and render their rewrapped payloads
    #[arg(long)]
    exceptions: bool,

    /// Call a foreign constructor with keyword arguments
    #[arg(long)]
    kwargs: bool,

    /// Use special operators like `+` and `*` on foreign strings
    #[arg(long)]
    special_operators: bool,

    /// Build a foreign function with eval() and then apply it
    #[arg(long)]
    function_application: bool,

    /// Bind an attribute dynamically to a foreign value
    #[arg(long)]
    dynamic_attribute_binding: bool,

    /// Parse TEXT with the foreign int constructor and print its repr
    #[arg(long, value_name = "TEXT")]
    parse_int: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut ran_any = false;
    if cli.exceptions {
        demos::exceptions()?;
        ran_any = true;
    }
    if cli.kwargs {
        demos::kwargs()?;
        ran_any = true;
    }
    if cli.special_operators {
        demos::special_operators()?;
        ran_any = true;
    }
    if cli.function_application {
        demos::function_application()?;
        ran_any = true;
    }
    if cli.dynamic_attribute_binding {
        demos::dynamic_attribute_binding()?;
        ran_any = true;
    }
    if let Some(text) = &cli.parse_int {
        demos::parse_int(text)?;
        ran_any = true;
    }

    if ran_any {
        debug!("all selected demos completed");
    } else {
        eprintln!("nothing to do; pass --help for the list of demos");
    }
    Ok(())
}

fn init_tracing(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
