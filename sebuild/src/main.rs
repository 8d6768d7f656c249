use std::io::Write;
use std::path::Path;

use tracing_subscriber::EnvFilter;

use sebuild::cli::{self, Sink};
use sebuild::{BuildOptions, ScriptBuilder};

fn main() {
    let args = cli::parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let options = BuildOptions::resolve(args.defs.as_deref(), args.ext.as_deref());
    tracing::debug!(?options, "resolved options");

    let script = match ScriptBuilder::new(options).build(&args.root, &args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("sebuild: error: {e}");
            std::process::exit(1);
        }
    };

    // ── Write the flattened script ────────────────────────────────────────────
    let sink = args.sink();
    if let Err(e) = write_script(&sink, script) {
        eprintln!("sebuild: error: unable to write output: {e}");
        std::process::exit(1);
    }

    let dest = match &sink {
        Sink::Stdout => "built".to_owned(),
        Sink::Clipboard => "built and copied to clipboard".to_owned(),
        Sink::File(path) => format!("built and written to {}", path.display()),
    };
    eprintln!("---- ----\n!!! script {dest} !!!\n---- ----");
}

fn write_script(sink: &Sink, script: String) -> Result<(), Box<dyn std::error::Error>> {
    match sink {
        Sink::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(script.as_bytes())?;
            stdout.flush()?;
        }
        Sink::Clipboard => arboard::Clipboard::new()?.set_text(script)?,
        Sink::File(path) => std::fs::write(Path::new(path), script)?,
    }
    Ok(())
}
