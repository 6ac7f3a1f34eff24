use clap::Parser;
use hexvc::protocol::Repl;
use hexvc::vc::Params;
use std::io::{BufReader, BufWriter};
use std::net::TcpListener;

/// the `hexvc` command-line entry point: drives the text command
/// protocol over stdin/stdout, or over a TCP socket when `--listen` is
/// given.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// listen for one connection at this address instead of using stdio,
    /// e.g. `127.0.0.1:6178`.
    #[arg(long)]
    listen: Option<String>,

    /// prompt for each command with a readline-style editable input
    /// instead of reading raw lines from stdin. ignored with `--listen`.
    #[arg(long)]
    interactive: bool,
}

fn main() {
    hexvc::init();
    let args = Args::parse();
    let mut repl = Repl::new(Params::default());

    let result = match args.listen {
        Some(addr) => run_tcp(&mut repl, &addr),
        None if args.interactive => run_interactive(&mut repl),
        None => {
            let stdin = std::io::stdin();
            repl.run(stdin.lock(), std::io::stdout())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_interactive(repl: &mut Repl) -> anyhow::Result<()> {
    loop {
        let line: String = dialoguer::Input::new().with_prompt(">").allow_empty(true).interact_text()?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "quit" || trimmed == "exit" {
            return Ok(());
        }
        match repl.handle(trimmed) {
            Ok(reply) => println!("{}", reply),
            Err(e) => println!("error: {}", e),
        }
    }
}

fn run_tcp(repl: &mut Repl, addr: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr)?;
    log::info!("listening on {}", addr);
    let (stream, peer) = listener.accept()?;
    log::info!("accepted connection from {}", peer);
    let reader = BufReader::new(stream.try_clone()?);
    let writer = BufWriter::new(stream);
    repl.run(reader, writer)
}
