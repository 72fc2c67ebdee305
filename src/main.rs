use clap::Parser as _;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use sh_syntax::{Error, File, InteractiveSession, LangVariant, Parser, ParserConfig, Printer, Stmt};

#[derive(clap::Parser)]
#[command(name = "shsyntax")]
#[command(about = "Parse shell scripts and print them back, formatted or as JSON")]
#[command(version)]
struct Cli {
    /// Language variant: bash, posix or mksh
    #[arg(short = 'l', long = "lang", default_value = "bash")]
    lang: LangVariant,

    /// Keep comments in the syntax tree
    #[arg(long = "keep-comments")]
    keep_comments: bool,

    /// Stop parsing at this word when it starts a line or follows a blank
    #[arg(long = "stop-at")]
    stop_at: Option<String>,

    /// Print the syntax tree as JSON instead of shell source
    #[arg(long = "tojson")]
    tojson: bool,

    /// Read statements from stdin one line at a time
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Script files to parse; stdin when none are given
    #[arg()]
    files: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = ParserConfig::new()
        .variant(cli.lang)
        .keep_comments(cli.keep_comments);
    if let Some(stop) = &cli.stop_at {
        config = config.stop_at(stop.clone());
    }
    let parser = Parser::new(config);

    let result = if cli.interactive {
        run_interactive(&parser, cli.tojson)
    } else {
        run_files(&parser, &cli.files, cli.tojson)
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_files(parser: &Parser, files: &[String], tojson: bool) -> Result<(), Error> {
    if files.is_empty() {
        let file = parser.parse_reader(io::stdin().lock(), "")?;
        return emit_file(&file, tojson);
    }
    for name in files {
        let reader = std::fs::File::open(name)?;
        let file = parser.parse_reader(reader, name)?;
        emit_file(&file, tojson)?;
    }
    Ok(())
}

fn emit_file(file: &File, tojson: bool) -> Result<(), Error> {
    let mut out = io::stdout().lock();
    if tojson {
        let json = serde_json::to_string_pretty(file).map_err(io::Error::from)?;
        writeln!(out, "{}", json)?;
    } else {
        write!(out, "{}", Printer::new().print(file))?;
    }
    Ok(())
}

fn run_interactive(parser: &Parser, tojson: bool) -> Result<(), Error> {
    let stdin = io::stdin();
    let mut session = InteractiveSession::new(parser);
    let mut printer = Printer::new();
    let mut write_err = None;
    let mut on_stmts = |stmts: &[Stmt]| {
        for stmt in stmts {
            let text = if tojson {
                serde_json::to_string(stmt).map(|s| s + "\n").map_err(io::Error::from)
            } else {
                Ok(printer.print_stmt(stmt))
            };
            if let Err(e) = text.and_then(|t| io::stdout().write_all(t.as_bytes())) {
                write_err = Some(e);
                return false;
            }
        }
        true
    };

    loop {
        eprint!("{}", if session.pending().is_empty() { "$ " } else { "> " });
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            session.finish(&mut on_stmts)?;
            break;
        }
        if !session.feed(&line, &mut on_stmts)? {
            break;
        }
    }
    match write_err {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
