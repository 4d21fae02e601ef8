//! Demo CLI: parses a bracketed, comma-separated integer list and prints
//! its sum.

use std::collections::HashMap;
use std::fs;
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};
use colored::Colorize;

use parsegen::{Action, Lexer, Maker, Parser, StackValue, Symbol, TerminalKind, TokenInstance};

#[derive(ClapParser, Debug)]
#[command(author, version, about = "Parses a bracketed integer list and prints its sum")]
struct Cli {
    /// Source file holding the list literal.
    src: std::path::PathBuf,

    /// Log level of the table builder's diagnostic channel.
    #[arg(value_enum, short, long, default_value_t = LogLevel::Error)]
    verbosity: LogLevel,
}

#[derive(ValueEnum, Clone, Default, Debug)]
enum LogLevel {
    #[default]
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum ListKind {
    Num,
    LBracket,
    RBracket,
    Comma,
}

impl TerminalKind for ListKind {}

#[derive(Clone, Debug, Default)]
struct IntList {
    items: Vec<i64>,
}

type ListToken = TokenInstance<ListKind>;
type ListValue = StackValue<IntList, ListToken>;

fn num_value(value: &ListValue) -> i64 {
    value
        .clone()
        .into_token()
        .expect("NUM token")
        .text
        .parse()
        .expect("lexer only emits digit sequences for NUM")
}

fn build_lexer() -> Lexer<ListKind, ListToken, ()> {
    let mut modes = HashMap::new();
    modes.insert(
        "start".to_string(),
        vec![
            (r"[ \t\n]+".to_string(), Action::Jump("start".to_string())),
            (r"\[".to_string(), Action::Emit(ListKind::LBracket)),
            (r"\]".to_string(), Action::Emit(ListKind::RBracket)),
            (r",".to_string(), Action::Emit(ListKind::Comma)),
            (r"-?\d+".to_string(), Action::Emit(ListKind::Num)),
        ],
    );
    Lexer::new(modes, || ()).expect("list lexer modes are well-formed")
}

fn build_parser() -> Parser<ListKind, IntList, ListToken> {
    use ListKind::*;

    let list = (
        "list".to_string(),
        vec![(
            vec![
                Symbol::Terminal(LBracket),
                Symbol::NonTerminal("items".into()),
                Symbol::Terminal(RBracket),
            ],
            Maker::identity(1),
        )],
    );

    let items = (
        "items".to_string(),
        vec![
            (
                vec![
                    Symbol::Terminal(Num),
                    Symbol::Terminal(Comma),
                    Symbol::NonTerminal("items".into()),
                ],
                Maker::construct(vec![0, 2], |args| {
                    let head = num_value(&args[0]);
                    let mut tail = args[1].clone().into_node().expect("items").items;
                    tail.insert(0, head);
                    IntList { items: tail }
                }),
            ),
            (
                vec![Symbol::Terminal(Num)],
                Maker::construct(vec![0], |args| IntList {
                    items: vec![num_value(&args[0])],
                }),
            ),
            (vec![], Maker::construct(vec![], |_| IntList::default())),
        ],
    );

    Parser::new(vec![list, items]).expect("list grammar has no unresolved conflicts")
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    simple_logger::init_with_level((&cli.verbosity).into()).unwrap();

    let src = match fs::read_to_string(&cli.src) {
        Ok(src) => src,
        Err(e) => {
            eprintln!("{}", format!("failed to read {:?}: {e}", cli.src).red());
            return ExitCode::FAILURE;
        }
    };

    let lexer = build_lexer();
    let tokens: Result<Vec<_>, _> = lexer.lex("start", &src).collect();
    let tokens = match tokens {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            return ExitCode::FAILURE;
        }
    };

    let parser = build_parser();
    let result = match parser.parse("list", tokens) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            return ExitCode::FAILURE;
        }
    };

    let Some(list) = result.into_node() else {
        eprintln!("{}", "parse succeeded but did not produce a list".red());
        return ExitCode::FAILURE;
    };

    println!("{}", list.items.iter().sum::<i64>());
    ExitCode::SUCCESS
}
