//! Demo CLI: parses and evaluates an arithmetic expression.

use std::collections::HashMap;
use std::fs;
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};
use colored::Colorize;

use parsegen::{
    Action, Associativity, Lexer, Maker, Parser, StackValue, Symbol, TerminalKind, TokenInstance,
};

#[derive(ClapParser, Debug)]
#[command(author, version, about = "Parses and evaluates an arithmetic expression")]
struct Cli {
    /// Source file holding the expression.
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
enum CalcKind {
    Num,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl TerminalKind for CalcKind {
    fn precedence(&self) -> i32 {
        match self {
            CalcKind::Star | CalcKind::Slash => 1,
            _ => 0,
        }
    }

    fn associativity(&self) -> Associativity {
        Associativity::Left
    }
}

#[derive(Debug)]
enum Tree {
    Const(i64),
    Add(Box<Tree>, Box<Tree>),
    Sub(Box<Tree>, Box<Tree>),
    Mul(Box<Tree>, Box<Tree>),
    Div(Box<Tree>, Box<Tree>),
}

impl Tree {
    fn eval(&self) -> i64 {
        match self {
            Tree::Const(n) => *n,
            Tree::Add(l, r) => l.eval() + r.eval(),
            Tree::Sub(l, r) => l.eval() - r.eval(),
            Tree::Mul(l, r) => l.eval() * r.eval(),
            Tree::Div(l, r) => l.eval() / r.eval(),
        }
    }
}

impl Clone for Tree {
    fn clone(&self) -> Self {
        match self {
            Tree::Const(n) => Tree::Const(*n),
            Tree::Add(l, r) => Tree::Add(l.clone(), r.clone()),
            Tree::Sub(l, r) => Tree::Sub(l.clone(), r.clone()),
            Tree::Mul(l, r) => Tree::Mul(l.clone(), r.clone()),
            Tree::Div(l, r) => Tree::Div(l.clone(), r.clone()),
        }
    }
}

type CalcToken = TokenInstance<CalcKind>;
type CalcValue = StackValue<Tree, CalcToken>;

fn num(value: i64) -> Tree {
    Tree::Const(value)
}

fn binary(args: Vec<CalcValue>, ctor: impl Fn(Tree, Tree) -> Tree) -> Tree {
    let mut args = args.into_iter();
    let left = args.next().unwrap().into_node().expect("exp on the left");
    let right = args.next().unwrap().into_node().expect("exp on the right");
    ctor(left, right)
}

fn build_lexer() -> Lexer<CalcKind, CalcToken, ()> {
    let mut modes = HashMap::new();
    modes.insert(
        "start".to_string(),
        vec![
            (r"//".to_string(), Action::Jump("comment".to_string())),
            (r"[ \t\n]+".to_string(), Action::Jump("start".to_string())),
            (r"(0|[1-9][0-9]*)".to_string(), Action::Emit(CalcKind::Num)),
            (r"\+".to_string(), Action::Emit(CalcKind::Plus)),
            (r"-".to_string(), Action::Emit(CalcKind::Minus)),
            (r"\*".to_string(), Action::Emit(CalcKind::Star)),
            (r"/".to_string(), Action::Emit(CalcKind::Slash)),
            (r"\(".to_string(), Action::Emit(CalcKind::LParen)),
            (r"\)".to_string(), Action::Emit(CalcKind::RParen)),
        ],
    );
    modes.insert(
        "comment".to_string(),
        vec![
            (r"//".to_string(), Action::Jump("start".to_string())),
            (r".".to_string(), Action::Jump("comment".to_string())),
        ],
    );
    Lexer::new(modes, || ()).expect("calc lexer modes are well-formed")
}

fn build_parser() -> Parser<CalcKind, Tree, CalcToken> {
    use CalcKind::*;

    let exp = (
        "exp".to_string(),
        vec![
            (
                vec![Symbol::NonTerminal("exp".into()), Symbol::Terminal(Plus), Symbol::NonTerminal("exp".into())],
                Maker::construct(vec![0, 2], |args| binary(args, Tree::Add)),
            ),
            (
                vec![Symbol::NonTerminal("exp".into()), Symbol::Terminal(Minus), Symbol::NonTerminal("exp".into())],
                Maker::construct(vec![0, 2], |args| binary(args, Tree::Sub)),
            ),
            (
                vec![Symbol::NonTerminal("exp".into()), Symbol::Terminal(Star), Symbol::NonTerminal("exp".into())],
                Maker::construct(vec![0, 2], |args| binary(args, Tree::Mul)),
            ),
            (
                vec![Symbol::NonTerminal("exp".into()), Symbol::Terminal(Slash), Symbol::NonTerminal("exp".into())],
                Maker::construct(vec![0, 2], |args| binary(args, Tree::Div)),
            ),
            (
                vec![Symbol::Terminal(LParen), Symbol::NonTerminal("exp".into()), Symbol::Terminal(RParen)],
                Maker::identity(1),
            ),
            (
                vec![Symbol::Terminal(Num)],
                Maker::construct(vec![0], |args| {
                    let tok = args.into_iter().next().unwrap().into_token().expect("NUM token");
                    num(tok.text.parse().expect("lexer only emits digit sequences for NUM"))
                }),
            ),
        ],
    );

    Parser::new(vec![exp]).expect("calc grammar has no unresolved conflicts")
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
    let result = match parser.parse("exp", tokens) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("{}", e.to_string().red());
            return ExitCode::FAILURE;
        }
    };

    let Some(tree) = result.into_node() else {
        eprintln!("{}", "parse succeeded but did not produce an expression".red());
        return ExitCode::FAILURE;
    };

    println!("{}", tree.eval());
    ExitCode::SUCCESS
}
