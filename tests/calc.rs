//! End-to-end calculator scenarios (Calc-1/2/3 and Error-1).

use std::collections::HashMap;

use parsegen::{Action, Associativity, Lexer, Maker, Parser, StackValue, Symbol, TerminalKind, TokenInstance};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum Kind {
    Num,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl TerminalKind for Kind {
    fn precedence(&self) -> i32 {
        match self {
            Kind::Star | Kind::Slash => 1,
            _ => 0,
        }
    }

    fn associativity(&self) -> Associativity {
        Associativity::Left
    }
}

#[derive(Debug, Clone)]
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

type Tok = TokenInstance<Kind>;
type Val = StackValue<Tree, Tok>;

fn binary(args: Vec<Val>, ctor: impl Fn(Tree, Tree) -> Tree) -> Tree {
    let mut it = args.into_iter();
    let left = it.next().unwrap().into_node().unwrap();
    let right = it.next().unwrap().into_node().unwrap();
    ctor(left, right)
}

fn lexer() -> Lexer<Kind, Tok, ()> {
    let mut modes = HashMap::new();
    modes.insert(
        "start".to_string(),
        vec![
            (r"[ \t\n]+".to_string(), Action::Jump("start".to_string())),
            (r"(0|[1-9][0-9]*)".to_string(), Action::Emit(Kind::Num)),
            (r"\+".to_string(), Action::Emit(Kind::Plus)),
            (r"-".to_string(), Action::Emit(Kind::Minus)),
            (r"\*".to_string(), Action::Emit(Kind::Star)),
            (r"/".to_string(), Action::Emit(Kind::Slash)),
            (r"\(".to_string(), Action::Emit(Kind::LParen)),
            (r"\)".to_string(), Action::Emit(Kind::RParen)),
        ],
    );
    Lexer::new(modes, || ()).unwrap()
}

fn parser() -> Parser<Kind, Tree, Tok> {
    use Kind::*;

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
                    let tok = args.into_iter().next().unwrap().into_token().unwrap();
                    Tree::Const(tok.text.parse().unwrap())
                }),
            ),
        ],
    );

    Parser::new(vec![exp]).unwrap()
}

fn eval(src: &str) -> i64 {
    let tokens: Vec<Tok> = lexer().lex("start", src).collect::<Result<_, _>>().unwrap();
    let tree = parser().parse("exp", tokens).unwrap().into_node().unwrap();
    tree.eval()
}

#[test]
fn calc_1_left_associates_mixed_precedence() {
    assert_eq!(eval("1+2*3"), 7);
}

#[test]
fn calc_2_parens_override_precedence() {
    assert_eq!(eval("(1+2)*3"), 9);
}

#[test]
fn calc_3_division_left_associates() {
    assert_eq!(eval("8/4/2"), 1);
}

#[test]
fn subtraction_left_associates_and_is_not_swallowed_by_num() {
    assert_eq!(eval("8-4-2"), 2);
}

#[test]
fn error_1_trailing_operator_is_a_parse_error() {
    let tokens: Vec<Tok> = lexer().lex("start", "1+").collect::<Result<_, _>>().unwrap();
    let err = parser().parse("exp", tokens).unwrap_err();
    match err {
        parsegen::ParseError::UnexpectedSymbol { .. } => {}
        other => panic!("expected an unexpected-symbol error, got {other:?}"),
    }
}
