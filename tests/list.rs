//! End-to-end list-literal scenarios (List-1/2).

use std::collections::HashMap;

use parsegen::{Action, Lexer, Maker, Parser, StackValue, Symbol, TerminalKind, TokenInstance};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum Kind {
    Num,
    LBracket,
    RBracket,
    Comma,
}

impl TerminalKind for Kind {}

#[derive(Clone, Debug, Default)]
struct IntList {
    items: Vec<i64>,
}

type Tok = TokenInstance<Kind>;
type Val = StackValue<IntList, Tok>;

fn num_value(value: &Val) -> i64 {
    value.clone().into_token().unwrap().text.parse().unwrap()
}

fn lexer() -> Lexer<Kind, Tok, ()> {
    let mut modes = HashMap::new();
    modes.insert(
        "start".to_string(),
        vec![
            (r"[ \t\n]+".to_string(), Action::Jump("start".to_string())),
            (r"\[".to_string(), Action::Emit(Kind::LBracket)),
            (r"\]".to_string(), Action::Emit(Kind::RBracket)),
            (r",".to_string(), Action::Emit(Kind::Comma)),
            (r"-?\d+".to_string(), Action::Emit(Kind::Num)),
        ],
    );
    Lexer::new(modes, || ()).unwrap()
}

fn parser() -> Parser<Kind, IntList, Tok> {
    use Kind::*;

    let list = (
        "list".to_string(),
        vec![(
            vec![Symbol::Terminal(LBracket), Symbol::NonTerminal("items".into()), Symbol::Terminal(RBracket)],
            Maker::identity(1),
        )],
    );

    let items = (
        "items".to_string(),
        vec![
            (
                vec![Symbol::Terminal(Num), Symbol::Terminal(Comma), Symbol::NonTerminal("items".into())],
                Maker::construct(vec![0, 2], |args| {
                    let head = num_value(&args[0]);
                    let mut tail = args[1].clone().into_node().unwrap().items;
                    tail.insert(0, head);
                    IntList { items: tail }
                }),
            ),
            (
                vec![Symbol::Terminal(Num)],
                Maker::construct(vec![0], |args| IntList { items: vec![num_value(&args[0])] }),
            ),
            (vec![], Maker::construct(vec![], |_| IntList::default())),
        ],
    );

    Parser::new(vec![list, items]).unwrap()
}

fn parse(src: &str) -> IntList {
    let tokens: Vec<Tok> = lexer().lex("start", src).collect::<Result<_, _>>().unwrap();
    parser().parse("list", tokens).unwrap().into_node().unwrap()
}

#[test]
fn list_1_empty_brackets() {
    assert!(parse("[]").items.is_empty());
}

#[test]
fn list_2_three_elements_sum_to_six() {
    let list = parse("[1, 2, 3]");
    assert_eq!(list.items, vec![1, 2, 3]);
    assert_eq!(list.items.iter().sum::<i64>(), 6);
}
