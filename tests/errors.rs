//! Error-2: a zero-width mode-jump rule is legal, but input left
//! unreachable from the target mode still fails.

use std::collections::HashMap;

use parsegen::{Action, Lexer, TerminalKind, TokenInstance};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum Kind {
    Plus,
    Num,
}

impl TerminalKind for Kind {}

type Tok = TokenInstance<Kind>;

fn lexer() -> Lexer<Kind, Tok, ()> {
    let mut modes = HashMap::new();
    modes.insert(
        "start".to_string(),
        vec![
            (r"\+".to_string(), Action::Emit(Kind::Plus)),
            (String::new(), Action::Jump("digit".to_string())),
        ],
    );
    modes.insert("digit".to_string(), vec![(r"\d+".to_string(), Action::Emit(Kind::Num))]);
    Lexer::new(modes, || ()).unwrap()
}

#[test]
fn error_2_trailing_plus_unreachable_from_digit_mode() {
    let result: Result<Vec<Tok>, _> = lexer().lex("start", "+123+").collect();
    let err = result.unwrap_err();
    assert_eq!(err.offset, 4);
}

#[test]
fn error_2_zero_width_jump_still_lexes_the_digits() {
    let result: Result<Vec<Tok>, _> = lexer().lex("start", "+123").collect();
    let tokens = result.unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, Kind::Plus);
    assert_eq!(tokens[1].kind, Kind::Num);
}
