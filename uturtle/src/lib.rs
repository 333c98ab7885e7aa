// turtlestage/uturtle/src/lib.rs
//
// Copyright © 2019 The Pathfinder Project Developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The turtle command language: AST and LALRPOP parser.

#[macro_use]
extern crate lalrpop_util;

pub mod ast;

lalrpop_mod!(#[allow(clippy::all, unused_parens)] pub turtle); // synthesized by LALRPOP

use lalrpop_util::ParseError;

pub type Parser = turtle::TopLevelParser;

#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    #[error("syntax error: {0}")]
    Syntax(ParseError<usize, String, &'static str>),
}

/// Parses a whole program into a command list.
pub fn parse(source: &str) -> Result<ast::Turtle, ProgramError> {
    Parser::new()
        .parse(source)
        .map_err(|err| ProgramError::Syntax(err.map_token(|token| token.to_string())))
}

#[test]
fn turtle_command_parser() {
    assert!(turtle::CommandParser::new().parse("penup").is_ok());
    assert!(turtle::CommandParser::new().parse("pendown").is_ok());
    assert!(turtle::CommandParser::new().parse("turnleft").is_ok());
    assert!(turtle::CommandParser::new().parse("turnleft 22.7").is_ok());
    assert!(turtle::CommandParser::new().parse("turnright").is_ok());
    assert!(turtle::CommandParser::new().parse("turnright 12.3").is_ok());
    assert!(turtle::CommandParser::new().parse("pushloc").is_ok());
    assert!(turtle::CommandParser::new().parse("poploc").is_ok());
    assert!(turtle::CommandParser::new().parse("pushrot").is_ok());
    assert!(turtle::CommandParser::new().parse("poprot").is_ok());
    assert!(turtle::CommandParser::new().parse("go 1 3").is_ok());
    assert!(turtle::CommandParser::new().parse("gox 5.3").is_ok());
    assert!(turtle::CommandParser::new().parse("goy 44.2").is_ok());
    assert!(turtle::CommandParser::new().parse("moveto 10 -20 45").is_ok());
    assert!(turtle::CommandParser::new().parse("penwidth 2").is_ok());
    assert!(turtle::CommandParser::new()
        .parse("pencolor 255,128 ,    128")
        .is_ok());
    assert!(turtle::CommandParser::new().parse("print \"hello world\"").is_ok());
    assert!(turtle::CommandParser::new().parse("speed fastest").is_ok());
    assert!(turtle::CommandParser::new().parse("hideturtle").is_ok());

    assert!(turtle::CommandParser::new().parse("bleh").is_err());
    assert!(turtle::CommandParser::new().parse("penup pendown").is_err());
    assert!(turtle::CommandParser::new().parse("pushloc 22").is_err());
    assert!(turtle::CommandParser::new()
        .parse("pencolor 255,128")
        .is_err());
    assert!(turtle::CommandParser::new().parse("speed warp").is_err());
}

#[test]
fn turtle_program_parser() {
    assert!(turtle::TopLevelParser::new()
        .parse("turnright turnright 12.3 turnleft")
        .is_ok());
}

#[test]
fn turn_direction_and_defaults() {
    use crate::ast::Command;

    let program = parse("turnleft turnright 30 backward 5 write \"ab\"").unwrap();
    assert_eq!(
        program,
        vec![
            Command::Turn(-90.0),
            Command::Turn(30.0),
            Command::Move(-5.0),
            Command::Print("ab".to_string(), true),
        ]
    );
}

#[test]
fn syntax_error_is_reported() {
    let err = parse("forward").unwrap_err();
    assert!(err.to_string().starts_with("syntax error"));
}

#[test]
fn commands_decode_from_json_messages() {
    use crate::ast::{Command, Speed};

    let program: ast::Turtle = serde_json::from_str(
        r#"[{"move": 50}, "pen_up", {"speed": "fastest"}, {"print": ["hi", false]}]"#,
    )
    .unwrap();
    assert_eq!(
        program,
        vec![
            Command::Move(50.0),
            Command::PenUp,
            Command::Speed(Speed::Fastest),
            Command::Print("hi".to_string(), false),
        ]
    );
}
