//! Choosing the letter a blank stands for, at the moment it is placed.

use std::io::{BufRead, Write};

use super::Letter;

/// Asks the player which letter a blank should be. `None` means the player gave up.
pub trait BlankResolver {
    fn resolve_blank(&mut self) -> Option<Letter>;
}

impl<F: FnMut() -> Option<Letter>> BlankResolver for F {
    fn resolve_blank(&mut self) -> Option<Letter> {
        self()
    }
}

/// One letter, either case, surrounding whitespace ignored
pub fn parse_blank_letter(input: &str) -> Option<Letter> {
    let mut chars = input.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Letter::new(c),
        _ => None,
    }
}

pub const BLANK_QUESTION: &str = "What letter should the blank tile be?";

/// Line based prompt, asks again until it gets a letter.
/// End of input or `cancel` abandons the placement.
pub struct PromptResolver<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptResolver<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> BlankResolver for PromptResolver<R, W> {
    fn resolve_blank(&mut self) -> Option<Letter> {
        let mut line = String::new();
        loop {
            if let Err(e) = write!(self.output, "{} ", BLANK_QUESTION).and_then(|_| self.output.flush()) {
                log::warn!("cannot write blank prompt: {}", e);
            }
            line.clear();
            match self.input.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => (),
                Err(e) => {
                    log::warn!("cannot read blank letter: {}", e);
                    return None
                },
            }
            if line.trim().eq_ignore_ascii_case("cancel") {
                return None
            }
            if let Some(letter) = parse_blank_letter(&line) {
                return Some(letter)
            }
            log::debug!("not a single letter: {:?}", line.trim());
        }
    }
}


#[test]
fn parses_single_letters() {
    let e = Letter::new('E');
    assert_eq!(parse_blank_letter("e"), e);
    assert_eq!(parse_blank_letter("  E \n"), e);
    assert_eq!(parse_blank_letter(""), None);
    assert_eq!(parse_blank_letter("ee"), None);
    assert_eq!(parse_blank_letter("3"), None);
    assert_eq!(parse_blank_letter("é"), None);
}

#[test]
fn prompt_asks_again_on_bad_input() {
    let input = &b"\nxy\n7\n q \n"[..];
    let mut output = Vec::new();
    let letter = PromptResolver::new(input, &mut output).resolve_blank();
    assert_eq!(letter, Letter::new('Q'));
    let asked = String::from_utf8(output).unwrap().matches(BLANK_QUESTION).count();
    assert_eq!(asked, 4);
}

#[test]
fn prompt_can_be_cancelled() {
    let mut output = Vec::new();
    assert_eq!(PromptResolver::new(&b"zz\ncancel\nq\n"[..], &mut output).resolve_blank(), None);
    assert_eq!(PromptResolver::new(&b""[..], &mut output).resolve_blank(), None);
}
