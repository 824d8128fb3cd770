use multiply_core::{Operand, ViewModel};
use multiply_engine::SyncMode;

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Edit(Operand, String),
    Show,
    Quit,
    Help,
}

/// `a <text>` edits the multiplicand, `b <text>` the multiplier.
pub fn parse_line(line: &str) -> Input {
    let line = line.trim_end_matches(['\r', '\n']);
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    match command {
        "a" => Input::Edit(Operand::Multiplicand, rest.to_string()),
        "b" => Input::Edit(Operand::Multiplier, rest.to_string()),
        "show" => Input::Show,
        "quit" | "exit" => Input::Quit,
        _ => Input::Help,
    }
}

pub fn render(view: &ViewModel, mode: SyncMode) -> String {
    let mode = match mode {
        SyncMode::Bridged => "worker",
        SyncMode::Local => "local",
    };
    format!(
        "Multiply number 1: {}\nMultiply number 2: {}\n{}  [{}]",
        view.multiplicand,
        view.multiplier,
        view.result_text(),
        mode
    )
}

pub const HELP: &str = "commands: a <number>, b <number>, show, quit";

#[cfg(test)]
mod tests {
    use super::*;
    use multiply_core::CanonicalState;

    #[test]
    fn parses_edits_keeping_raw_text() {
        assert_eq!(
            parse_line("a  12 \n"),
            Input::Edit(Operand::Multiplicand, " 12 ".to_string())
        );
        assert_eq!(parse_line("b"), Input::Edit(Operand::Multiplier, String::new()));
        assert_eq!(parse_line("quit"), Input::Quit);
        assert_eq!(parse_line("c 1"), Input::Help);
    }

    #[test]
    fn renders_product_or_error() {
        let mut state = CanonicalState::new("6", "7", 42.0);
        assert_eq!(
            render(&ViewModel::from(state.clone()), SyncMode::Bridged),
            "Multiply number 1: 6\nMultiply number 2: 7\nResult: 42  [worker]"
        );

        state.error = Some("Please write two numbers".to_string());
        assert!(render(&ViewModel::from(state), SyncMode::Local)
            .ends_with("Please write two numbers  [local]"));
    }
}
