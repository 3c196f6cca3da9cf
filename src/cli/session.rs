use crate::domain::PreferenceKey;

/// One line of input in an interactive reading session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    Open(usize),
    Reload,
    Set(PreferenceKey, String),
    Quit,
    Invalid(String),
}

impl SessionInput {
    pub fn parse(line: &str) -> Self {
        let input = line.trim();

        if input.eq_ignore_ascii_case("q") {
            return SessionInput::Quit;
        }

        if input.eq_ignore_ascii_case("r") {
            return SessionInput::Reload;
        }

        if let Some(rest) = input.strip_prefix("set ") {
            let rest = rest.trim_start();
            let (key, value) = rest.split_once(' ').unwrap_or((rest, ""));
            return match key.parse::<PreferenceKey>() {
                Ok(key) => SessionInput::Set(key, value.to_string()),
                Err(e) => SessionInput::Invalid(e.to_string()),
            };
        }

        match input.parse::<usize>() {
            Ok(number) => SessionInput::Open(number),
            Err(_) => SessionInput::Invalid(format!("Unrecognised input: {}", input)),
        }
    }
}
