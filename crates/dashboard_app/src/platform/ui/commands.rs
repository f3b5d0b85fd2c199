use std::path::PathBuf;

pub const HELP_TEXT: &str = "\
Commands:
  select <path>    choose a PDF or Markdown file to upload
  upload [path]    upload the chosen file (or select <path> first)
  query <text>     edit the question without submitting
  ask <text>       set the question and submit it
  submit           submit the current question
  models           list available generation models
  stats            refresh index statistics now
  show             print the full dashboard
  help             show this text
  quit             exit";

/// One line of user input, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserCommand {
    Select(PathBuf),
    Upload(Option<PathBuf>),
    Query(String),
    Ask(String),
    Submit,
    Models,
    Stats,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command `{0}`; type `help` for a list")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
}

/// Parse a line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<UserCommand>, ParseError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "select" | "file" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument("select"));
            }
            UserCommand::Select(PathBuf::from(rest))
        }
        "upload" => UserCommand::Upload((!rest.is_empty()).then(|| PathBuf::from(rest))),
        // Query text is kept verbatim, including an empty edit.
        "query" => UserCommand::Query(rest.to_string()),
        "ask" => {
            if rest.is_empty() {
                return Err(ParseError::MissingArgument("ask"));
            }
            UserCommand::Ask(rest.to_string())
        }
        "submit" => UserCommand::Submit,
        "models" => UserCommand::Models,
        "stats" => UserCommand::Stats,
        "show" => UserCommand::Show,
        "help" | "?" => UserCommand::Help,
        "quit" | "exit" => UserCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}
