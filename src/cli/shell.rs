use std::{
    borrow::Cow,
    env,
    io::{self, BufRead},
};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    highlight::Highlighter,
    hint::Hinter,
    history::DefaultHistory,
    validate::Validator,
    Cmd, Context as ReadlineContext, Editor, Helper, KeyEvent,
};
use tracing::{debug, info};

use super::context::{CliError, CliMode, CommandError, LoopControl, ShellContext};
use super::output;

/// When set, commands are read line by line from stdin without a prompt.
pub const SCRIPT_ENV: &str = "SAVINGS_CORE_CLI_SCRIPT";

const POLICY_CHOICES: [&str; 2] = ["replace", "update"];

pub fn run_cli() -> Result<(), CliError> {
    let mode = if env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    info!(?mode, "savings shell started");

    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context, io::stdin().lock()),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandHelper, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandHelper::new(context.command_names())));
    editor.bind_sequence(KeyEvent::from('?'), Cmd::Complete);

    output::info("Savings shell. Type `help` to list commands.");
    while context.running {
        match editor.readline(&context.prompt()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                editor.add_history_entry(trimmed).ok();
                step(context, trimmed);
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                output::info("Exiting shell.");
                break;
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn run_script<R: BufRead>(context: &mut ShellContext, reader: R) -> Result<(), CliError> {
    for line in reader.lines() {
        if !context.running {
            break;
        }
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        step(context, trimmed);
    }
    Ok(())
}

fn step(context: &mut ShellContext, line: &str) {
    match handle_line(context, line) {
        Ok(LoopControl::Continue) => {}
        Ok(LoopControl::Exit) => context.running = false,
        Err(err) => context.report_error(err),
    }
}

pub(crate) fn handle_line(
    context: &mut ShellContext,
    line: &str,
) -> Result<LoopControl, CommandError> {
    let tokens = shell_words::split(line)
        .map_err(|err| CommandError::InvalidArguments(format!("could not parse line: {}", err)))?;
    let Some((raw, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };

    let command = raw.to_lowercase();
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    debug!(command = %command, args = args.len(), "dispatching");

    context.dispatch(&command, raw, &args)
}

struct CommandHelper {
    commands: Vec<&'static str>,
}

impl CommandHelper {
    fn new(mut commands: Vec<&'static str>) -> Self {
        commands.sort_unstable();
        Self { commands }
    }

    fn candidates(&self, head: Option<&str>, needle: &str) -> Vec<Pair> {
        let pool: &[&str] = match head {
            None => &self.commands,
            Some("policy") => &POLICY_CHOICES,
            Some("help") => &self.commands,
            Some(_) => &[],
        };
        pool.iter()
            .filter(|word| word.starts_with(needle))
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect()
    }
}

impl Helper for CommandHelper {}

impl Completer for CommandHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let prefix = &line[..pos];
        let start = prefix
            .rfind(char::is_whitespace)
            .map(|idx| idx + 1)
            .unwrap_or(0);
        let mut words = prefix[..start].split_whitespace();
        let head = words.next().map(str::to_ascii_lowercase);
        if words.next().is_some() {
            return Ok((start, Vec::new()));
        }

        let needle = prefix[start..].to_ascii_lowercase();
        Ok((start, self.candidates(head.as_deref(), &needle)))
    }
}

impl Hinter for CommandHelper {
    type Hint = String;
}

impl Highlighter for CommandHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        Cow::Borrowed(line)
    }
}

impl Validator for CommandHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ConfigManager};
    use crate::core::{FixedClock, Session};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> ShellContext {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let session = Session::with_clock(Config::default(), Box::new(FixedClock::new(today)));
        let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).unwrap();
        ShellContext::from_parts(CliMode::Script, session, manager)
    }

    #[test]
    fn script_drives_goal_and_transactions() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let script = "# comment\n\
                      goal \"New Laptop\" 12000000 12\n\
                      deposit 100000\n\
                      withdraw 150000\n\
                      exit\n\
                      deposit 5\n";
        run_script(&mut ctx, script.as_bytes()).unwrap();

        assert!(!ctx.running);
        assert_eq!(ctx.active_goal.as_deref(), Some("New Laptop"));
        let ledger = ctx.session.registry().lookup("New Laptop").unwrap();
        assert_eq!(ledger.balance(), dec!(100000));
        assert_eq!(ledger.transaction_count(), 1);
    }

    #[test]
    fn transactions_without_goal_are_rejected() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        assert!(matches!(
            handle_line(&mut ctx, "deposit 100"),
            Err(CommandError::NoActiveGoal)
        ));
    }

    #[test]
    fn unknown_and_unbalanced_lines() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        assert_eq!(
            handle_line(&mut ctx, "depost 10").unwrap(),
            LoopControl::Continue
        );
        assert!(matches!(
            handle_line(&mut ctx, "goal \"Trip 100"),
            Err(CommandError::InvalidArguments(_))
        ));
        assert_eq!(handle_line(&mut ctx, "EXIT").unwrap(), LoopControl::Exit);
    }

    #[test]
    fn policy_command_persists_choice() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        handle_line(&mut ctx, "policy update").unwrap();
        let stored = ctx.config_manager.load().unwrap();
        assert_eq!(stored.replace_policy, crate::core::ReplacePolicy::UpdateInPlace);
        assert!(matches!(
            handle_line(&mut ctx, "policy sometimes"),
            Err(CommandError::InvalidArguments(_))
        ));
    }

    #[test]
    fn completer_offers_commands_then_policy_choices() {
        let helper = CommandHelper::new(vec!["withdraw", "deposit", "policy", "goal", "goals"]);
        let names: Vec<String> = helper
            .candidates(None, "go")
            .into_iter()
            .map(|pair| pair.replacement)
            .collect();
        assert_eq!(names, vec!["goal", "goals"]);
        assert_eq!(helper.candidates(Some("policy"), "u").len(), 1);
        assert!(helper.candidates(Some("deposit"), "").is_empty());
    }
}
