use abit_agent::messages;
use abit_core::{DialogState, DialogStep};
use anyhow::Result;
use console::Style;
use std::io::{self, BufRead, Write};

/// Terminal version of the `/recommend` dialog. Ends on EOF or `/cancel`.
pub fn handle_recommend() -> Result<()> {
    let prompt = Style::new().bold().green();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let mut state = DialogState::start();
    println!("{}", messages::RECOMMEND_START_MESSAGE);

    loop {
        print!("{} ", prompt.apply_to(">"));
        io::stdout().flush()?;

        let Some(line) = lines.next().transpose()? else {
            return Ok(());
        };
        if line.trim() == "/cancel" {
            println!("{}", messages::RECOMMEND_CANCEL_MESSAGE);
            return Ok(());
        }

        match state.advance(&line) {
            DialogStep::Continue(next) => {
                let question = match &next {
                    DialogState::AwaitingInterests { .. } => messages::RECOMMEND_INTERESTS_MESSAGE,
                    DialogState::AwaitingCareer { .. } => messages::RECOMMEND_CAREER_MESSAGE,
                    DialogState::AwaitingBackground => messages::RECOMMEND_START_MESSAGE,
                };
                println!("{}", question);
                state = next;
            }
            DialogStep::Done {
                answers,
                recommendation,
            } => {
                println!("{}", messages::recommend_result(&answers, &recommendation));
                return Ok(());
            }
        }
    }
}
