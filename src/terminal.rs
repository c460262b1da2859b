//! Line-oriented front-ends for the quiz and the drill.
//!
//! Both read answers from any `BufRead` and write to any `Write`, so the
//! binary wires them to stdin/stdout and tests feed them scripted input.

use crate::drill::{ArabicDrill, DrillFeedback};
use crate::error::SessionError;
use crate::session::{CompletionOutcome, SessionController, SessionState};
use std::io::{self, BufRead, Write};

const QUIT: &str = ":q";
const RETRY: &str = ":r";
const SKIP: &str = ":n";

/// Which quiz the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizRequest {
    Standard,
    ErrorsOnly,
    Level(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizSummary {
    pub answered: usize,
    pub correct: usize,
    pub completed: bool,
}

/// `None` on end of input.
fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

pub async fn run_quiz<R: BufRead, W: Write>(
    controller: &mut SessionController,
    request: QuizRequest,
    input: &mut R,
    out: &mut W,
) -> io::Result<QuizSummary> {
    let mut summary = QuizSummary::default();

    let started = match &request {
        QuizRequest::Standard => controller.start(crate::session::QuizMode::Standard).await,
        QuizRequest::ErrorsOnly => controller.start(crate::session::QuizMode::ErrorsOnly).await,
        QuizRequest::Level(name) => controller.start_level(name).await,
    };
    match started {
        Ok(_) => {}
        Err(SessionError::NoWords) => {
            writeln!(out, "No words yet. Add some with `arabic-vocab add`.")?;
            return Ok(summary);
        }
        Err(SessionError::EmptyLevel) => {
            writeln!(out, "None of this level's words exist any more.")?;
            return Ok(summary);
        }
        Err(SessionError::Store(e)) => {
            writeln!(out, "{}", e.user_message())?;
            return Ok(summary);
        }
        Err(e) => {
            writeln!(out, "{e}")?;
            return Ok(summary);
        }
    }

    writeln!(out, "Type the translation. {QUIT} returns home.")?;

    loop {
        match controller.state().clone() {
            SessionState::Idle => break,
            SessionState::Completed { outcome } => {
                match outcome {
                    CompletionOutcome::NoErrors => writeln!(out, "No mistakes to review.")?,
                    CompletionOutcome::PoolExhausted => {
                        writeln!(out, "Every word answered correctly. Well done!")?
                    }
                }
                summary.completed = true;
                break;
            }
            SessionState::AwaitingAnswer { .. } => {
                let prompt = controller.session().prompt().unwrap_or_default().to_string();
                write!(
                    out,
                    "[{} left] {}: ",
                    controller.session().pool().len(),
                    prompt
                )?;
                out.flush()?;

                let Some(line) = read_line(input)? else {
                    controller.go_home();
                    break;
                };
                if line == QUIT {
                    controller.go_home();
                    break;
                }

                match controller.submit_answer(&line).await {
                    Ok(feedback) => {
                        summary.answered += 1;
                        if feedback.correct() {
                            summary.correct += 1;
                            writeln!(out, "Correct!")?;
                        } else {
                            writeln!(out, "Wrong. Answer: {}", feedback.graded.expected)?;
                        }
                        if let Some(e) = &feedback.store_error {
                            writeln!(out, "{} ({RETRY} to retry saving)", e.user_message())?;
                        }
                        write!(out, "Enter for the next word, {QUIT} to stop: ")?;
                        out.flush()?;
                    }
                    Err(SessionError::EmptyAnswer) => continue,
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
            SessionState::ShowingResult { .. } => {
                let Some(line) = read_line(input)? else {
                    controller.go_home();
                    break;
                };
                if line == QUIT {
                    controller.go_home();
                    break;
                }
                if line == RETRY {
                    match controller.retry_stats().await {
                        Ok(()) => writeln!(out, "Saved.")?,
                        Err(e) => writeln!(out, "{}", e.user_message())?,
                    }
                    continue;
                }
                if let Err(e) = controller.next_question() {
                    writeln!(out, "{e}")?;
                    break;
                }
            }
        }
    }

    Ok(summary)
}

pub fn run_drill<R: BufRead, W: Write>(
    drill: &mut ArabicDrill,
    input: &mut R,
    out: &mut W,
) -> io::Result<()> {
    if drill.prompt().is_none() {
        writeln!(out, "No words available to drill.")?;
        return Ok(());
    }
    writeln!(out, "Type the English word. {SKIP} skips, {QUIT} quits.")?;

    loop {
        if drill.revealed() {
            write!(out, "Enter for a new word: ")?;
        } else {
            write!(out, "{}: ", drill.prompt().unwrap_or_default())?;
        }
        out.flush()?;

        let Some(line) = read_line(input)? else { break };
        if line == QUIT {
            break;
        }
        if line == SKIP || drill.revealed() {
            drill.next();
            continue;
        }

        match drill.submit(&line) {
            Some(DrillFeedback::Correct { answer }) => writeln!(out, "Correct! {answer}")?,
            Some(DrillFeedback::TryAgain) => writeln!(out, "Wrong, try again.")?,
            None => {}
        }
    }

    Ok(())
}
