use std::time::{Duration, Instant};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use rand::Rng;

use widget::{
    AnswerFeedback, PauseWidget, QuizProblemWidget, QuizProblemWidgetState, ResultWidget,
};

use crate::{
    event::{clear_and_match_event, match_event_within},
    session::{CompletedSession, SessionEngine},
    sink::{ResultSink, SinkOutcome},
    terminal::TerminalWrapper,
    QuestionType, VocabrError,
};

mod widget;

///How long scored feedback stays on screen before the next question. Any
///key skips it; quitting during the delay cancels the pending advance.
const REVEAL_DELAY: Duration = Duration::from_secs(2);

///Re-render cadence for the session clock while waiting on input.
const TIMER_TICK: Duration = Duration::from_millis(250);

enum UserInput {
    Answer(usize),
    Typed(char),
    Backspace,
    Submit,
    TogglePause,
    Resize,
    Quit,
}

struct Quit;

///A snapshot of the current question, owned so the render loop does not
///hold a borrow of the engine while feeding answers back into it.
struct QuestionView {
    number: usize,
    total: usize,
    prompt: String,
    part_of_speech: String,
    question_type: QuestionType,
    options: Option<Vec<String>>,
}

impl QuestionView {
    fn snapshot(engine: &mut SessionEngine<impl Rng>) -> Option<Self> {
        engine.current().map(|question| Self {
            number: question.number,
            total: question.total,
            prompt: question.prompt.to_owned(),
            part_of_speech: question.part_of_speech.to_owned(),
            question_type: question.question_type,
            options: question
                .options
                .map(|options| options.iter().map(|option| option.text.clone()).collect()),
        })
    }
}

///Runs a started session to completion (or abandonment), shows the result
///screen, and reports the sink outcome alongside the completed session.
///The sink is consulted after the summary is computed; its failures only
///ever affect the sync-status line.
pub fn run_quiz<R: Rng>(
    term: &mut TerminalWrapper,
    mut engine: SessionEngine<R>,
    sink: Option<&dyn ResultSink>,
) -> Result<(Option<CompletedSession>, Option<SinkOutcome>), VocabrError> {
    while let Some(view) = QuestionView::snapshot(&mut engine) {
        match ask_question(term, &mut engine, &view)? {
            Ok(()) => continue,
            Err(Quit) => return Ok((None, None)),
        }
    }

    let completed = engine
        .finish()
        .expect("Unable to finish session after queue exhaustion");

    let outcome = match sink {
        Some(sink) => {
            //Painted before the blocking submission so the user is never
            //staring at a stale question screen
            term.render_widget(ResultWidget::new(&completed.summary, "Syncing..."))?;
            Some(sink.submit(&completed))
        }
        None => None,
    };

    let sync_line = outcome
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_else(|| "Results kept locally".to_owned());

    loop {
        term.render_widget(ResultWidget::new(&completed.summary, &sync_line))?;

        match clear_and_match_event(match_result_input)? {
            UserInput::Resize => continue,
            _ => break,
        }
    }

    Ok((Some(completed), outcome))
}

fn ask_question<R: Rng>(
    term: &mut TerminalWrapper,
    engine: &mut SessionEngine<R>,
    view: &QuestionView,
) -> Result<Result<(), Quit>, VocabrError> {
    let widget_state = &mut QuizProblemWidgetState::default();
    let mut typed = String::new();

    let feedback = loop {
        term.render_stateful_widget(
            QuizProblemWidget::new(view, engine.progress(), engine.elapsed()).typed(&typed),
            widget_state,
        )?;

        let input = match_event_within(TIMER_TICK, |event| {
            match_question_input(event, view.question_type, widget_state)
        })?;

        match input {
            //Tick: just repaint the clock
            None => continue,
            Some(UserInput::Answer(index)) => {
                let options = view.options.as_ref().expect("Unable to read options");
                if index >= options.len() {
                    continue;
                }
                let verdict = engine
                    .submit_answer(&options[index])
                    .expect("Unable to submit choice answer");
                break AnswerFeedback {
                    chosen: Some(index),
                    correct: verdict.correct,
                    expected: verdict.expected,
                };
            }
            Some(UserInput::Typed(c)) => typed.push(c),
            Some(UserInput::Backspace) => {
                typed.pop();
            }
            Some(UserInput::Submit) => {
                let verdict = engine
                    .submit_answer(typed.trim())
                    .expect("Unable to submit typed answer");
                break AnswerFeedback {
                    chosen: None,
                    correct: verdict.correct,
                    expected: verdict.expected,
                };
            }
            Some(UserInput::TogglePause) => show_pause_screen(term, engine)?,
            Some(UserInput::Resize) => continue,
            Some(UserInput::Quit) => return Ok(Err(Quit)),
        }
    };

    //Reveal delay: keep the feedback on screen, advance on timeout or any
    //key, cancel the pending advance entirely if the user quits
    let deadline = Instant::now() + REVEAL_DELAY;
    loop {
        term.render_stateful_widget(
            QuizProblemWidget::new(view, engine.progress(), engine.elapsed())
                .typed(&typed)
                .answered(&feedback),
            widget_state,
        )?;

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }

        let input = match_event_within(remaining.min(TIMER_TICK), match_reveal_input)?;
        match input {
            None => continue,
            Some(UserInput::Resize) => continue,
            Some(UserInput::Quit) => return Ok(Err(Quit)),
            Some(_) => break,
        }
    }

    engine.advance();
    Ok(Ok(()))
}

fn show_pause_screen<R: Rng>(
    term: &mut TerminalWrapper,
    engine: &mut SessionEngine<R>,
) -> Result<(), VocabrError> {
    engine.pause();

    loop {
        term.render_widget(PauseWidget)?;
        match clear_and_match_event(match_pause_input)? {
            UserInput::Resize => continue,
            _ => break,
        }
    }

    engine.resume();
    Ok(())
}

fn match_question_input(
    event: Event,
    question_type: QuestionType,
    state: &QuizProblemWidgetState,
) -> Option<UserInput> {
    match event {
        Event::Key(KeyEvent {
            kind: KeyEventKind::Press,
            code,
            modifiers,
            ..
        }) => match question_type {
            QuestionType::MultipleChoice => match code {
                KeyCode::Char('1') => Some(UserInput::Answer(0)),
                KeyCode::Char('2') => Some(UserInput::Answer(1)),
                KeyCode::Char('3') => Some(UserInput::Answer(2)),
                KeyCode::Char('4') => Some(UserInput::Answer(3)),
                KeyCode::Char('p') => Some(UserInput::TogglePause),
                KeyCode::Esc | KeyCode::Char('q') => Some(UserInput::Quit),
                _ => None,
            },
            //Typing needs the whole printable range, so pause moves to
            //ctrl-p and quit to escape only
            QuestionType::FillIn => match code {
                KeyCode::Char('p') if modifiers.contains(crossterm::event::KeyModifiers::CONTROL) =>
                {
                    Some(UserInput::TogglePause)
                }
                KeyCode::Char(c) => Some(UserInput::Typed(c)),
                KeyCode::Backspace => Some(UserInput::Backspace),
                KeyCode::Enter => Some(UserInput::Submit),
                KeyCode::Esc => Some(UserInput::Quit),
                _ => None,
            },
        },
        Event::Resize(_, _) => Some(UserInput::Resize),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Up(_),
            column,
            row,
            ..
        }) if question_type == QuestionType::MultipleChoice => state
            .answer_areas
            .iter()
            .enumerate()
            .find(|(_, area)| area.contains((column, row).into()))
            .map(|(index, _)| UserInput::Answer(index)),
        _ => None,
    }
}

fn match_reveal_input(event: Event) -> Option<UserInput> {
    match event {
        Event::Key(KeyEvent {
            kind: KeyEventKind::Press,
            code,
            ..
        }) => match code {
            KeyCode::Esc | KeyCode::Char('q') => Some(UserInput::Quit),
            _ => Some(UserInput::Submit),
        },
        Event::Resize(_, _) => Some(UserInput::Resize),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Up(_),
            ..
        }) => Some(UserInput::Submit),
        _ => None,
    }
}

fn match_pause_input(event: Event) -> Option<UserInput> {
    match event {
        Event::Key(KeyEvent {
            kind: KeyEventKind::Press,
            code,
            ..
        }) => match code {
            KeyCode::Char('p') | KeyCode::Enter | KeyCode::Char(' ') => {
                Some(UserInput::TogglePause)
            }
            _ => None,
        },
        Event::Resize(_, _) => Some(UserInput::Resize),
        _ => None,
    }
}

fn match_result_input(event: Event) -> Option<UserInput> {
    match event {
        Event::Key(KeyEvent {
            kind: KeyEventKind::Press,
            code,
            ..
        }) => match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => Some(UserInput::Quit),
            _ => None,
        },
        Event::Resize(_, _) => Some(UserInput::Resize),
        _ => None,
    }
}
