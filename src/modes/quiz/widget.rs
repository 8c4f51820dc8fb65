use std::time::Duration;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    symbols::border,
    widgets::{Block, Borders, Gauge, Paragraph, StatefulWidget, Widget, Wrap},
};

use crate::{distractor::OPTIONS_PER_QUESTION, session::SessionSummary, QuestionType};

use super::QuestionView;

const COLOR_CORRECT: Color = Color::Green;
const COLOR_INCORRECT: Color = Color::Red;

///What the user did with the current question, for the feedback render.
pub(super) struct AnswerFeedback {
    pub chosen: Option<usize>,
    pub correct: bool,
    pub expected: String,
}

pub(super) struct QuizProblemWidget<'a> {
    view: &'a QuestionView,
    progress: (usize, usize),
    elapsed: Duration,
    typed: &'a str,
    answered: Option<&'a AnswerFeedback>,
}

impl<'a> QuizProblemWidget<'a> {
    pub(super) fn new(view: &'a QuestionView, progress: (usize, usize), elapsed: Duration) -> Self {
        Self {
            view,
            progress,
            elapsed,
            typed: "",
            answered: None,
        }
    }

    pub(super) fn typed(mut self, typed: &'a str) -> Self {
        self.typed = typed;
        self
    }

    pub(super) fn answered(mut self, answered: &'a AnswerFeedback) -> Self {
        self.answered = Some(answered);
        self
    }
}

pub(super) struct QuizProblemWidgetState {
    pub(super) answer_areas: Vec<Rect>,
}

impl Default for QuizProblemWidgetState {
    fn default() -> Self {
        Self {
            answer_areas: [Rect::default()].repeat(OPTIONS_PER_QUESTION),
        }
    }
}

impl StatefulWidget for QuizProblemWidget<'_> {
    type State = QuizProblemWidgetState;

    fn render(
        self,
        area: ratatui::prelude::Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut Self::State,
    ) where
        Self: Sized,
    {
        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Min(1),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(2, 3),
                Constraint::Min(1),
            ],
        )
        .split(area);

        let (status_area, question_area, body_area, progress_area) =
            (layout[0], layout[1], layout[2], layout[3]);

        {
            let (number, total) = (self.view.number, self.view.total);
            let clock = format_clock(self.elapsed);
            Paragraph::new(format!("Question {number} / {total}    Time {clock}"))
                .centered()
                .render(status_area, buf);
        }

        let question = Paragraph::new(format!(
            "{}  [{}]",
            self.view.prompt, self.view.part_of_speech
        ))
        .wrap(Wrap { trim: false })
        .centered();

        match self.answered {
            None => question.render(question_area, buf),
            Some(feedback) => {
                let color = if feedback.correct {
                    COLOR_CORRECT
                } else {
                    COLOR_INCORRECT
                };
                question.fg(color).render(question_area, buf);
            }
        }

        match self.view.question_type {
            QuestionType::MultipleChoice => {
                self.render_options(body_area, buf, state);
            }
            QuestionType::FillIn => {
                self.render_typing_line(body_area, buf);
            }
        }

        {
            let (completed, total) = self.progress;
            let (ratio, percent) = if total == 0 {
                //NOTE: Starting at ratio 1.0 so that colors are "correct"
                (1.0, 0.0)
            } else {
                let ratio = completed as f64 / total as f64;
                (ratio, ratio * 100.0)
            };

            Gauge::default()
                .ratio(ratio)
                .label(format!("{percent:05.2}% ({completed}/{total})"))
                .gauge_style(Style::default().fg(COLOR_CORRECT).bg(COLOR_INCORRECT))
                .use_unicode(true)
                .render(progress_area, buf);
        }
    }
}

impl QuizProblemWidget<'_> {
    fn render_options(
        &self,
        area: Rect,
        buf: &mut ratatui::prelude::Buffer,
        state: &mut QuizProblemWidgetState,
    ) {
        let options = match self.view.options.as_ref() {
            Some(options) => options,
            None => return,
        };

        let (top, bottom) = {
            let layout = Layout::new(Direction::Vertical, [Constraint::Ratio(1, 2); 2]);
            let split = layout.split(area);
            (split[0], split[1])
        };
        let layout = Layout::new(Direction::Horizontal, [Constraint::Ratio(1, 2); 2]);
        let option_areas = [layout.split(top), layout.split(bottom)].concat();

        for (index, text) in options.iter().enumerate() {
            let option_area = option_areas[index];
            state.answer_areas[index] = option_area;

            let mut widget = OptionWidget::new(text.to_owned(), index);
            if let Some(feedback) = self.answered {
                let is_expected = text.to_lowercase() == feedback.expected.to_lowercase();
                let is_chosen = feedback.chosen == Some(index);
                widget = widget.answered((is_expected, is_chosen));
            }
            widget.render(option_area, buf);
        }
    }

    fn render_typing_line(&self, area: Rect, buf: &mut ratatui::prelude::Buffer) {
        let (input_area, feedback_area) = {
            let layout = Layout::new(
                Direction::Vertical,
                [Constraint::Length(3), Constraint::Min(1)],
            );
            let split = layout.split(area);
            (split[0], split[1])
        };

        Paragraph::new(format!("> {}", self.typed))
            .block(Block::bordered().border_set(border::DOUBLE))
            .render(input_area, buf);

        if let Some(feedback) = self.answered {
            let line = if feedback.correct {
                "Correct!".to_owned()
            } else {
                format!("Wrong! The answer is: {}", feedback.expected)
            };
            let color = if feedback.correct {
                COLOR_CORRECT
            } else {
                COLOR_INCORRECT
            };

            Paragraph::new(line)
                .centered()
                .fg(color)
                .render(feedback_area, buf);
        }
    }
}

struct OptionWidget {
    text: String,
    index: usize,
    outcome: Option<(bool, bool)>,
}

impl OptionWidget {
    fn new(text: String, index: usize) -> Self {
        Self {
            text,
            index,
            outcome: None,
        }
    }

    fn answered(mut self, outcome: (bool, bool)) -> Self {
        self.outcome = Some(outcome);
        self
    }
}

impl Widget for OptionWidget {
    fn render(self, area: Rect, buf: &mut ratatui::prelude::Buffer) {
        Paragraph::new(format!("{}: {}", self.index + 1, self.text))
            .wrap(Wrap { trim: false })
            .centered()
            .block(
                Block::bordered()
                    .borders(Borders::TOP)
                    .border_set(border::DOUBLE),
            )
            .fg(match self.outcome {
                None | Some((false, false)) => Color::default(),
                Some((is_expected, _)) => {
                    if is_expected {
                        COLOR_CORRECT
                    } else {
                        COLOR_INCORRECT
                    }
                }
            })
            .render(area, buf)
    }
}

pub(super) struct PauseWidget;

impl Widget for PauseWidget {
    fn render(self, area: Rect, buf: &mut ratatui::prelude::Buffer) {
        Paragraph::new("Paused - press p to continue")
            .centered()
            .block(Block::bordered().border_set(border::DOUBLE))
            .render(area, buf)
    }
}

pub(super) struct ResultWidget<'a> {
    summary: &'a SessionSummary,
    sync_line: &'a str,
}

impl<'a> ResultWidget<'a> {
    pub(super) fn new(summary: &'a SessionSummary, sync_line: &'a str) -> Self {
        Self { summary, sync_line }
    }
}

impl Widget for ResultWidget<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::prelude::Buffer) {
        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(5),
                Constraint::Min(3),
                Constraint::Length(2),
            ],
        )
        .split(area);

        let (header_area, mistakes_area, footer_area) = (layout[0], layout[1], layout[2]);

        let summary = self.summary;
        let minutes = summary.elapsed_seconds as u64 / 60;
        let seconds = summary.elapsed_seconds as u64 % 60;
        let header = format!(
            "Score: {} / {} ({}%)\nTime: {minutes}m {seconds}s\nQuestions: {} choice, {} fill-in",
            summary.correct_count,
            summary.total_questions,
            summary.score_percentage,
            summary.type_breakdown.multiple_choice,
            summary.type_breakdown.fill_in,
        );
        Paragraph::new(header)
            .centered()
            .block(Block::new().borders(Borders::BOTTOM))
            .render(header_area, buf);

        let mistakes = if summary.mistakes.is_empty() {
            "All correct, well done!".to_owned()
        } else {
            summary
                .mistakes
                .iter()
                .enumerate()
                .map(|(i, mistake)| {
                    let response = if mistake.response.is_empty() {
                        "(no answer)"
                    } else {
                        mistake.response.as_str()
                    };
                    format!(
                        "{}. {} [{}] {} - you answered: {}",
                        i + 1,
                        mistake.headword,
                        mistake.part_of_speech,
                        mistake.translation,
                        response,
                    )
                })
                .collect::<Vec<_>>()
                .join("\n")
        };
        Paragraph::new(mistakes)
            .wrap(Wrap { trim: false })
            .render(mistakes_area, buf);

        Paragraph::new(format!("{}\nPress q to exit", self.sync_line))
            .centered()
            .render(footer_area, buf);
    }
}

fn format_clock(elapsed: Duration) -> String {
    let total = elapsed.as_secs();
    format!("{:02}:{:02}", total / 60, total % 60)
}
