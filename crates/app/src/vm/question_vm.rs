use exam_core::model::Question;
use services::{ExamCommand, QuestionView};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub letter: char,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionVm {
    /// `Question 3 of 10`
    pub header: String,
    pub score_str: String,
    pub prompt: String,
    pub options: Vec<OptionVm>,
}

impl From<&QuestionView<'_>> for QuestionVm {
    fn from(view: &QuestionView<'_>) -> Self {
        Self {
            header: format!("Question {} of {}", view.index + 1, view.total),
            score_str: format!("Score: {:.2}", view.score),
            prompt: view.question.text().to_owned(),
            options: map_options(view.question),
        }
    }
}

impl QuestionVm {
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("{}    {}", self.header, self.score_str),
            self.prompt.clone(),
        ];
        lines.extend(
            self.options
                .iter()
                .map(|option| format!("  {}) {}", option.letter, option.text)),
        );
        lines
    }
}

fn map_options(question: &Question) -> Vec<OptionVm> {
    question
        .options()
        .iter()
        .enumerate()
        .filter_map(|(index, text)| {
            option_letter(index).map(|letter| OptionVm {
                letter,
                text: text.clone(),
            })
        })
        .collect()
}

/// `A` for the first option, up to `Z`.
#[must_use]
pub fn option_letter(index: usize) -> Option<char> {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| char::from(b'A' + i))
}

/// Interpret a line typed while `options` are shown.
///
/// Option text wins over a letter, so an option literally named `B` can
/// still be picked by typing it. Text is matched exactly first, then ignoring
/// case. Returns `None` for input that means nothing here.
#[must_use]
pub fn parse_command(raw: &str, options: &[String]) -> Option<ExamCommand> {
    let input = raw.trim();
    if input.is_empty() {
        return None;
    }

    let exact = options.iter().find(|option| option.trim() == input);
    if let Some(option) = exact.or_else(|| {
        options
            .iter()
            .find(|option| option.trim().eq_ignore_ascii_case(input))
    }) {
        return Some(ExamCommand::Answer(option.clone()));
    }

    if input.eq_ignore_ascii_case("q") || input.eq_ignore_ascii_case("quit") {
        return Some(ExamCommand::Cancel);
    }

    let mut chars = input.chars();
    let (Some(letter), None) = (chars.next(), chars.next()) else {
        return None;
    };
    let letter = letter.to_ascii_uppercase();
    if !letter.is_ascii_uppercase() {
        return None;
    }
    let index = usize::from(letter as u8 - b'A');
    options
        .get(index)
        .map(|option| ExamCommand::Answer(option.clone()))
}
