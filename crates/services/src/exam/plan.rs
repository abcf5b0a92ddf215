use std::time::Duration;

use exam_core::Shuffler;
use exam_core::model::{Question, Subject, SubjectError};

/// How many questions one subject contributes to a mock exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockQuota {
    pub subject: Subject,
    pub count: usize,
}

/// Composition and time limit of a mock exam.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockExamConfig {
    quotas: Vec<MockQuota>,
    duration: Duration,
}

impl MockExamConfig {
    /// 180 minutes.
    pub const STANDARD_DURATION: Duration = Duration::from_secs(10_800);

    #[must_use]
    pub fn new(quotas: Vec<MockQuota>, duration: Duration) -> Self {
        Self { quotas, duration }
    }

    /// Build from `(subject, count)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError` if any subject key is blank.
    pub fn from_pairs(pairs: &[(&str, usize)], duration: Duration) -> Result<Self, SubjectError> {
        let quotas = pairs
            .iter()
            .map(|&(subject, count)| -> Result<MockQuota, SubjectError> {
                Ok(MockQuota {
                    subject: Subject::new(subject)?,
                    count,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(quotas, duration))
    }

    /// physics 50, chemistry 50, botany 40, zoology 40, mat 20; 180 minutes.
    #[must_use]
    pub fn standard() -> Self {
        let table = [
            (Subject::PHYSICS, 50),
            (Subject::CHEMISTRY, 50),
            (Subject::BOTANY, 40),
            (Subject::ZOOLOGY, 40),
            (Subject::MAT, 20),
        ];
        let quotas = table
            .into_iter()
            .filter_map(|(subject, count)| {
                Subject::new(subject)
                    .ok()
                    .map(|subject| MockQuota { subject, count })
            })
            .collect();
        Self::new(quotas, Self::STANDARD_DURATION)
    }

    #[must_use]
    pub fn quotas(&self) -> &[MockQuota] {
        &self.quotas
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Upper bound on the exam length; subjects with short pools contribute less.
    #[must_use]
    pub fn max_questions(&self) -> usize {
        self.quotas.iter().map(|q| q.count).sum()
    }
}

impl Default for MockExamConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Questions selected for an exam, in the order they will be asked.
#[derive(Debug, Clone, PartialEq)]
pub struct ExamPlan {
    pub subject: Subject,
    pub questions: Vec<Question>,
    /// Questions taken from each subject.
    pub per_subject: Vec<(Subject, usize)>,
    pub time_limit: Option<Duration>,
}

impl ExamPlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Selects and orders questions for practice and mock exams.
pub struct PlanBuilder<'a> {
    shuffler: &'a mut Shuffler,
    shuffle_options: bool,
}

impl<'a> PlanBuilder<'a> {
    #[must_use]
    pub fn new(shuffler: &'a mut Shuffler) -> Self {
        Self {
            shuffler,
            shuffle_options: false,
        }
    }

    /// Also randomize option order within each question.
    #[must_use]
    pub fn with_shuffle_options(mut self, shuffle: bool) -> Self {
        self.shuffle_options = shuffle;
        self
    }

    /// Single-subject practice: untimed, `count` questions or the whole pool.
    pub fn practice(self, subject: Subject, pool: &[Question], count: Option<usize>) -> ExamPlan {
        let picked = match count {
            Some(k) => self.shuffler.sample(pool, k),
            None => self.shuffler.shuffle(pool),
        };
        let per_subject = vec![(subject.clone(), picked.len())];
        let questions = self.finish_questions(picked);

        ExamPlan {
            subject,
            questions,
            per_subject,
            time_limit: None,
        }
    }

    /// Mock exam: each quota sampled from its pool, then the union shuffled.
    pub fn mock(self, pools: Vec<(MockQuota, Vec<Question>)>, time_limit: Duration) -> ExamPlan {
        let mut union = Vec::new();
        let mut per_subject = Vec::with_capacity(pools.len());
        for (quota, pool) in pools {
            let picked = self.shuffler.sample(&pool, quota.count);
            per_subject.push((quota.subject, picked.len()));
            union.extend(picked);
        }
        let ordered = self.shuffler.shuffle(&union);
        let questions = self.finish_questions(ordered);

        ExamPlan {
            subject: Subject::mock(),
            questions,
            per_subject,
            time_limit: Some(time_limit),
        }
    }

    fn finish_questions(self, questions: Vec<Question>) -> Vec<Question> {
        if !self.shuffle_options {
            return questions;
        }
        let shuffler = self.shuffler;
        questions
            .into_iter()
            .map(|q| q.with_shuffled_options(&mut *shuffler))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(prefix: &str, n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question::new(format!("{prefix}{i}"), ["a", "b", "c"], "a").unwrap())
            .collect()
    }

    fn subject(key: &str) -> Subject {
        Subject::new(key).unwrap()
    }

    #[test]
    fn standard_config_matches_the_full_exam() {
        let config = MockExamConfig::default();
        let table: Vec<_> = config
            .quotas()
            .iter()
            .map(|q| (q.subject.as_str(), q.count))
            .collect();
        assert_eq!(
            table,
            vec![
                ("physics", 50),
                ("chemistry", 50),
                ("botany", 40),
                ("zoology", 40),
                ("mat", 20)
            ]
        );
        assert_eq!(config.max_questions(), 200);
        assert_eq!(config.duration(), Duration::from_secs(10_800));
    }

    #[test]
    fn practice_uses_whole_pool_or_count() {
        let questions = pool("p", 6);
        let mut shuffler = Shuffler::seeded(3);

        let all = PlanBuilder::new(&mut shuffler).practice(subject("physics"), &questions, None);
        assert_eq!(all.total(), 6);
        assert!(all.time_limit.is_none());

        let some =
            PlanBuilder::new(&mut shuffler).practice(subject("physics"), &questions, Some(4));
        assert_eq!(some.total(), 4);
        assert_eq!(some.per_subject, vec![(subject("physics"), 4)]);

        let more =
            PlanBuilder::new(&mut shuffler).practice(subject("physics"), &questions, Some(60));
        assert_eq!(more.total(), 6);
    }

    #[test]
    fn mock_respects_quotas_and_short_pools() {
        let mut shuffler = Shuffler::seeded(11);
        let pools = vec![
            (MockQuota { subject: subject("physics"), count: 3 }, pool("p", 10)),
            (MockQuota { subject: subject("mat"), count: 5 }, pool("m", 2)),
        ];

        let plan = PlanBuilder::new(&mut shuffler).mock(pools, Duration::from_secs(60));

        assert_eq!(plan.subject.as_str(), Subject::MOCK);
        assert_eq!(plan.total(), 5);
        assert_eq!(
            plan.per_subject,
            vec![(subject("physics"), 3), (subject("mat"), 2)]
        );
        assert_eq!(plan.time_limit, Some(Duration::from_secs(60)));
        let physics = plan
            .questions
            .iter()
            .filter(|q| q.text().starts_with('p'))
            .count();
        assert_eq!(physics, 3);
    }

    #[test]
    fn option_shuffle_keeps_answers() {
        let mut shuffler = Shuffler::seeded(5);
        let plan = PlanBuilder::new(&mut shuffler)
            .with_shuffle_options(true)
            .practice(subject("botany"), &pool("b", 8), None);

        for q in &plan.questions {
            assert_eq!(q.correct_answer(), "a");
            assert!(q.has_valid_answer());
            assert_eq!(q.options().len(), 3);
        }
    }
}
