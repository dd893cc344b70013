//! Follow-up questions for the candidate, ordered by how much the answer
//! would sharpen the suggestions. Deterministic; no LLM involvement.

use serde::{Deserialize, Serialize};

use crate::analysis::patterns::count_metrics;
use crate::analysis::sections::SectionKind;
use crate::analysis::text::{contains_phrase, normalize};
use crate::models::document::Document;

pub const MAX_QUESTIONS: usize = 4;

/// Character lengths below which a section is treated as missing.
const MIN_SUMMARY_CHARS: usize = 50;
const MIN_SKILLS_CHARS: usize = 30;
const MIN_EXPERIENCE_CHARS: usize = 100;
/// Experience shorter than this reads as under-described.
const DETAILED_EXPERIENCE_CHARS: usize = 200;

const WEAK_PHRASES: &[&str] = &[
    "worked on",
    "responsible for",
    "involved in",
    "participated in",
    "helped with",
    "assisted with",
    "various projects",
    "daily tasks",
    "collaborated with team",
    "used programming languages",
];

const STRONG_PHRASES: &[&str] = &[
    "led",
    "developed",
    "implemented",
    "designed",
    "created",
    "built",
    "optimized",
    "improved",
    "achieved",
    "delivered",
    "launched",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionTopic {
    TargetRole,
    TargetIndustry,
    ProfessionalSummary,
    KeySkills,
    WorkExperience,
    ExperienceDetails,
    Achievements,
    CareerStage,
    CareerGoals,
    ApplicationContext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub topic: QuestionTopic,
    pub prompt: String,
}

impl Question {
    fn new(topic: QuestionTopic, prompt: impl Into<String>) -> Self {
        Self {
            topic,
            prompt: prompt.into(),
        }
    }
}

/// Up to [`MAX_QUESTIONS`] questions, in priority order: targeting, then
/// summary, skills, experience and metrics gaps, then career context when
/// few basics are missing.
pub fn follow_up_questions(
    document: &Document,
    target_role: Option<&str>,
    target_industry: Option<&str>,
) -> Vec<Question> {
    let role = target_role.map(str::trim).filter(|r| !r.is_empty());
    let industry = target_industry.map(str::trim).filter(|i| !i.is_empty());
    let mut questions = Vec::new();

    if role.is_none() {
        questions.push(Question::new(
            QuestionTopic::TargetRole,
            "What specific job role are you targeting? (e.g. 'Senior Software Engineer', 'Marketing Manager', 'Data Analyst')",
        ));
    }
    if industry.is_none() {
        let prompt = match role {
            Some(role) => format!(
                "For a {role} position, which industry interests you most? (e.g. technology, healthcare, finance, consulting)"
            ),
            None => "Which industry or sector are you focusing your job search on?".to_string(),
        };
        questions.push(Question::new(QuestionTopic::TargetIndustry, prompt));
    }

    if section_chars(document, SectionKind::Summary) < MIN_SUMMARY_CHARS {
        let prompt = match role {
            Some(role) => format!(
                "Can you describe your key strengths and what makes you an ideal {role} candidate in 2-3 sentences?"
            ),
            None => "What are your key strengths and career highlights that set you apart?".to_string(),
        };
        questions.push(Question::new(QuestionTopic::ProfessionalSummary, prompt));
    }

    if section_chars(document, SectionKind::Skills) < MIN_SKILLS_CHARS {
        let prompt = match role {
            Some(role) => format!(
                "What are your strongest technical skills and tools for {role} positions? List the 5-8 most relevant."
            ),
            None => "What are your core technical skills, tools or specialised competencies? List your top 5-8.".to_string(),
        };
        questions.push(Question::new(QuestionTopic::KeySkills, prompt));
    }

    let experience = document.text_of(SectionKind::Experience);
    match experience.as_deref() {
        Some(text) if text.chars().count() >= MIN_EXPERIENCE_CHARS => {
            if is_weakly_described(text) {
                questions.push(Question::new(
                    QuestionTopic::ExperienceDetails,
                    "Can you share specific results from your current or most recent role? (projects led, problems solved, improvements made)",
                ));
            }
        }
        _ => questions.push(Question::new(
            QuestionTopic::WorkExperience,
            "Can you tell me about your most relevant role and 2-3 key accomplishments or projects?",
        )),
    }

    if experience.as_deref().map_or(true, |text| count_metrics(text) == 0) {
        let prompt = if experience.is_some() {
            "Can you quantify any of your achievements? (e.g. 'increased efficiency by 30%', 'managed a $2M budget', 'led a team of 12')"
        } else {
            "Do you have measurable results you can share? Approximate numbers help (team size, budget, percentages, timeframes)."
        };
        questions.push(Question::new(QuestionTopic::Achievements, prompt));
    }

    if questions.len() <= 2 {
        match (role, industry) {
            (Some(_), Some(industry)) => questions.push(Question::new(
                QuestionTopic::CareerStage,
                format!(
                    "Are you looking to advance within {industry}, transition from another field, or return after a break?"
                ),
            )),
            _ => questions.push(Question::new(
                QuestionTopic::CareerGoals,
                "What is your main career objective right now? (advancing in your field, changing industries, moving into leadership)",
            )),
        }
    }

    if questions.len() <= 1 {
        questions.push(Question::new(
            QuestionTopic::ApplicationContext,
            "Are you applying to specific companies or types of roles?",
        ));
    }

    questions.truncate(MAX_QUESTIONS);
    questions
}

fn section_chars(document: &Document, kind: SectionKind) -> usize {
    document
        .text_of(kind)
        .map_or(0, |text| text.chars().count())
}

/// More weak phrases than strong ones, or too little text to judge.
fn is_weakly_described(text: &str) -> bool {
    let normalized = normalize(text);
    let weak = WEAK_PHRASES
        .iter()
        .filter(|p| contains_phrase(&normalized, p))
        .count();
    let strong = STRONG_PHRASES
        .iter()
        .filter(|p| contains_phrase(&normalized, p))
        .count();
    weak > strong || text.chars().count() < DETAILED_EXPERIENCE_CHARS
}
