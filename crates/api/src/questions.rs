use rand::Rng;
use std::sync::Mutex;

pub const QUESTIONS: &[&str] = &[
    "Tell me about yourself and your background.",
    "What are your greatest strengths and weaknesses?",
    "Why are you interested in this position?",
    "Where do you see yourself in 5 years?",
    "Describe a challenging situation you faced and how you handled it.",
    "What is your greatest professional achievement?",
    "How do you handle stress and pressure?",
    "What are your salary expectations?",
    "Why should we hire you?",
    "Do you have any questions for us?",
    "How do you stay current with industry trends and developments?",
    "Describe a time when you had to work with a difficult team member. How did you handle it?",
    "What motivates you in your work?",
    "How do you prioritize your work when you have multiple deadlines?",
    "Tell me about a time you failed and what you learned from it.",
    "What is your preferred work environment and why?",
    "How do you handle constructive criticism?",
    "Describe your ideal manager and work environment.",
    "What are your career goals and how does this position align with them?",
    "How do you measure success in your work?",
    "Tell me about a time you had to make a difficult decision at work.",
    "How do you handle conflicts in the workplace?",
    "What skills do you think are most important for this role?",
    "How do you approach learning new technologies or skills?",
    "Describe a time when you had to adapt to a major change at work.",
    "What do you consider your biggest professional accomplishment?",
    "How do you ensure quality in your work?",
    "Tell me about a time you had to work under tight deadlines.",
    "What do you think sets you apart from other candidates?",
    "How do you handle work-life balance?",
];

/// Serves random interview questions, never repeating the previous pick.
/// The last-served index is explicit state owned here, not a module global.
pub struct QuestionBank {
    last: Mutex<Option<usize>>,
}

impl QuestionBank {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(None),
        }
    }

    pub fn next(&self) -> &'static str {
        let mut last = self.last.lock().unwrap();
        let mut rng = rand::thread_rng();

        let mut index = rng.gen_range(0..QUESTIONS.len());
        while Some(index) == *last {
            index = rng.gen_range(0..QUESTIONS.len());
        }

        *last = Some(index);
        QUESTIONS[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_never_repeats_the_previous_question() {
        let bank = QuestionBank::new();
        let mut previous = bank.next();

        for _ in 0..200 {
            let current = bank.next();
            assert_ne!(current, previous);
            previous = current;
        }
    }

    #[test]
    fn test_questions_come_from_the_bank() {
        let bank = QuestionBank::new();
        for _ in 0..20 {
            assert!(QUESTIONS.contains(&bank.next()));
        }
    }
}
