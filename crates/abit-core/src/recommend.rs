//! Keyword classifier behind the recommendation dialog.

use serde::{Deserialize, Serialize};

const ENGINEERING_KEYWORDS: &[&str] = &[
    "ml engineer",
    "data engineer",
    "data scientist",
    "computer vision",
    "nlp",
    "reinforcement learning",
    "машинное обучение",
    "глубокое обучение",
    "нейронные сети",
    "алгоритмы",
    "программирование",
    "математика",
    "статистика",
    " middle",
    "middle",
];

const PRODUCT_KEYWORDS: &[&str] = &[
    "product manager",
    "ai product",
    "product",
    "бизнес",
    "аналитик",
    "data analyst",
    "системный подход",
    "экономика",
    "менеджмент",
    "управление проектами",
    "developer",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Program {
    /// "Искусственный интеллект", the engineering track
    ArtificialIntelligence,
    /// "AI и ML в технических системах", the product track
    AiProduct,
}

impl Program {
    pub fn title(&self) -> &'static str {
        match self {
            Program::ArtificialIntelligence => "Искусственный интеллект",
            Program::AiProduct => "AI и ML в технических системах",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            Program::ArtificialIntelligence => "https://abit.itmo.ru/program/master/ai",
            Program::AiProduct => "https://abit.itmo.ru/program/master/ai_product",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub program: Program,
    pub reason: &'static str,
    pub engineering_score: usize,
    pub product_score: usize,
}

/// Score the three answers against both keyword lists.
///
/// Answers are lower-cased and joined by newlines so a keyword cannot match
/// across two answers. Each keyword counts once. Ties go to the engineering
/// program.
pub fn classify(background: &str, interests: &str, career: &str) -> Recommendation {
    let haystack = [background, interests, career]
        .iter()
        .map(|answer| answer.to_lowercase())
        .collect::<Vec<_>>()
        .join("\n");

    let engineering_score = score(&haystack, ENGINEERING_KEYWORDS);
    let product_score = score(&haystack, PRODUCT_KEYWORDS);

    let (program, reason) = if engineering_score > product_score {
        (
            Program::ArtificialIntelligence,
            "так как ты упомянул роли или области, связанные с разработкой и инженерией ИИ \
             (ML Engineer, Data Engineer, Computer Vision и т.д.).",
        )
    } else if product_score > engineering_score {
        (
            Program::AiProduct,
            "так как ты упомянул интерес к продуктам, бизнесу или анализу данных \
             (AI Product Manager, Data Analyst и т.д.).",
        )
    } else {
        (
            Program::ArtificialIntelligence,
            "так как эта программа имеет более широкий охват технических ролей в области ИИ.",
        )
    };

    tracing::debug!(engineering_score, product_score, ?program, "classified answers");

    Recommendation {
        program,
        reason,
        engineering_score,
        product_score,
    }
}

fn score(haystack: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| haystack.contains(*kw)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engineering_profile() {
        let rec = classify("программирование", "computer vision", "ML Engineer");
        assert_eq!(rec.program, Program::ArtificialIntelligence);
        assert_eq!(rec.engineering_score, 3);
        assert!(rec.reason.contains("инженерией"));
    }

    #[test]
    fn test_product_profile() {
        let rec = classify("", "product", "product manager");
        assert_eq!(rec.program, Program::AiProduct);
        assert!(rec.product_score > rec.engineering_score);
    }

    #[test]
    fn test_empty_answers_default_to_engineering() {
        let rec = classify("", "", "");
        assert_eq!(rec.program, Program::ArtificialIntelligence);
        assert_eq!((rec.engineering_score, rec.product_score), (0, 0));
        assert!(rec.reason.contains("более широкий охват"));
    }

    #[test]
    fn test_tie_defaults_to_engineering() {
        // one keyword each side
        let rec = classify("математика", "бизнес", "");
        assert_eq!(rec.engineering_score, 1);
        assert_eq!(rec.product_score, 1);
        assert_eq!(rec.program, Program::ArtificialIntelligence);
    }

    #[test]
    fn test_case_insensitive() {
        let rec = classify("ЭКОНОМИКА", "Менеджмент", "Data Analyst");
        assert_eq!(rec.program, Program::AiProduct);
    }

    #[test]
    fn test_program_titles() {
        assert_eq!(Program::ArtificialIntelligence.title(), "Искусственный интеллект");
        assert!(Program::AiProduct.url().ends_with("ai_product"));
    }
}
