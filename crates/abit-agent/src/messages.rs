//! Every user-facing string the service sends.

use abit_core::{DialogAnswers, Recommendation};

pub const START_MESSAGE: &str = "🤖 Привет! Я чат-бот для абитуриентов магистратур ИТМО по направлениям AI.\n\n\
Я могу ответить на вопросы о программах:\n\
🔹 'Искусственный интеллект'\n\
🔹 'AI и ML в технических системах'\n\n\
Просто задай мне вопрос!\n\n\
Хочешь узнать, какая программа тебе больше подходит? Напиши /recommend.";

pub const HELP_MESSAGE: &str = "Задай вопрос о программах 'Искусственный интеллект' или \
'AI и ML в технических системах' обычным сообщением.\n\n\
Команды:\n\
/recommend - подобрать программу по трем вопросам\n\
/cancel - прервать подбор программы\n\
/help - эта подсказка";

pub const UNKNOWN_COMMAND_MESSAGE: &str =
    "Я не знаю такой команды. Напиши /help, чтобы увидеть список команд.";

pub const RECOMMEND_START_MESSAGE: &str = "Давай подберу тебе подходящую программу! \
Пожалуйста, ответь на несколько вопросов.\n\n\
1️⃣ Какой у тебя бэкграунд? (например, программирование, математика, физика, экономика)";

pub const RECOMMEND_INTERESTS_MESSAGE: &str = "2️⃣ Какие области ИИ тебе интересны больше всего? \
(например, Computer Vision, NLP, Reinforcement Learning, Data Engineering, AI Product)";

pub const RECOMMEND_CAREER_MESSAGE: &str = "3️⃣ Какую карьеру ты хочешь построить? \
(например, ML Engineer, Data Scientist, AI Product Manager, Data Analyst)";

pub const RECOMMEND_CANCEL_MESSAGE: &str =
    "Рекомендация отменена. Можешь задать любой вопрос о программах.";

pub const NOTHING_TO_CANCEL_MESSAGE: &str =
    "Сейчас нечего отменять. Задай вопрос о программах или напиши /recommend.";

pub const NO_KNOWLEDGE_MESSAGE: &str = "К сожалению, я не нашел информации по этому вопросу. \
Я отвечаю на вопросы о программах 'Искусственный интеллект' и \
'AI и ML в технических системах'. Попробуй переформулировать вопрос.";

pub const EXTRACTIVE_HEADER: &str = "Вот что я нашел по твоему вопросу:";

pub const NO_LLM_MESSAGE: &str = "Бот настроен, но API-ключ для генерации ответов (OpenAI) не найден.\n\
Пожалуйста, укажите OPENAI_API_KEY в файле .env для полноценной работы.\n\
В качестве альтернативы включите режим answer.mode = extractive.";

pub const NOT_READY_MESSAGE: &str = "Извините, бот еще не готов. Попробуйте позже.";

pub const LLM_API_ERROR_MESSAGE: &str = "К сожалению, возникла ошибка при обращении к сервису \
генерации ответов. Попробуйте задать вопрос позже.";

pub const LLM_AUTH_ERROR_MESSAGE: &str =
    "Ошибка аутентификации с API генерации ответов. Обратитесь к администратору бота.";

pub const LLM_RATE_LIMIT_MESSAGE: &str = "Превышен лимит запросов к сервису генерации ответов. \
Попробуйте задать вопрос через несколько минут.";

pub const BUSY_MESSAGE: &str =
    "Я еще отвечаю на твои предыдущие сообщения. Подожди немного и повтори вопрос.";

pub const UNEXPECTED_ERROR_MESSAGE: &str = "Произошла непредвиденная ошибка. Попробуйте позже.";

pub fn recommend_result(answers: &DialogAnswers, recommendation: &Recommendation) -> String {
    format!(
        "На основе твоих ответов:\n\
         - Бэкграунд: {}\n\
         - Интересы: {}\n\
         - Карьерная цель: {}\n\n\
         📊 Рекомендация: «{}»\n\
         📌 Причина: {}\n\n\
         Теперь ты можешь задать мне вопросы об этой программе!",
        answers.background,
        answers.interests,
        answers.career,
        recommendation.program.title(),
        recommendation.reason
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use abit_core::classify;

    #[test]
    fn test_recommend_result_lists_answers() {
        let answers = DialogAnswers {
            background: "экономика".to_string(),
            interests: "AI Product".to_string(),
            career: "Product Manager".to_string(),
        };
        let rec = classify(&answers.background, &answers.interests, &answers.career);
        let text = recommend_result(&answers, &rec);
        assert!(text.contains("- Бэкграунд: экономика\n"));
        assert!(text.contains("«AI и ML в технических системах»"));
        assert!(text.contains(rec.reason));
    }
}
