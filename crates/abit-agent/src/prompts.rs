use crate::retriever::RetrievedChunk;

pub const SYSTEM_PROMPT: &str = "Вы являетесь полезным помощником для абитуриентов, выбирающих \
магистерские программы ИТМО 'Искусственный интеллект' и 'AI и ML в технических системах'. \
Ваша задача - отвечать на вопросы абитуриентов на основе предоставленной информации. \
Информация будет содержаться в разделе 'Контекст'. \
Если в 'Контексте' нет информации для ответа на вопрос, вежливо сообщите, что не знаете ответа. \
Всегда отвечайте на русском языке. \
Не придумывайте факты, которых нет в контексте. \
Если вопрос не по теме программ ИТМО, вежливо укажите на это. \
Отвечайте приветливо и вежливо.";

const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// One provenance-tagged block per chunk, in retrieval order
pub fn format_context(retrieved: &[RetrievedChunk]) -> String {
    retrieved
        .iter()
        .map(|r| {
            format!(
                "Источник: {}\nРаздел: {}\nИнформация: {}",
                r.chunk.source, r.chunk.field, r.chunk.text
            )
        })
        .collect::<Vec<_>>()
        .join(CONTEXT_SEPARATOR)
}

pub fn user_prompt_with_context(question: &str, context: &str) -> String {
    format!(
        "Вопрос абитуриента: {}\n\n\
         Контекст:\n{}\n\n\
         Пожалуйста, ответьте на вопрос абитуриента, используя только информацию из контекста. \
         Если контекст не позволяет ответить, скажите, что информации недостаточно.",
        question, context
    )
}

pub fn user_prompt_without_context(question: &str) -> String {
    format!(
        "Вопрос абитуриента: {}\n\n\
         Контекст: Информация по данному вопросу в базе данных не найдена. \
         Пожалуйста, вежливо сообщите абитуриенту, что вы не можете ответить на этот вопрос, \
         так как он не относится к программам магистратуры ИТМО по ИИ. \
         Предложите задать вопросы о программах 'Искусственный интеллект' или \
         'AI и ML в технических системах'.",
        question
    )
}

/// The user turn for a grounded answer: retrieved context when there is
/// any, otherwise an explicit notice that nothing was found.
pub fn user_prompt(question: &str, retrieved: &[RetrievedChunk]) -> String {
    if retrieved.is_empty() {
        user_prompt_without_context(question)
    } else {
        user_prompt_with_context(question, &format_context(retrieved))
    }
}
