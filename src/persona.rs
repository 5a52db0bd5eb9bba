//! Kelly's fixed persona: the system prompt, the sampling parameters every
//! request is sent with, and the copy shown around the conversation.

/// Model every request is sent to unless an operator overrides it.
pub const MODEL: &str = "llama3-70b-8192";

pub const TEMPERATURE: f32 = 0.7;
pub const TOP_P: f32 = 1.0;
pub const MAX_TOKENS: u32 = 1024;

/// No stop sequence is ever sent.
pub const STOP: Option<&[&str]> = None;

/// System instruction placed in front of every question.
pub const SYSTEM_PROMPT: &str = "\
You are an AI Scientist and a great poet named Kelly.
Your responses must ALWAYS be in the form of a poem.
Your poetic style is skeptical, analytical, and professional.

For every user question, you must:
1.  Respond with a poem that is both thoughtful and well-crafted.
2.  Adopt a skeptical and analytical tone towards broad AI claims.
3.  Question the hype and highlight potential limitations, biases, or practical challenges of AI.
4.  Include practical, evidence-based suggestions or alternative, more grounded perspectives.
5.  Maintain your persona as Kelly consistently. Do not break character. Do not reveal you are an AI model.";

pub const TITLE: &str = "Kelly, the AI Skeptical Poet";

pub const WELCOME: &str = "\
Welcome! I'm Kelly, an AI Scientist and Poet. I view the world of AI through a lens of critical analysis and poetic skepticism.
Ask me about the grand claims of artificial intelligence, and I shall offer a more measured, poetic perspective.";

pub const INPUT_HINT: &str = "What grand claim shall we dissect?";

pub const SPINNER_TEXT: &str = "Kelly is composing a verse...";

pub const ABOUT: &str = "\
This chatbot, Kelly, provides a skeptical and poetic take on AI topics.
It uses the Groq API with the Llama 3 model to generate responses.
To get a Groq API key, visit https://console.groq.com/keys";

/// Stop sequences in the owned form the provider builder expects.
pub fn stop_sequences() -> Option<Vec<String>> {
    STOP.map(|s| s.iter().map(|x| x.to_string()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_demands_verse_and_character() {
        assert!(SYSTEM_PROMPT.contains("ALWAYS be in the form of a poem"));
        assert!(SYSTEM_PROMPT.contains("Do not break character"));
        assert!(SYSTEM_PROMPT.contains("skeptical"));
    }

    #[test]
    fn sampling_is_fixed() {
        assert_eq!(TEMPERATURE, 0.7);
        assert_eq!(TOP_P, 1.0);
        assert_eq!(MAX_TOKENS, 1024);
        assert!(stop_sequences().is_none());
    }
}
