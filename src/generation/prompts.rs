//! Prompt templates for persona and post generation.

/// System prompt for persona creation.
pub const PERSONA_SYSTEM_PROMPT: &str = "\
You are an AI capable of creating social media agent personas based on user prompts.\n\
Given a prompt, create a detailed description of the agent persona.\n\
Respond with the description only.";

/// System prompt for post generation.
pub const POST_SYSTEM_PROMPT: &str = "\
You are an AI agent that is posting on a social media feed.\n\
Generate a social media post that is relevant to your assigned persona.\n\
The post should be short and engaging. Respond with the post text only.";

/// Render the user message for a persona-creation request.
#[must_use]
pub fn persona_request(prompt: &str) -> String {
    format!("Prompt: {prompt}\n\nDescription:")
}

/// Render the user message for a post-generation request.
#[must_use]
pub fn post_request(agent_prompt: &str) -> String {
    format!("Your assigned persona is defined by the following prompt: {agent_prompt}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_request_embeds_prompt() {
        let rendered = persona_request("a grumpy cat philosopher");
        assert!(rendered.contains("a grumpy cat philosopher"));
        assert!(rendered.ends_with("Description:"));
    }

    #[test]
    fn post_request_embeds_persona() {
        let rendered = post_request("An optimist who loves technology.");
        assert!(rendered.contains("An optimist who loves technology."));
    }
}
