// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Answer prompt template

use super::memory::{ConversationTurn, TurnRole};

/// Template for the answer prompt
///
/// Placeholders: `{chat_history}`, `{articles}`, `{question}`.
pub const ANSWER_TEMPLATE: &str = "\
You are an intelligent and smart AI assistant. Use the article content provided below to answer the user query clearly and accurately.
If articles is empty then just look at the question and answer it based on your intelligence.
Here's the chat so far:
{chat_history}
---------------------
ARTICLES:
{articles}
---------------------

QUESTION:
{question}

Give a factual and concise response:";

/// Render turns as `Human: ...` / `AI: ...` lines, oldest first
pub fn render_history(history: &[ConversationTurn]) -> String {
    history
        .iter()
        .map(|turn| match turn.role {
            TurnRole::Human => format!("Human: {}", turn.content),
            TurnRole::Assistant => format!("AI: {}", turn.content),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitute `{name}` placeholders in a single left-to-right pass
///
/// Substituted values are never scanned again, so article text that happens
/// to contain `{question}` stays literal. Unknown placeholders are kept as is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let replaced = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value, close))
        });

        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Build the full answer prompt
pub fn build_answer_prompt(history: &[ConversationTurn], articles: &str, question: &str) -> String {
    let chat_history = render_history(history);
    fill_template(
        ANSWER_TEMPLATE,
        &[
            ("chat_history", chat_history.as_str()),
            ("articles", articles),
            ("question", question),
        ],
    )
}
