//! Prompt construction for LLM requests.
//!
//! Builds the system prompt with the dataset schema and worked examples.

use crate::dataset::Schema;
use crate::llm::types::Message;
use std::sync::Arc;

/// System prompt template for the query assistant.
const SYSTEM_PROMPT_TEMPLATE: &str = r#"You are a data assistant. You answer questions about a single table that is already loaded as a pandas-style DataFrame named `df`.

DATASET SCHEMA:
{schema}

INSTRUCTIONS:
- Write exactly ONE expression that answers the question using `df`
- Only `df` and `pd` (pd.to_numeric, pd.to_datetime, pd.isna, pd.notna) are available
- No statements, assignments, imports, print calls, lambdas or loops
- Reference columns exactly as named in the schema, e.g. df['Loan Amount (INR)']
- Aggregate questions return a single value; filter or projection questions return rows
- Count rows with .shape[0]
- For case-insensitive text matching pass case=False, e.g. .str.contains('x', case=False, na=False)
- Never modify the data (no inplace=True)
- If the question cannot be answered from the schema, use the expression None

EXAMPLES:
{examples}

OUTPUT FORMAT:
Respond with JSON of the form {"expression": "<expression>"} and nothing else."#;

/// Worked question/expression pairs shown to the model.
const FEW_SHOT_EXAMPLES: &[(&str, &str)] = &[
    (
        "What is the average loan amount?",
        "df['Loan Amount (INR)'].mean()",
    ),
    (
        "Show me the loans of Rahul Sharma",
        "df[df['Customer Name'] == 'Rahul Sharma']",
    ),
    (
        "Which loans have an interest rate below 10%?",
        "df[df['Interest Rate (p.a.)'] < 10]",
    ),
    (
        "What is the total gold weight pledged?",
        "df['Gold Weight (Grams)'].sum()",
    ),
    (
        "How many loans have a tenure of 12 months?",
        "df[df['Loan Tenure (Months)'] == 12].shape[0]",
    ),
    (
        "What is the largest loan amount?",
        "df['Loan Amount (INR)'].max()",
    ),
    (
        "List loan IDs and customer names for 24K gold",
        "df[df['Gold Purity (Karat)'] == '24K'][['Loan ID', 'Customer Name']]",
    ),
    (
        "Find customers whose name contains Singh",
        "df[df['Customer Name'].str.contains('Singh', case=False, na=False)]",
    ),
];

fn format_examples() -> String {
    FEW_SHOT_EXAMPLES
        .iter()
        .map(|(question, expression)| {
            format!("Q: {question}\nA: {{\"expression\": \"{expression}\"}}")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Builds the system prompt with the dataset schema injected.
pub fn build_system_prompt(schema: &Schema) -> String {
    SYSTEM_PROMPT_TEMPLATE
        .replace("{schema}", &schema.format_for_llm())
        .replace("{examples}", &format_examples())
}

/// Builds the complete message list for one question.
///
/// Each question stands alone: the system prompt plus the question, no
/// earlier turns.
pub fn build_messages(cache: &mut PromptCache, schema: &Schema, question: &str) -> Vec<Message> {
    let system_prompt = cache.get_or_build(schema);
    vec![
        Message::system(system_prompt.to_string()),
        Message::user(question),
    ]
}

/// Cache for formatted schema prompts.
///
/// Avoids rebuilding the system prompt on every request when the schema
/// hasn't changed.
#[derive(Debug, Default)]
pub struct PromptCache {
    /// Hash of the schema used to build the cached prompt.
    schema_hash: u64,
    /// Cached system prompt.
    system_prompt: Option<Arc<str>>,
}

impl PromptCache {
    /// Creates a new empty prompt cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the cached system prompt, rebuilding if the schema has changed.
    pub fn get_or_build(&mut self, schema: &Schema) -> Arc<str> {
        let hash = schema.content_hash();
        match &self.system_prompt {
            Some(prompt) if self.schema_hash == hash => Arc::clone(prompt),
            _ => {
                let prompt: Arc<str> = Arc::from(build_system_prompt(schema));
                self.schema_hash = hash;
                self.system_prompt = Some(Arc::clone(&prompt));
                prompt
            }
        }
    }

    /// Invalidates the cache, forcing a rebuild on next access.
    pub fn invalidate(&mut self) {
        self.schema_hash = 0;
        self.system_prompt = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::gold_loans;
    use crate::llm::types::Role;

    #[test]
    fn test_build_system_prompt_contains_schema() {
        let schema = gold_loans().schema();
        let prompt = build_system_prompt(&schema);

        assert!(prompt.contains("'Loan Amount (INR)': numeric"));
        assert!(prompt.contains("'Disbursement Date': temporal"));
        assert!(!prompt.contains("{schema}"));
    }

    #[test]
    fn test_build_system_prompt_contains_instructions_and_examples() {
        let prompt = build_system_prompt(&Schema::default());

        assert!(prompt.contains("INSTRUCTIONS:"));
        assert!(prompt.contains("use the expression None"));
        assert!(prompt.contains(r#"A: {"expression": "df['Gold Weight (Grams)'].sum()"}"#));
        assert!(prompt.contains(r#"{"expression": "<expression>"}"#));
    }

    #[test]
    fn test_build_messages_is_single_turn() {
        let schema = gold_loans().schema();
        let mut cache = PromptCache::new();
        let messages = build_messages(&mut cache, &schema, "How many loans are there?");

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "How many loans are there?");
    }

    #[test]
    fn test_prompt_cache_reuses_until_schema_changes() {
        let mut schema = gold_loans().schema();
        let mut cache = PromptCache::new();

        let first = cache.get_or_build(&schema);
        let second = cache.get_or_build(&schema);
        assert!(Arc::ptr_eq(&first, &second));

        schema.columns.pop();
        let third = cache.get_or_build(&schema);
        assert!(!Arc::ptr_eq(&first, &third));

        cache.invalidate();
        let fourth = cache.get_or_build(&schema);
        assert!(!Arc::ptr_eq(&third, &fourth));
    }
}
