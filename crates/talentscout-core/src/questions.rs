//! Boilerplate interview questions generated from a tech stack.

/// Question templates as (prefix, suffix) around the technology name.
const TEMPLATES: [(&str, &str); 4] = [
    ("Explain the core concepts of ", "."),
    ("Write a simple program using ", "."),
    ("What are common mistakes in ", " and how do you avoid them?"),
    ("Explain a real-world use case of ", "."),
];

/// Number of questions produced for each technology.
pub const QUESTIONS_PER_TECH: usize = TEMPLATES.len();

/// Generate interview questions for a comma-separated tech stack.
///
/// Tokens are trimmed but never dropped, so `"Rust,,Go"` yields twelve
/// questions, four of them about an empty name.
pub fn generate_questions(stack: &str) -> Vec<String> {
    stack
        .split(',')
        .map(str::trim)
        .flat_map(|tech| {
            TEMPLATES
                .iter()
                .map(move |(prefix, suffix)| format!("{}{}{}", prefix, tech, suffix))
        })
        .collect()
}
