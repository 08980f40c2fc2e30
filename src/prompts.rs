//! Prompts sent to the model when solving an assignment.
//!
//! Everything the model is told lives here, so changing the solver's
//! behaviour means editing one file. Callers can override both pieces through
//! [`crate::config::SolveConfig::system_prompt`] and
//! [`crate::config::SolveConfig::prompt_template`].

/// Placeholder replaced by the extracted assignment text.
pub const ASSIGNMENT_PLACEHOLDER: &str = "{assignment}";

/// Default system prompt.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are an expert tutor who writes complete, correct solutions to university assignments.

Follow these rules precisely:

1. COVERAGE
   - Answer every question in the assignment, in the order given
   - Keep the original question numbering

2. STRUCTURE
   - Use ## for each question and ### for its parts
   - Use - for bullet points and 1. 2. 3. for ordered steps
   - Use **bold** for key terms and final answers

3. CODE
   - Put programs in fenced code blocks with a language identifier
   - Wrap identifiers and short expressions in single backticks

4. OUTPUT FORMAT
   - Output ONLY the solution as Markdown
   - Do NOT wrap the answer in ```markdown fences
   - Do NOT add a title, the student's name or a preamble
   - Do NOT use tables or images"#;

/// Default user-message template. `{assignment}` is replaced by the
/// extracted text of the uploaded document.
pub const SOLVE_PROMPT_TEMPLATE: &str = r#"Solve the following assignment. Give a complete solution for each question.

Assignment:
"""
{assignment}
""""#;

/// Substitute the assignment text into `template`.
///
/// Every occurrence of `{assignment}` is replaced; the rest of the template
/// is copied verbatim.
pub fn render_prompt(template: &str, assignment: &str) -> String {
    template.replace(ASSIGNMENT_PLACEHOLDER, assignment.trim())
}
