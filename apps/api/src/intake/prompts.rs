// Résumé intake LLM prompt templates.

pub const DETAILS_EXTRACT_SYSTEM: &str = "\
You are a precise resume data extractor. You MUST respond with valid JSON \
only — no markdown fences, no explanations.";

pub const DETAILS_EXTRACT_PROMPT: &str = r#"From the resume text below, extract the candidate's name, email, and phone number.
Respond with a JSON object with keys "name", "email", "phone". Missing fields must be null.

Resume text:
{resume_text}"#;

pub const SKILLS_EXTRACT_SYSTEM: &str = "\
You are a precise resume data extractor. You MUST respond with valid JSON \
only — no markdown fences, no explanations.";

pub const SKILLS_EXTRACT_PROMPT: &str = r#"From the resume text below, list the candidate's key technical skills.
Respond with a JSON object with a single key "skills" which is an array of strings.
Example: {"skills": ["React", "Node.js"]}

Resume text:
{resume_text}"#;
