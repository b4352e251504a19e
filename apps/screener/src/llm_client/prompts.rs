// All LLM prompt constants for skill extraction.

/// System prompt for skill extraction — enforces JSON-only output.
pub const SKILL_EXTRACTION_SYSTEM: &str =
    "You are an expert technical recruiter analyzing resumes. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Skill extraction prompt template. Replace `{resume_text}` before sending.
pub const SKILL_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Analyze this resume and extract all technical skills.

Resume Text:
{resume_text}

Identify and categorize the technical skills found in this resume. Return your response as a JSON object with the following structure:

{
    "programming_languages": ["Python", "JavaScript", etc.],
    "frameworks": ["React", "Django", "TensorFlow", etc.],
    "tools": ["Git", "Docker", "VS Code", etc.],
    "databases": ["PostgreSQL", "MongoDB", etc.],
    "cloud_platforms": ["AWS", "Azure", "Google Cloud", etc.],
    "other_technical_skills": ["Machine Learning", "REST APIs", etc.]
}

Rules:
1. Only include skills that are explicitly mentioned or clearly implied in the resume
2. Use standard names for technologies (e.g., "JavaScript" not "JS")
3. Do not invent or assume skills that aren't present
4. If a category has no skills, use an empty array []
5. Return ONLY the JSON object, no additional text

Extract the skills now:"#;
