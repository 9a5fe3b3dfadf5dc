use crate::models::Profile;

/// Per-chunk prompt asking the model for one scheme, or an irrelevance marker.
pub fn extraction_prompt(profile: &Profile, income: &str, context: &str) -> String {
    format!(
        r#"You are a government scheme eligibility assistant.

User profile:
- Age: {age}
- Gender: {gender}
- Occupation: {occupation}
- Annual income (INR): {income}
- Location: {location}
- Caste category: {caste}
- Disability: {disability}

Using ONLY the context below, extract ONE government scheme that this user is likely eligible for.

Context:
{context}

Check the eligibility criteria in the context against the profile:
- compare any income limit with the user's annual income
- check whether the scheme targets the user's occupation
- check whether the scheme is restricted to a state or region that excludes the user's location

If the context does not describe a scheme this user is eligible for, respond with exactly:
{{"irrelevant": true}}

Otherwise respond in this JSON format:
{{
  "title": "",
  "category": "",
  "description": "",
  "eligibility": "",
  "documents": [],
  "applyLink": "",
  "whyRecommended": ""
}}

Rules:
- Do NOT hallucinate
- If info missing, write "Not specified"
- "whyRecommended" is one sentence linking the scheme to the profile
- Output JSON only"#,
        age = profile.age,
        gender = profile.gender,
        occupation = profile.occupation,
        income = income,
        location = profile.location,
        caste = profile.caste_category,
        disability = profile.disability,
        context = context,
    )
}

/// Single-shot question answering over retrieved chunks.
pub fn answer_prompt(question: &str, contexts: &[&str]) -> String {
    let context = contexts.join("\n\n---\n\n");
    format!(
        r#"Answer the question about Indian government schemes based only on the following context:

{context}

---

Question: {question}

If the context does not contain the answer, say that you do not know."#
    )
}
