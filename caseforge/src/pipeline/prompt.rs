//! Instruction templates for the generation endpoint.
//!
//! Templates are static and parameterized only by user-facing inputs (file
//! name, language, code). The structural contract they request is enforced
//! downstream by the normalizer, not here.

/// Prompt for generating test cases from an uploaded document.
///
/// Requests at least 25 cases with at least 5 negative-path cases, and a
/// single JSON object with one top-level `testCases` array.
pub fn file_test_cases(file_name: &str) -> String {
    format!(
        r#"
You are a senior QA engineer.
Generate at least 25 detailed test cases for the uploaded document (PDF or Word DOCX).
Make sure to generate at least 5 negative test cases.
Also if the uploaded document is a FSD or requirement definition file, make sure to generate 1 test case for every section / requirement.

DELIVERABLE:
Return ONLY valid JSON with this exact structure:
{{
  "testCases": [
    {{
      "testCaseId": "TC_01",
      "title": "string",
      "description": "string",
      "preconditions": "string",
      "steps": [
        {{ "stepNo": number, "action": "string", "expectedResult": "string" }}
      ]
    }}
  ]
}}

File: {file_name}
"#
    )
}

/// Prompt for generating test cases from pasted source code.
pub fn code_test_cases(language: &str, code: &str) -> String {
    format!(
        r#"
You are a senior QA engineer.
Generate detailed test cases for the following {language} code.
Cover the happy path, edge cases, and at least 5 negative test cases.

DELIVERABLE:
Return ONLY valid JSON with this exact structure:
{{
  "testCases": [
    {{
      "testCaseId": "TC_01",
      "title": "string",
      "description": "string",
      "preconditions": "string",
      "steps": [
        {{ "stepNo": number, "action": "string", "expectedResult": "string" }}
      ]
    }}
  ]
}}

Code:
{code}
"#
    )
}

/// Prompt for optimising pasted source code.
pub fn optimise_code(language: &str, code: &str) -> String {
    format!(
        r#"
You are a senior {language} engineer.
Optimise the following code for readability and performance without changing its behaviour.

DELIVERABLE:
Return ONLY valid JSON with this exact structure:
{{ "optimizedCode": "string" }}

Code:
{code}
"#
    )
}
