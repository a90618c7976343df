use base64::Engine;
use blueprint_core::{GenerateError, UserInput};
use serde::Serialize;
use serde_json::{json, Value};

pub const DATA_SOURCE_MARKER: &str = "---DATA SOURCE---";

pub fn system_prompt() -> &'static str {
    "\
You are a senior software architect who designs databases and HTTP APIs.\n\
Study the data source supplied with this request (an image, a CSV file, a PDF, \
a link to a spreadsheet or web page, or a plain description) and answer with \
ONE JSON object holding a complete backend blueprint.\n\n\
1. databaseSchema\n\
   - A normalized SQL schema with appropriate column types.\n\
   - Every table has a primary key; note foreign key relationships in SQL comments.\n\
   - One formatted string with all CREATE TABLE statements, each ending in a semicolon.\n\n\
2. restApi\n\
   - An OpenAPI 3.0.x document in YAML derived from the schema.\n\
   - Standard create, read, update and delete endpoints for every table.\n\
   - One string holding the whole document.\n\n\
3. schemaReasoning\n\
   - Markdown explaining the schema: why these tables, columns and relationships \
follow from the data source.\n\n\
4. erdDiagram\n\
   - The schema as a Mermaid `erDiagram`.\n\
   - Write attributes as `dataType attributeName PK \"comment\"`, for example \
`int user_id PK \"Auto-incrementing primary key\"`.\n\
   - Only valid Mermaid syntax; no invented abbreviations such as 'AI' for AUTO_INCREMENT.\n\n\
5. apiEndpoints\n\
   - Every endpoint from the YAML in step 2 as an array of objects with the keys \
'method' (e.g. 'GET'), 'path' (e.g. '/users/{id}') and 'summary' (a short description).\n"
}

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    /// Base64 of the raw file bytes.
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: &'static str,
    pub response_schema: Value,
}

/// Prompt parts for one data source. Files travel as an inline attachment
/// after the prompt; urls and text are appended to the prompt itself.
pub fn request_parts(input: &UserInput) -> Result<Vec<Part>, GenerateError> {
    let prompt = system_prompt();
    let parts = match input {
        UserInput::File(file) => {
            if !file.is_supported() {
                return Err(GenerateError::UnsupportedInput(format!(
                    "{} has media type {}; expected an image, PDF or CSV",
                    file.name(),
                    file.media_type()
                )));
            }
            vec![
                Part::Text {
                    text: prompt.to_string(),
                },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: file.media_type().to_string(),
                        data: base64::engine::general_purpose::STANDARD.encode(file.bytes()),
                    },
                },
            ]
        }
        UserInput::Url(url) => vec![Part::Text {
            text: format!(
                "{prompt}\n{DATA_SOURCE_MARKER}\nAnalyze the data from the following URL: {url}"
            ),
        }],
        UserInput::Text(text) => vec![Part::Text {
            text: format!(
                "{prompt}\n{DATA_SOURCE_MARKER}\nAnalyze the following data description: \"{text}\""
            ),
        }],
    };
    Ok(parts)
}

pub fn request_body(input: &UserInput) -> Result<GenerateContentRequest, GenerateError> {
    Ok(GenerateContentRequest {
        contents: vec![Content {
            parts: request_parts(input)?,
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: response_schema(),
        },
    })
}

/// Declared output shape, in the service's schema dialect.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "databaseSchema": {
                "type": "STRING",
                "description": "All SQL CREATE TABLE statements as one formatted string, each ending with a semicolon."
            },
            "restApi": {
                "type": "STRING",
                "description": "The API definition as an OpenAPI 3.0.x YAML document."
            },
            "schemaReasoning": {
                "type": "STRING",
                "description": "Markdown explaining the design choices behind the schema."
            },
            "erdDiagram": {
                "type": "STRING",
                "description": "The entity-relationship diagram in Mermaid erDiagram syntax."
            },
            "apiEndpoints": {
                "type": "ARRAY",
                "description": "Every endpoint declared in the OpenAPI YAML.",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "path": { "type": "STRING", "description": "URL path of the endpoint." },
                        "method": { "type": "STRING", "description": "HTTP method, e.g. GET or POST." },
                        "summary": { "type": "STRING", "description": "Short description of the endpoint." }
                    },
                    "required": ["path", "method", "summary"]
                }
            }
        },
        "required": ["databaseSchema", "restApi", "schemaReasoning", "erdDiagram", "apiEndpoints"]
    })
}
