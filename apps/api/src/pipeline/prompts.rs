// All LLM prompt constants for the proposal pipeline.
// Instruction and data are sent as separate sections; see llm_client::join_sections.

/// Stage 1 instruction. The user request is sent as the data section.
pub const SCHEMA_SYNTHESIS_INSTRUCTION: &str = r#"You are a procurement expert. Analyze the user's request and generate a JSON Schema
that defines the data we need to extract from vendor proposals.

The JSON structure must look like this:
{
  "fields": [
    {"key": "total_price", "type": "number", "description": "Total cost in USD"},
    {"key": "delivery_timeline", "type": "string", "description": "Delivery time estimation"}
  ]
}

Add fields specific to the request (e.g. ram, warranty). Rules:
- "key" is snake_case and unique within "fields"
- "type" is one of: "number", "integer", "string", "boolean"
- "description" says what the value means, including units"#;

/// Prefix for the stage 1 data section.
pub const USER_REQUEST_LABEL: &str = "USER REQUEST:";

/// Stage 2 instruction template. Replace `{schema_json}` before sending.
pub const EXTRACTION_INSTRUCTION_TEMPLATE: &str = r#"You are a data extraction engine.
1. Read the SOURCE TEXT provided below.
2. Extract data to match this EXACT JSON Schema: {schema_json}
3. Return a JSON object whose keys are the schema "key" values.
4. If a field is missing in the text, set the value to null.
5. Normalize all currency values to numbers (e.g., "$10,000" -> 10000)."#;

/// Prefix for the stage 2 data section.
pub const SOURCE_TEXT_LABEL: &str = "SOURCE TEXT:";

/// Stage 3 instruction.
pub const EVALUATION_INSTRUCTION: &str = r#"You are a procurement judge. Compare the vendor offer against the buyer's request.

Score the fit from 0 to 100:
- 100: price, specs and terms all match the request
- 0: total mismatch
If the offer data reports an extraction error, score it low.

Return exactly this JSON object:
{"score": <integer 0-100>, "reason": "<one sentence>"}"#;

/// Labels for the two halves of the stage 3 data section.
pub const BUYER_REQUEST_LABEL: &str = "BUYER REQUEST:";
pub const VENDOR_OFFER_LABEL: &str = "VENDOR OFFER (extracted data):";
