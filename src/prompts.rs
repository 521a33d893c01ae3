//! Prompt templates for the two external-collaborator calls.
//!
//! Centralising every prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tightening a formatting rule (e.g. the
//!    diagram-alert marker) requires editing exactly one place, and the
//!    Block Classifier consumes the very same marker constant.
//!
//! 2. **Testability** — unit tests can inspect prompts directly without
//!    spinning up a real LLM, making prompt regressions easy to catch.
//!
//! The conversion templates deliberately restrict the model to the Markdown
//! dialect the classifier understands: `##`/`###`/`####` headings, `*`
//! bullets, `**bold**`/`*italic*`/`` `code` `` spans, fenced code blocks,
//! and the diagram-alert callout line.

use crate::config::NoteType;

/// Marker the generation templates use to flag visual content.
///
/// [`crate::markdown`] strips exactly this substring when turning the line
/// into a diagram-alert block.
pub const DIAGRAM_ALERT_MARKER: &str = "📊 **[DIAGRAM ALERT]**:";

/// Substring that triggers diagram-alert classification.
///
/// Detection is looser than [`DIAGRAM_ALERT_MARKER`] so a model that drops
/// the emoji or the colon still produces a callout instead of a paragraph.
pub const DIAGRAM_ALERT_DETECT: &str = "DIAGRAM ALERT";

/// Instruction prompt for the content-acquisition collaborator.
///
/// Asks for an exhaustive transcription-style extraction of an educational
/// video (slides, verbal explanations, structure, chronology). The
/// collaborator owns the actual video access; this prompt only tells it what
/// to pull out.
pub fn analysis_prompt(video_url: &str) -> String {
    format!(
        r#"Analyze this educational video: {video_url}

You are analyzing an educational video where a teacher explains presentation slides to students. Extract ALL educational content in a comprehensive 2000+ word format. Focus entirely on the learning material and instructional content.

## SLIDE CONTENT EXTRACTION (600-800 words)
For each slide shown:
- **Slide Title**: Extract the exact title/heading
- **Main Content**: All bullet points, text, and information on the slide
- **Visual Elements**: Diagrams, charts, images, tables, or graphics with detailed descriptions
- **Key Terms**: Important vocabulary, concepts, or terminology highlighted
- **Formulas/Equations**: Any mathematical or scientific formulas shown
- **Examples**: Case studies, sample problems, or illustrative examples
- **Data/Statistics**: Numbers, percentages, research findings presented

## TEACHER'S EXPLANATIONS (800-1000 words)
Capture the instructor's verbal explanations for each slide:
- **Detailed Explanations**: How the teacher elaborates on each slide's content
- **Additional Context**: Extra information provided beyond what's on slides
- **Examples Given**: Real-world applications, analogies, or examples used to explain concepts
- **Step-by-Step Processes**: Any procedures, methods, or processes explained
- **Clarifications**: How difficult concepts are broken down or simplified
- **Connections**: How the teacher links different concepts or slides together
- **Emphasis Points**: What topics the instructor stresses as particularly important

## EDUCATIONAL STRUCTURE & LEARNING OBJECTIVES (300-400 words)
- **Course/Topic Context**: What subject area and specific topic is being taught
- **Learning Goals**: What students should understand after this lecture
- **Prerequisite Knowledge**: What background knowledge is assumed
- **Practical Applications**: How this knowledge applies in real scenarios

## COMPLETE EDUCATIONAL CONTENT INVENTORY (400-500 words)
Extract every educational element: concepts taught, terminology, procedures, facts and data, rules and principles, problem-solving approaches, and critical points.

## CHRONOLOGICAL LEARNING PROGRESSION
Track how the educational content unfolds in timed segments (slide content, teacher explanation, key learning points per segment) throughout the entire video.

## EXTRACTION REQUIREMENTS:
- Focus ONLY on educational/instructional content
- Ignore non-educational elements (personal comments, technical issues, etc.)
- Transcribe all text from slides exactly as shown
- Capture all verbal explanations that add educational value
- Note any formulas, equations, or technical notations precisely
- Organize content to reflect the logical flow of instruction
- Ensure someone could learn the material from your extraction alone

Your goal is to create a complete educational resource that captures everything a student would need to learn from this lecture, presented in a clear, organized format that mirrors the instructional sequence."#
    )
}

/// Conversion template for `NoteType::Short`.
///
/// The placeholder `{content}` must be replaced with the raw extracted
/// content before use.
pub const SHORT_CONVERSION_TEMPLATE: &str = r#"You are an expert technical writer specializing in distillation. Your sole task is to distill the following content into an ultra-concise, key-point-focused markdown summary. Be ruthless in cutting non-essential information.

---
**CRITICAL RULES:**
- **Extreme Brevity:** The summary must be **under 400 words**. Focus only on the absolute core concepts.
- **Eliminate All Fluff:** Omit conversational filler, rhetorical questions, greetings, and redundant explanations.
- **Formatting:**
  - Use `##` for main topics and `###` for sub-topics.
  - Use bullet points (`*`) for details.
  - Enclose essential keywords in `**bold**`.
- **Visuals:** If the content describes a diagram, chart, or illustration, flag it with: `📊 **[DIAGRAM ALERT]**: [Brief description of the visual's purpose].`

---
**CONTENT TO DISTILL:**
{content}

---
Produce only the markdown summary. Do not include any preamble or extra text."#;

/// Conversion template for `NoteType::Long`.
///
/// The placeholder `{content}` must be replaced with the raw extracted
/// content before use.
pub const LONG_CONVERSION_TEMPLATE: &str = r#"Convert the following content into comprehensive, detailed markdown notes that preserve all educational value and context.

CONTENT TO CONVERT:
{content}

FORMAT REQUIREMENTS:
- Use hierarchical markdown headers (##, ###, ####)
- Create detailed bullet points (`*`)
- Include full explanations and context
- Preserve all examples, analogies, and illustrations
- Use **bold** for key terms and *italics* for emphasis
- Include fenced code blocks for formulas and code
- Target 600-800 words for comprehensive coverage
- Alert users to visual content with: 📊 **[DIAGRAM ALERT]**: Detailed description

DIAGRAM DETECTION:
Carefully scan the content for any mentions of visual elements (diagrams, charts, graphs, images, flowcharts, tables, illustrations, maps, timelines, mathematical plots, scientific figures). For each visual element found, create a diagram alert that includes:
1. Type of visual (diagram/chart/graph/etc.)
2. What it depicts or illustrates
3. Key elements or data points shown
4. How it relates to the learning objectives

Format: 📊 **[DIAGRAM ALERT]**: [Detailed description of visual content and its educational purpose]

Convert the content directly into markdown notes without additional sections or structure explanations."#;

/// Build the stage-2 conversion prompt for the given note type.
pub fn conversion_prompt(content: &str, note_type: NoteType) -> String {
    let template = match note_type {
        NoteType::Short => SHORT_CONVERSION_TEMPLATE,
        NoteType::Long => LONG_CONVERSION_TEMPLATE,
    };
    template.replace("{content}", content)
}
