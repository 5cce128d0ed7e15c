//! Prompt texts sent to the generation provider and fixed interviewer lines.

/// First line of every report document
pub const DEFAULT_REPORT_TITLE: &str = "QUANTITATIVE TRADING CANDIDATE ASSESSMENT";

/// Opening line shown when an interview starts
pub const DEFAULT_GREETING: &str = "Hello! I'm conducting interviews for our Quantitative Trading program. Could you tell me a bit about yourself and your background?";

/// Role description folded into the interviewer system prompt
pub const DEFAULT_JOB_DESCRIPTION: &str = "Quantitative Trading Trainee/Intern Position

We are seeking highly motivated candidates for our Quantitative Trading program. This role involves developing and implementing trading strategies, analyzing market data, and working with cutting-edge technology.

Key Requirements:
- Strong quantitative and analytical skills
- Programming experience (Python, C++, etc.)
- Understanding of financial markets and instruments
- Problem-solving and decision-making abilities
- Team collaboration and communication skills
- Continuous learning mindset
- Entrepreneurial spirit and initiative

Our Values:
- Collaborative Thinkers: Best ideas come from teamwork
- Continuous Learners: Always improving and upskilling
- Challenge Seekers: Thrive on complexity and innovation
- Entrepreneurial Spirits: Own your ideas and take initiative";

/// Instructions for the interviewer persona
pub fn interviewer_system_prompt(job_description: &str, soft_limit: usize, hard_limit: usize) -> String {
    format!(
        "You are an experienced recruiter conducting a structured interview. Your role is to:

1. Be professional but conversational: create a comfortable atmosphere while staying focused on assessment
2. Gather comprehensive information: education, experience, projects and skills
3. Assess behavioral traits: problem-solving, teamwork, initiative, resilience and adaptability
4. Evaluate cultural fit: collaborative thinking, continuous learning, challenge-seeking and entrepreneurial spirit
5. Assess technical ability: quantitative skills, programming and market knowledge
6. Evaluate soft skills: communication, decision-making, time management and leadership

Ask one or two follow-up questions at a time and ask for specific examples.
The interview ends after {soft_limit} to {hard_limit} candidate answers; pace your questions to cover every area by then.

Job Context:
{job_description}"
    )
}

/// Request for the narrative assessment of a finished interview
pub fn narrative_prompt(transcript: &str) -> String {
    format!(
        "Based on this interview conversation, write a detailed candidate assessment.

Conversation:
{transcript}

Use exactly these sections and give every metric a score from 0 to 100 on its own line:

#### 1. Technical Skills Assessment
- Quantitative Reasoning: <score>
- Programming Skills: <score>
- Market Knowledge: <score>
- Data Analysis: <score>

#### 2. Behavioral Traits Assessment
- Problem-solving: <score>
- Teamwork: <score>
- Initiative: <score>
- Resilience: <score>
- Adaptability: <score>

#### 3. Cultural Fit Assessment
- Collaborative Thinking: <score>
- Continuous Learning: <score>
- Challenge-seeking: <score>
- Entrepreneurial Spirit: <score>

#### 4. Soft Skills Assessment
- Communication: <score>
- Decision-making: <score>
- Time Management: <score>
- Leadership: <score>

#### 5. Overall Assessment
- Final Score: <score>
- Key Strengths:
  - <one strength per line>
- Areas for Improvement:
  - <one area per line>
- Recommendation: <Strong/Moderate/Weak candidate>

A one-line justification may follow each metric on the next line."
    )
}

/// Request to pull the candidate's name out of a single message
pub fn name_extraction_prompt(text: &str) -> String {
    format!(
        "What is the candidate's name in this message?

Message:
{text}

Respond with just the candidate's first and last name, or \"Unknown\" if no name was mentioned.
Examples: \"John Smith\", \"Sarah Johnson\", \"Unknown\""
    )
}

/// Final interviewer line once the assessment is stored
///
/// `stored` is the report location, or the error text when the write failed.
pub fn closing_message(stored: &str) -> String {
    format!(
        "Thank you for your time! I've completed your assessment and saved it to: {stored}\n\nI'll review your responses and get back to you with next steps. Good luck with your application!"
    )
}

/// Assistant turn recorded when the provider call fails
pub fn generation_error_turn(detail: &str) -> String {
    format!("Error communicating with the language model: {detail}")
}

/// Narrative used when the assessment itself could not be generated
pub fn narrative_error(detail: &str) -> String {
    format!("Error generating assessment: {detail}")
}
